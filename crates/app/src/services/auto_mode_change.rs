//! Auto mode change — forces a device out of a transient reporting mode.
//!
//! Some knobs boot into an `event` mode that reports coarse actions only.
//! When a message shows the device in the `from` mode, a command switching
//! it to the `to` mode is sent back immediately.

use lighthub_domain::event::InternalEvent;
use lighthub_domain::fields::Fields;
use tracing::info;

use super::DeviceService;
use crate::ports::Device;

pub struct AutoModeChangeService {
    mode_field: String,
    from: String,
    to: String,
}

impl AutoModeChangeService {
    #[must_use]
    pub fn new(mode_field: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            mode_field: mode_field.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

impl DeviceService for AutoModeChangeService {
    fn name(&self) -> &str {
        "Auto mode change"
    }

    fn process_external_event(&self, device: &dyn Device, data: &Fields) -> Vec<InternalEvent> {
        if data.get(&self.mode_field).is_some_and(|mode| *mode == self.from) {
            info!(
                address = device.address(),
                field = %self.mode_field,
                from = %self.from,
                to = %self.to,
                "switching device mode"
            );
            let mut command = Fields::new();
            command.insert(self.mode_field.clone(), self.to.clone());
            device.send_command(command);
        }
        Vec::new()
    }
}
