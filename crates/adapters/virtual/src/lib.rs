//! # lighthub-adapter-virtual
//!
//! Virtual/demo device bus that provides simulated devices for testing and
//! demonstration purposes.
//!
//! ## Provided devices
//!
//! | Address | Model | Behaviour |
//! |---------|-------|-----------|
//! | `virtual:button` | eWeLink WB01 | Emits `single` / `double` / `long` via [`VirtualBus::emit`] |
//! | `virtual:knob` | Tuya TS004F | Emits knob actions via [`VirtualBus::emit`] |
//! | `virtual:bulb` | Signify LWE007 | Echoes brightness and state |
//! | `virtual:dimmer` | ENVILAR HK-ZD-DIM-A | Echoes brightness and state |
//! | `virtual:cct` | ENVILAR HK-ZD-CCT-A | Echoes brightness, state and color temperature |
//! | `virtual:pi5` | TallDane Pi5 | Echoes brightness and state |
//! | `virtual:plug` | Tuya TS011F | Echoes state, records option commands |
//!
//! ## Dependency rule
//!
//! Depends on `lighthub-app` (port traits) and `lighthub-domain` only.

mod catalog;
mod device;

use std::sync::{Arc, Weak};
use std::time::Duration;

use lighthub_app::ports::{Device, DeviceBus, DeviceBusContext};
use lighthub_domain::error::{HubError, NotFoundError};
use lighthub_domain::fields::Fields;
use tokio::runtime::Handle;
use tracing::info;

pub use catalog::{DEMO_DEVICES, DeviceSpec};
pub use device::{VirtualDevice, VirtualState};

/// Virtual bus owning a fixed set of simulated devices.
pub struct VirtualBus {
    context: Weak<dyn DeviceBusContext>,
    runtime: Handle,
    devices: Vec<Arc<VirtualDevice>>,
}

impl VirtualBus {
    /// A bus without devices.
    pub fn new(context: &Arc<dyn DeviceBusContext>, runtime: Handle) -> Self {
        Self {
            context: Arc::downgrade(context),
            runtime,
            devices: Vec::new(),
        }
    }

    /// A bus holding one device per entry of [`DEMO_DEVICES`].
    pub fn with_demo_devices(context: &Arc<dyn DeviceBusContext>, runtime: Handle) -> Self {
        DEMO_DEVICES
            .iter()
            .fold(Self::new(context, runtime), |bus, spec| bus.with_device(*spec))
    }

    #[must_use]
    pub fn with_device(mut self, spec: DeviceSpec) -> Self {
        let device = VirtualDevice::new(spec, self.context.clone(), self.runtime.clone());
        self.devices.push(device);
        self
    }

    /// Announce every device to the context.
    pub fn start(&self) {
        let Some(context) = self.context.upgrade() else {
            return;
        };
        for device in &self.devices {
            context.device_discovered(device.clone());
        }
        info!(devices = self.devices.len(), "virtual bus started");
    }

    #[must_use]
    pub fn devices(&self) -> &[Arc<VirtualDevice>] {
        &self.devices
    }

    #[must_use]
    pub fn device(&self, address: &str) -> Option<Arc<VirtualDevice>> {
        self.devices
            .iter()
            .find(|device| device.address() == address)
            .cloned()
    }

    /// Deliver a message as if `address` had sent it.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] if the bus has no such device.
    pub fn emit(&self, address: &str, data: Fields) -> Result<(), HubError> {
        let device = self.device(address).ok_or_else(|| NotFoundError {
            entity: "Device",
            id: address.to_string(),
        })?;
        if let Some(context) = self.context.upgrade() {
            context.device_action(device.as_ref(), data);
        }
        Ok(())
    }
}

impl DeviceBus for VirtualBus {
    fn name(&self) -> &str {
        "virtual"
    }

    fn request_open_network(&self, seconds: u32) {
        let Some(context) = self.context.upgrade() else {
            return;
        };
        context.network_open_status(true, seconds);
        let context = self.context.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(Duration::from_secs(u64::from(seconds))).await;
            if let Some(context) = context.upgrade() {
                context.network_open_status(false, 0);
            }
        });
    }
}
