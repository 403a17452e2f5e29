//! Virtual device — remembers what it was told and reports its new state
//! back to the bus context, the way a real bridge echoes device state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use lighthub_app::ports::{Device, DeviceBusContext};
use lighthub_domain::fields::{Fields, fields};
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::catalog::DeviceSpec;

/// Last state commanded to a [`VirtualDevice`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualState {
    pub on: bool,
    pub brightness: i64,
    pub color_temp: i64,
    pub commands: Vec<Fields>,
}

pub struct VirtualDevice {
    me: Weak<VirtualDevice>,
    spec: DeviceSpec,
    name: Mutex<String>,
    state: Mutex<VirtualState>,
    context: Weak<dyn DeviceBusContext>,
    runtime: Handle,
}

impl VirtualDevice {
    pub fn new(spec: DeviceSpec, context: Weak<dyn DeviceBusContext>, runtime: Handle) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            spec,
            name: Mutex::new(spec.name.to_string()),
            state: Mutex::new(VirtualState::default()),
            context,
            runtime,
        })
    }

    #[must_use]
    pub fn state(&self) -> VirtualState {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, VirtualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver a message from this device to the bus context.
    ///
    /// Delivery happens on the runtime, never on the caller's stack: the
    /// caller may be a light service holding its own state lock.
    pub fn report(&self, data: Fields) {
        let (Some(context), Some(me)) = (self.context.upgrade(), self.me.upgrade()) else {
            return;
        };
        self.runtime.spawn(async move {
            context.device_action(me.as_ref(), data);
        });
    }

    fn announce_update(&self) {
        let (Some(context), Some(me)) = (self.context.upgrade(), self.me.upgrade()) else {
            return;
        };
        self.runtime.spawn(async move {
            context.device_updated(me);
        });
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

impl Device for VirtualDevice {
    fn address(&self) -> &str {
        self.spec.address
    }

    fn vendor(&self) -> &str {
        self.spec.vendor
    }

    fn model(&self) -> &str {
        self.spec.model
    }

    fn description(&self) -> &str {
        self.spec.description
    }

    fn battery_powered(&self) -> bool {
        self.spec.battery_powered
    }

    fn name(&self) -> String {
        self.name
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn send_command(&self, data: Fields) {
        info!(address = self.spec.address, ?data, "virtual command");
        self.lock_state().commands.push(data);
    }

    fn send_brightness_transition(&self, brightness: i64, transition_secs: f64) {
        debug!(address = self.spec.address, brightness, transition_secs, "virtual brightness");
        let on = brightness > 0;
        {
            let mut state = self.lock_state();
            state.brightness = brightness;
            state.on = on;
        }
        self.report(fields([
            ("brightness", &brightness.to_string()),
            ("state", on_off(on)),
        ]));
    }

    fn send_color_temp_transition(&self, color_temp: i64, transition_secs: f64) {
        debug!(address = self.spec.address, color_temp, transition_secs, "virtual color temperature");
        self.lock_state().color_temp = color_temp;
        self.report(fields([("color_temp", &color_temp.to_string())]));
    }

    fn send_state_change(&self, on: bool) {
        debug!(address = self.spec.address, on, "virtual state");
        self.lock_state().on = on;
        self.report(fields([("state", on_off(on))]));
    }

    fn set_name(&self, name: &str) {
        *self.name.lock().unwrap_or_else(PoisonError::into_inner) = name.to_string();
        self.announce_update();
    }
}
