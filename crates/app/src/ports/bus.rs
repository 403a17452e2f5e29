//! Device bus port — transports that discover devices and deliver their
//! messages (MQTT bridges, virtual buses, ...).

use std::sync::Arc;

use lighthub_domain::fields::Fields;

use super::device::Device;

/// A transport the controller can ask to open the network for pairing.
pub trait DeviceBus: Send + Sync {
    /// Name used in diagnostics (e.g. `"virtual"`).
    fn name(&self) -> &str;

    /// Allow new devices to join for `seconds`.
    fn request_open_network(&self, seconds: u32);
}

/// Inbound notifications from a device bus.
///
/// Implemented by the controller. Buses may call these concurrently from
/// their own delivery tasks.
pub trait DeviceBusContext: Send + Sync {
    /// A device became known (first seen, or re-announced).
    fn device_discovered(&self, device: Arc<dyn Device>);

    /// A known device's identity or name changed.
    fn device_updated(&self, device: Arc<dyn Device>);

    /// A device sent a message.
    fn device_action(&self, device: &dyn Device, data: Fields);

    /// The bus opened or closed its network for pairing.
    fn network_open_status(&self, open: bool, seconds: u32);
}

impl<T: DeviceBusContext> DeviceBusContext for Arc<T> {
    fn device_discovered(&self, device: Arc<dyn Device>) {
        (**self).device_discovered(device);
    }

    fn device_updated(&self, device: Arc<dyn Device>) {
        (**self).device_updated(device);
    }

    fn device_action(&self, device: &dyn Device, data: Fields) {
        (**self).device_action(device, data);
    }

    fn network_open_status(&self, open: bool, seconds: u32) {
        (**self).network_open_status(open, seconds);
    }
}
