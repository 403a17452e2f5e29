//! User interface port — push notifications to the presentation layer.

use std::collections::BTreeMap;

/// Receives change notifications from the controller.
pub trait UserInterface: Send + Sync {
    fn device_list_updated(&self);

    /// The merged status of the device at `address` changed.
    fn device_status_updated(&self, address: &str, status: &BTreeMap<String, String>);

    /// Routes, schedule or option values of the device at `address` changed.
    fn device_options_updated(&self, address: &str);

    fn network_open_status(&self, open: bool, seconds: u32);
}

impl<T: UserInterface> UserInterface for std::sync::Arc<T> {
    fn device_list_updated(&self) {
        (**self).device_list_updated();
    }

    fn device_status_updated(&self, address: &str, status: &BTreeMap<String, String>) {
        (**self).device_status_updated(address, status);
    }

    fn device_options_updated(&self, address: &str) {
        (**self).device_options_updated(address);
    }

    fn network_open_status(&self, open: bool, seconds: u32) {
        (**self).network_open_status(open, seconds);
    }
}
