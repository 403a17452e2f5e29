//! Headless user interface — reports controller notifications to the log.

use std::collections::BTreeMap;

use lighthub_app::ports::UserInterface;
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogUserInterface;

impl UserInterface for LogUserInterface {
    fn device_list_updated(&self) {
        info!("device list updated");
    }

    fn device_status_updated(&self, address: &str, status: &BTreeMap<String, String>) {
        info!(address, ?status, "device status updated");
    }

    fn device_options_updated(&self, address: &str) {
        info!(address, "device options updated");
    }

    fn network_open_status(&self, open: bool, seconds: u32) {
        info!(open, seconds, "network open status");
    }
}
