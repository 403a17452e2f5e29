//! Device port — a physical (or simulated) unit owned by a device bus.
//!
//! Outbound writes are fire-and-forget: the bus adapter queues them on its
//! own transport. They are called from timer callbacks while a service holds
//! its private state lock, so they must never block on the controller.

use lighthub_domain::fields::Fields;

/// A device as exposed by its bus.
///
/// Identity (`address`, `vendor`, `model`, `description`, `battery_powered`)
/// never changes for a discovered unit; only the name is mutable.
pub trait Device: Send + Sync {
    /// Unique bus address (e.g. an IEEE address).
    fn address(&self) -> &str;

    fn vendor(&self) -> &str;

    fn model(&self) -> &str;

    fn description(&self) -> &str;

    fn battery_powered(&self) -> bool;

    /// Current user-visible name.
    fn name(&self) -> String;

    /// Send a raw command payload.
    fn send_command(&self, data: Fields);

    /// Move to a raw brightness over `transition_secs`.
    fn send_brightness_transition(&self, brightness: i64, transition_secs: f64);

    /// Move to a raw color temperature over `transition_secs`.
    fn send_color_temp_transition(&self, color_temp: i64, transition_secs: f64);

    fn send_state_change(&self, on: bool);

    /// Ask the bus to rename the device.
    fn set_name(&self, name: &str);
}
