//! Message fields — the flat key/value payload exchanged with devices.

use std::collections::BTreeMap;

/// Raw device message or command payload.
pub type Fields = BTreeMap<String, String>;

/// Field carrying the name of a button/knob action.
pub const ACTION: &str = "action";

/// Field carrying the magnitude of a rotate action.
pub const ACTION_STEP_SIZE: &str = "action_step_size";

/// Build a [`Fields`] map from string pairs.
#[must_use]
pub fn fields<const N: usize>(pairs: [(&str, &str); N]) -> Fields {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
