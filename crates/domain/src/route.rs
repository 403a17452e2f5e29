//! Event route — persisted wiring from a source device's event to a target
//! device's functionality.
//!
//! Routes are keyed by source address in the runtime data, so the source
//! address itself is not part of the route.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// `source_event` on the owning device fires `target_functionality` on `target_address`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRoute {
    /// Name of the emitting service on the source device.
    pub source_event: String,
    pub target_address: String,
    /// Name of the target service's consumed functionality.
    pub target_functionality: String,
}

impl EventRoute {
    #[must_use]
    pub fn new(
        source_event: impl Into<String>,
        target_address: impl Into<String>,
        target_functionality: impl Into<String>,
    ) -> Self {
        Self {
            source_event: source_event.into(),
            target_address: target_address.into(),
            target_functionality: target_functionality.into(),
        }
    }

    /// Check that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source_event.trim().is_empty() {
            return Err(ValidationError::EmptyField("source_event"));
        }
        if self.target_address.trim().is_empty() {
            return Err(ValidationError::EmptyField("target_address"));
        }
        if self.target_functionality.trim().is_empty() {
            return Err(ValidationError::EmptyField("target_functionality"));
        }
        Ok(())
    }
}

impl std::fmt::Display for EventRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}:{}",
            self.source_event, self.target_address, self.target_functionality
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_route_with_all_fields() {
        let route = EventRoute::new("Single", "00:11", "Toggle on/off");
        assert!(route.validate().is_ok());
    }

    #[test]
    fn should_reject_route_with_blank_target() {
        let route = EventRoute::new("Single", "  ", "Toggle on/off");
        assert_eq!(
            route.validate(),
            Err(ValidationError::EmptyField("target_address"))
        );
    }

    #[test]
    fn should_display_route() {
        let route = EventRoute::new("Single", "00:11", "Toggle on/off");
        assert_eq!(route.to_string(), "Single -> 00:11:Toggle on/off");
    }
}
