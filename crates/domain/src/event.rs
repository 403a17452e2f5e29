//! Internal event — a normalized push/rotate notification produced by a
//! device service from a raw device message.
//!
//! Internal events are ephemeral: they are produced and consumed within one
//! message-handling pass and never persisted.

use serde::{Deserialize, Serialize};

/// The kind of an internal event, used to declare what a service provides or consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Push,
    Rotate,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push => f.write_str("Push"),
            Self::Rotate => f.write_str("Rotate"),
        }
    }
}

/// Payload of an internal event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InternalEventType {
    Push,
    Rotate {
        /// Rotation magnitude in degrees (always positive).
        degrees: f64,
        is_up: bool,
    },
}

/// A push or rotate emitted by the service named `service_name` on the
/// device at `source_address`.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalEvent {
    pub source_address: String,
    pub service_name: String,
    pub event_type: InternalEventType,
}

impl InternalEvent {
    #[must_use]
    pub fn push(source_address: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            source_address: source_address.into(),
            service_name: service_name.into(),
            event_type: InternalEventType::Push,
        }
    }

    #[must_use]
    pub fn rotate(
        source_address: impl Into<String>,
        service_name: impl Into<String>,
        degrees: f64,
        is_up: bool,
    ) -> Self {
        Self {
            source_address: source_address.into(),
            service_name: service_name.into(),
            event_type: InternalEventType::Rotate { degrees, is_up },
        }
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self.event_type {
            InternalEventType::Push => EventKind::Push,
            InternalEventType::Rotate { .. } => EventKind::Rotate,
        }
    }
}

/// An event a service can emit, as offered to the routing UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidedEvent {
    pub kind: EventKind,
    pub name: String,
}

/// A functionality a service exposes as a routing target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumedEvent {
    pub kind: EventKind,
    pub functionality: String,
}

/// Everything a device can be wired from and to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingOptions {
    pub provided_events: Vec<ProvidedEvent>,
    pub consumed_events: Vec<ConsumedEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_kind_of_push_and_rotate() {
        assert_eq!(InternalEvent::push("a", "Single").kind(), EventKind::Push);
        assert_eq!(
            InternalEvent::rotate("a", "Rotate normal", 15.0, true).kind(),
            EventKind::Rotate
        );
    }

    #[test]
    fn should_display_event_kind_names() {
        assert_eq!(EventKind::Push.to_string(), "Push");
        assert_eq!(EventKind::Rotate.to_string(), "Rotate");
    }
}
