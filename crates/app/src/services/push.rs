//! Push — emits a push event when a message's `action` equals a trigger.

use lighthub_domain::event::{EventKind, InternalEvent, ProvidedEvent};
use lighthub_domain::fields::{ACTION, Fields};

use super::DeviceService;
use crate::ports::Device;

pub struct PushService {
    name: String,
    trigger: String,
}

impl PushService {
    /// A push source named `name`, fired by `action = trigger`.
    #[must_use]
    pub fn new(name: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger: trigger.into(),
        }
    }
}

impl DeviceService for PushService {
    fn name(&self) -> &str {
        &self.name
    }

    fn provided_events(&self) -> Vec<ProvidedEvent> {
        vec![ProvidedEvent {
            kind: EventKind::Push,
            name: self.name.clone(),
        }]
    }

    fn process_external_event(&self, device: &dyn Device, data: &Fields) -> Vec<InternalEvent> {
        if self.trigger.is_empty() {
            return Vec::new();
        }
        match data.get(ACTION) {
            Some(action) if *action == self.trigger => {
                vec![InternalEvent::push(device.address(), self.name.clone())]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDevice;
    use lighthub_domain::fields::fields;

    #[test]
    fn should_emit_push_when_action_matches_trigger() {
        let device = RecordingDevice::new("0x01", "eWeLink", "WB01");
        let service = PushService::new("Single", "single");

        let events = service.process_external_event(device.as_ref(), &fields([("action", "single")]));

        assert_eq!(events, vec![InternalEvent::push("0x01", "Single")]);
    }

    #[test]
    fn should_ignore_message_when_action_differs_or_missing() {
        let device = RecordingDevice::new("0x01", "eWeLink", "WB01");
        let service = PushService::new("Single", "single");

        assert!(service
            .process_external_event(device.as_ref(), &fields([("action", "double")]))
            .is_empty());
        assert!(service
            .process_external_event(device.as_ref(), &fields([("battery", "90")]))
            .is_empty());
    }

    #[test]
    fn should_never_fire_when_trigger_is_empty() {
        let device = RecordingDevice::new("0x01", "eWeLink", "WB01");
        let service = PushService::new("Single", "");
        assert!(service
            .process_external_event(device.as_ref(), &fields([("action", "")]))
            .is_empty());
    }
}
