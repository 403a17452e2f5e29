//! Device service collection — the capability set built for one device.
//!
//! A collection is a named profile: an explicit list of top-level services
//! plus a status field table. Every query aggregates over the services in
//! declaration order.

use std::collections::BTreeMap;

use lighthub_domain::action::{Action, ActionKind, ConsumableAction};
use lighthub_domain::error::ValidationError;
use lighthub_domain::event::{ConsumedEvent, InternalEvent, ProvidedEvent, RoutingOptions};
use lighthub_domain::fields::Fields;
use lighthub_domain::option::{PreviewMode, ServiceOption, ServiceOptionValue};
use lighthub_domain::param::ParamValue;
use lighthub_domain::status::StatusConverter;
use tracing::{debug, warn};

use crate::ports::Device;
use crate::services::DeviceService;

pub struct DeviceServiceCollection {
    profile: String,
    services: Vec<Box<dyn DeviceService>>,
    status: StatusConverter,
}

impl DeviceServiceCollection {
    #[must_use]
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            services: Vec::new(),
            status: StatusConverter::new(),
        }
    }

    /// The collection for a device no profile matches.
    #[must_use]
    pub fn empty() -> Self {
        Self::new("")
    }

    #[must_use]
    pub fn with_service(mut self, service: impl DeviceService + 'static) -> Self {
        self.services.push(Box::new(service));
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusConverter) -> Self {
        self.status = status;
        self
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Display status fields found in a raw message.
    pub fn extract_status(&self, data: &Fields) -> BTreeMap<String, String> {
        self.status.extract(data)
    }

    pub fn process_external_event(&self, device: &dyn Device, data: &Fields) -> Vec<InternalEvent> {
        self.services
            .iter()
            .flat_map(|service| service.process_external_event(device, data))
            .collect()
    }

    pub fn process_internal_event(&self, event: &InternalEvent, functionality: &str) {
        for service in &self.services {
            service.process_internal_event(event, functionality);
        }
    }

    pub fn provided_events(&self) -> Vec<ProvidedEvent> {
        self.services
            .iter()
            .flat_map(|service| service.provided_events())
            .collect()
    }

    pub fn consumed_events(&self) -> Vec<ConsumedEvent> {
        self.services
            .iter()
            .flat_map(|service| service.consumed_events())
            .collect()
    }

    pub fn routing_options(&self) -> RoutingOptions {
        RoutingOptions {
            provided_events: self.provided_events(),
            consumed_events: self.consumed_events(),
        }
    }

    /// Schedulable actions, each listed once.
    pub fn consumable_actions(&self) -> Vec<ConsumableAction> {
        self.action_kinds()
            .into_iter()
            .map(ActionKind::describe)
            .collect()
    }

    fn action_kinds(&self) -> Vec<ActionKind> {
        let mut kinds: Vec<ActionKind> = Vec::new();
        for kind in self.services.iter().flat_map(|service| service.consumable_actions()) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    pub fn service_options(&self) -> Vec<ServiceOption> {
        self.services
            .iter()
            .flat_map(|service| service.service_options())
            .collect()
    }

    /// Check an option value against the declared options without applying it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidOption`] when no service declares the
    /// option or the value does not decode against its descriptor.
    pub fn validate_option_value(&self, value: &ServiceOptionValue) -> Result<(), ValidationError> {
        self.decode_option(value).map(|_| ())
    }

    fn decode_option(&self, value: &ServiceOptionValue) -> Result<ParamValue, ValidationError> {
        let invalid = || ValidationError::InvalidOption(value.name.clone());
        let option = self
            .service_options()
            .into_iter()
            .find(|option| option.param.name == value.name)
            .ok_or_else(invalid)?;
        option.param.param.decode(&value.value).map_err(|_| invalid())
    }

    /// Apply persisted option values onto the live services.
    ///
    /// Best effort: a value that fails to decode is reported and skipped,
    /// the rest are still applied. Returns the number applied.
    pub fn set_service_option_values(&self, values: &[ServiceOptionValue]) -> usize {
        let mut applied = 0;
        for value in values {
            match self.decode_option(value) {
                Ok(decoded) => {
                    if self
                        .services
                        .iter()
                        .any(|service| service.apply_option(&value.name, &decoded))
                    {
                        applied += 1;
                    }
                }
                Err(err) => {
                    warn!(profile = %self.profile, option = %value.name, value = %value.value, error = %err, "skipping option value");
                }
            }
        }
        applied
    }

    /// Decode and invoke a scheduled action by name.
    ///
    /// Returns `true` only if the action exists on this collection, its
    /// parameters decode and a service handled it.
    pub fn process_schedule_action(&self, name: &str, params: &BTreeMap<String, String>) -> bool {
        let Some(kind) = ActionKind::from_name(name).filter(|kind| self.action_kinds().contains(kind))
        else {
            debug!(profile = %self.profile, action = name, "action not exposed");
            return false;
        };
        let action = match Action::decode(kind, params) {
            Ok(action) => action,
            Err(err) => {
                warn!(profile = %self.profile, action = name, error = %err, "cannot decode action parameters");
                return false;
            }
        };
        self.services
            .iter()
            .any(|service| service.invoke_action(&action))
    }

    pub fn preview_option(&self, value: &str, mode: PreviewMode) {
        for service in &self.services {
            service.preview_option(value, mode);
        }
    }

    pub fn shutdown(&self) {
        for service in &self.services {
            service.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{DimmableLightService, ServiceContext, SingleButtonService, SmartPlugService};
    use crate::testing::{RecordingDevice, Sent};
    use lighthub_domain::fields::fields;
    use lighthub_domain::status::Conversion;
    use std::sync::Arc;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn should_aggregate_provided_events_and_status() {
        let device = RecordingDevice::new("0x01", "eWeLink", "WB01");
        let collection = DeviceServiceCollection::new("WB01")
            .with_service(SingleButtonService::new("single", "double", "long"))
            .with_status(StatusConverter::new().with("battery", "Battery", Conversion::Percent));

        let options = collection.routing_options();
        assert_eq!(options.provided_events.len(), 3);
        assert!(options.consumed_events.is_empty());
        assert!(collection.consumable_actions().is_empty());

        let events = collection.process_external_event(
            device.as_ref(),
            &fields([("action", "long"), ("battery", "50")]),
        );
        assert_eq!(events, vec![InternalEvent::push("0x01", "Long")]);
        assert_eq!(
            collection.extract_status(&fields([("battery", "50")]))["Battery"],
            "50%"
        );
    }

    #[test]
    fn should_report_empty_collection() {
        let collection = DeviceServiceCollection::empty();
        assert!(collection.is_empty());
        assert!(collection.routing_options().provided_events.is_empty());
        assert!(!collection.process_schedule_action("Turn on/off", &params(&[("Mode", "Toggle")])));
    }

    #[test]
    fn should_invoke_schedule_action_when_exposed() {
        let device = RecordingDevice::new("0x03", "_TZ3000_nkcobies", "TS011F");
        let collection =
            DeviceServiceCollection::new("TS011F").with_service(SmartPlugService::new(device.clone()));

        assert!(collection.process_schedule_action("Turn on/off", &params(&[("Mode", "Turn on")])));
        assert!(!collection.process_schedule_action(
            "Fade to brightness",
            &params(&[("Brightness", "0.5"), ("Duration", "10")])
        ));
        assert!(!collection.process_schedule_action("Turn on/off", &params(&[("Mode", "Sideways")])));

        assert_eq!(device.sent(), vec![Sent::State(true)]);
    }

    #[test]
    fn should_apply_valid_options_and_skip_invalid_ones() {
        let device = RecordingDevice::new("0x03", "_TZ3000_nkcobies", "TS011F");
        let collection =
            DeviceServiceCollection::new("TS011F").with_service(SmartPlugService::new(device.clone()));

        let applied = collection.set_service_option_values(&[
            ServiceOptionValue::new("Indicator", "Blinking"),
            ServiceOptionValue::new("Unknown", "On"),
            ServiceOptionValue::new("Power outage memory", "On"),
        ]);

        assert_eq!(applied, 1);
        assert_eq!(
            device.sent(),
            vec![Sent::Command(fields([("power_outage_memory", "on")]))]
        );
        assert!(collection
            .validate_option_value(&ServiceOptionValue::new("Indicator", "Normal"))
            .is_ok());
        assert_eq!(
            collection.validate_option_value(&ServiceOptionValue::new("Indicator", "Blinking")),
            Err(ValidationError::InvalidOption("Indicator".to_string()))
        );
    }

    #[tokio::test]
    async fn should_list_each_action_once() {
        let device = RecordingDevice::new("0x10", "TallDane", "Pi5");
        let context = ServiceContext::current();
        let device: Arc<dyn Device> = device;
        let collection = DeviceServiceCollection::new("Pi5")
            .with_service(DimmableLightService::new(device.clone(), 100, &context))
            .with_service(DimmableLightService::new(device, 100, &context));

        let names: Vec<String> = collection
            .consumable_actions()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, ["Turn on/off", "Fade to brightness"]);
    }
}
