//! Device services — the capability units a device profile is built from.
//!
//! A service translates raw device messages into [`InternalEvent`]s
//! (buttons, knobs), reacts to routed events through named sinks (lights,
//! plugs), exposes schedulable [`Action`]s and user-configurable options.
//! Composite services own child services and forward to them; every
//! aggregate (provided/consumed events, actions, options) is the union of
//! the service's own declarations and its children's.

pub mod auto_mode_change;
pub mod cct_light;
pub mod dimmable_light;
pub mod push;
pub mod rotate;
pub mod single_button;
pub mod smart_knob;
pub mod smart_plug;
mod timer;

use lighthub_domain::action::{Action, ActionKind};
use lighthub_domain::event::{ConsumedEvent, InternalEvent, ProvidedEvent};
use lighthub_domain::fields::Fields;
use lighthub_domain::option::{PreviewMode, ServiceOption};
use lighthub_domain::param::ParamValue;
use tokio::runtime::Handle;

use crate::ports::Device;

pub use auto_mode_change::AutoModeChangeService;
pub use cct_light::CctLightService;
pub use dimmable_light::DimmableLightService;
pub use push::PushService;
pub use rotate::RotateService;
pub use single_button::SingleButtonService;
pub use smart_knob::SmartKnobService;
pub use smart_plug::SmartPlugService;

/// Shared resources handed to service factories.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// Runtime on which services spawn their timers.
    pub runtime: Handle,
}

impl ServiceContext {
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Context bound to the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

/// One capability unit of a device profile.
pub trait DeviceService: Send + Sync {
    /// Name of the service; for event sources this is the provided event name.
    fn name(&self) -> &str;

    /// Owned child services.
    fn children(&self) -> &[Box<dyn DeviceService>] {
        &[]
    }

    /// Sinks declared by this service itself, excluding children.
    fn sinks(&self) -> Vec<ConsumedEvent> {
        Vec::new()
    }

    /// Handle an event delivered to one of [`Self::sinks`].
    ///
    /// Only called when both the functionality name and the event kind match.
    fn handle_sink(&self, _functionality: &str, _event: &InternalEvent) {}

    /// Events this service (and its children) can emit.
    fn provided_events(&self) -> Vec<ProvidedEvent> {
        self.children()
            .iter()
            .flat_map(|child| child.provided_events())
            .collect()
    }

    /// Functionalities this service (and its children) accept as route targets.
    fn consumed_events(&self) -> Vec<ConsumedEvent> {
        let mut events = self.sinks();
        events.extend(self.children().iter().flat_map(|child| child.consumed_events()));
        events
    }

    /// Translate a raw device message into zero or more internal events.
    fn process_external_event(&self, device: &dyn Device, data: &Fields) -> Vec<InternalEvent> {
        self.children()
            .iter()
            .flat_map(|child| child.process_external_event(device, data))
            .collect()
    }

    /// Deliver a routed event to the sink named `functionality`.
    ///
    /// Events whose kind does not match the sink's declared kind are ignored.
    fn process_internal_event(&self, event: &InternalEvent, functionality: &str) {
        let kind = event.kind();
        if self
            .sinks()
            .iter()
            .any(|sink| sink.functionality == functionality && sink.kind == kind)
        {
            self.handle_sink(functionality, event);
        }
        for child in self.children() {
            child.process_internal_event(event, functionality);
        }
    }

    /// Actions this service (and its children) can be scheduled with.
    fn consumable_actions(&self) -> Vec<ActionKind> {
        self.children()
            .iter()
            .flat_map(|child| child.consumable_actions())
            .collect()
    }

    /// Invoke an action; returns `true` if some service handled it.
    fn invoke_action(&self, action: &Action) -> bool {
        self.children()
            .iter()
            .any(|child| child.invoke_action(action))
    }

    /// Configurable options with their current values.
    fn service_options(&self) -> Vec<ServiceOption> {
        self.children()
            .iter()
            .flat_map(|child| child.service_options())
            .collect()
    }

    /// Apply a decoded option value; returns `true` if some service owns the option.
    fn apply_option(&self, name: &str, value: &ParamValue) -> bool {
        self.children()
            .iter()
            .any(|child| child.apply_option(name, value))
    }

    /// Preview an option value on the live device, or end the preview.
    fn preview_option(&self, value: &str, mode: PreviewMode) {
        for child in self.children() {
            child.preview_option(value, mode);
        }
    }

    /// Stop any background work.
    fn shutdown(&self) {
        for child in self.children() {
            child.shutdown();
        }
    }
}
