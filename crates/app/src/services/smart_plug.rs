//! Smart plug — a switchable outlet with power-loss and indicator settings.

use std::sync::{Arc, Mutex, PoisonError};

use lighthub_domain::action::{Action, ActionKind, TurnOnOff, TurnOnOffMode};
use lighthub_domain::event::{ConsumedEvent, EventKind, InternalEvent};
use lighthub_domain::fields::Fields;
use lighthub_domain::option::{PreviewMode, ServiceOption};
use lighthub_domain::param::{ParamDescriptor, ParamInfo, ParamValue};
use tracing::debug;

use super::DeviceService;
use crate::ports::Device;

const TOGGLE: &str = "Toggle on/off";
const POWER_OUTAGE_MEMORY: &str = "Power outage memory";
const INDICATOR: &str = "Indicator";

/// Behaviour after a power cut, as `(display label, device value)`.
const POWER_OUTAGE_MEMORY_MODES: [(&str, &str); 3] =
    [("Off", "off"), ("On", "on"), ("Restore", "restore")];

/// Indicator LED behaviour, as `(display label, device value)`.
const INDICATOR_MODES: [(&str, &str); 4] = [
    ("Off", "off"),
    ("On", "on"),
    ("Normal", "off/on"),
    ("Inverse", "on/off"),
];

#[derive(Debug, Default)]
struct PlugState {
    on: bool,
    power_outage_memory: usize,
    indicator: usize,
}

pub struct SmartPlugService {
    device: Arc<dyn Device>,
    state: Mutex<PlugState>,
}

impl SmartPlugService {
    #[must_use]
    pub fn new(device: Arc<dyn Device>) -> Self {
        Self {
            device,
            state: Mutex::new(PlugState::default()),
        }
    }

    fn turn_on_off(&self, request: TurnOnOff) {
        let on = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.on = match request.mode {
                TurnOnOffMode::Toggle => !state.on,
                TurnOnOffMode::TurnOn => true,
                TurnOnOffMode::TurnOff => false,
            };
            state.on
        };
        self.device.send_state_change(on);
    }

    fn send_setting(&self, field: &str, value: &str) {
        let mut command = Fields::new();
        command.insert(field.to_string(), value.to_string());
        self.device.send_command(command);
    }
}

fn labels<const N: usize>(modes: &[(&str, &str); N]) -> ParamDescriptor {
    let labels: Vec<&str> = modes.iter().map(|(label, _)| *label).collect();
    ParamDescriptor::enumeration(&labels)
}

fn position<const N: usize>(modes: &[(&str, &str); N], label: &str) -> Option<usize> {
    modes.iter().position(|(l, _)| *l == label)
}

impl DeviceService for SmartPlugService {
    fn name(&self) -> &str {
        "Smart plug"
    }

    fn sinks(&self) -> Vec<ConsumedEvent> {
        vec![ConsumedEvent {
            kind: EventKind::Push,
            functionality: TOGGLE.to_string(),
        }]
    }

    fn handle_sink(&self, _functionality: &str, _event: &InternalEvent) {
        self.turn_on_off(TurnOnOff {
            mode: TurnOnOffMode::Toggle,
            user_generated: true,
        });
    }

    fn consumable_actions(&self) -> Vec<ActionKind> {
        vec![ActionKind::TurnOnOff]
    }

    fn invoke_action(&self, action: &Action) -> bool {
        match action {
            Action::TurnOnOff(request) => {
                self.turn_on_off(*request);
                true
            }
            Action::FadeToBrightness(_) => false,
        }
    }

    fn service_options(&self) -> Vec<ServiceOption> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        vec![
            ServiceOption {
                param: ParamInfo::new(POWER_OUTAGE_MEMORY, labels(&POWER_OUTAGE_MEMORY_MODES)),
                value: POWER_OUTAGE_MEMORY_MODES[state.power_outage_memory].0.to_string(),
                preview_mode: PreviewMode::None,
            },
            ServiceOption {
                param: ParamInfo::new(INDICATOR, labels(&INDICATOR_MODES)),
                value: INDICATOR_MODES[state.indicator].0.to_string(),
                preview_mode: PreviewMode::None,
            },
        ]
    }

    fn apply_option(&self, name: &str, value: &ParamValue) -> bool {
        let Some(label) = value.as_enum() else {
            return false;
        };
        let (field, device_value) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            match name {
                POWER_OUTAGE_MEMORY => {
                    let Some(index) = position(&POWER_OUTAGE_MEMORY_MODES, label) else {
                        return false;
                    };
                    state.power_outage_memory = index;
                    ("power_outage_memory", POWER_OUTAGE_MEMORY_MODES[index].1)
                }
                INDICATOR => {
                    let Some(index) = position(&INDICATOR_MODES, label) else {
                        return false;
                    };
                    state.indicator = index;
                    ("indicator_mode", INDICATOR_MODES[index].1)
                }
                _ => return false,
            }
        };
        debug!(address = self.device.address(), option = name, value = label, "applying plug option");
        self.send_setting(field, device_value);
        true
    }
}
