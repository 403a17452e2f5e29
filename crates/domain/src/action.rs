//! Action — the closed set of named, parameterized operations a device
//! service can expose for scheduling.
//!
//! Each [`ActionKind`] declares its parameters; [`Action::decode`] turns the
//! persisted string parameters of a schedule entry into the typed payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::param::{ParamDescriptor, ParamError, ParamInfo};

/// How a turn on/off request should change the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnOnOffMode {
    #[default]
    Toggle,
    TurnOn,
    TurnOff,
}

impl TurnOnOffMode {
    pub const LABELS: [&'static str; 3] = ["Toggle", "Turn on", "Turn off"];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Toggle => Self::LABELS[0],
            Self::TurnOn => Self::LABELS[1],
            Self::TurnOff => Self::LABELS[2],
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Toggle" => Some(Self::Toggle),
            "Turn on" => Some(Self::TurnOn),
            "Turn off" => Some(Self::TurnOff),
            _ => None,
        }
    }
}

/// Payload of the `Turn on/off` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOnOff {
    pub mode: TurnOnOffMode,
    /// Set for direct user input (a routed button press); scheduled
    /// invocations are not user generated.
    pub user_generated: bool,
}

/// Payload of the `Fade to brightness` action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeToBrightness {
    /// Normalized target brightness.
    pub brightness: f64,
    /// Total fade duration in minutes.
    pub duration_minutes: i64,
}

/// Names of the actions a service may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    TurnOnOff,
    FadeToBrightness,
}

impl ActionKind {
    pub const ALL: [Self; 2] = [Self::TurnOnOff, Self::FadeToBrightness];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TurnOnOff => "Turn on/off",
            Self::FadeToBrightness => "Fade to brightness",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Declared parameters, in display order.
    #[must_use]
    pub fn parameters(self) -> Vec<ParamInfo> {
        match self {
            Self::TurnOnOff => vec![ParamInfo::new(
                "Mode",
                ParamDescriptor::enumeration(&TurnOnOffMode::LABELS),
            )],
            Self::FadeToBrightness => vec![
                ParamInfo::new("Brightness", ParamDescriptor::Brightness),
                ParamInfo::new("Duration", ParamDescriptor::int(1, 120, Some("min"))),
            ],
        }
    }

    /// The action as advertised to the scheduling UI.
    #[must_use]
    pub fn describe(self) -> ConsumableAction {
        ConsumableAction {
            name: self.name().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// An action advertised by a device, with its parameter declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableAction {
    pub name: String,
    pub parameters: Vec<ParamInfo>,
}

/// A decoded, ready-to-invoke action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    TurnOnOff(TurnOnOff),
    FadeToBrightness(FadeToBrightness),
}

impl Action {
    /// Decode persisted string parameters into a typed action.
    ///
    /// The parameter keys must match the declared parameter names exactly.
    /// Decoded actions are never user generated.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] if a parameter is missing, unexpected, or fails
    /// to decode against its descriptor.
    pub fn decode(kind: ActionKind, params: &BTreeMap<String, String>) -> Result<Self, ParamError> {
        let declared = kind.parameters();
        if let Some(extra) = params
            .keys()
            .find(|key| !declared.iter().any(|p| &p.name == *key))
        {
            return Err(ParamError::Unexpected(extra.clone()));
        }
        let value = |name: &str| {
            let info = declared
                .iter()
                .find(|p| p.name == name)
                .ok_or_else(|| ParamError::Missing(name.to_string()))?;
            let raw = params
                .get(name)
                .ok_or_else(|| ParamError::Missing(name.to_string()))?;
            info.param.decode(raw)
        };

        match kind {
            ActionKind::TurnOnOff => {
                let mode = value("Mode")?;
                let mode = mode
                    .as_enum()
                    .and_then(TurnOnOffMode::from_label)
                    .ok_or_else(|| ParamError::WrongType("Mode".to_string()))?;
                Ok(Self::TurnOnOff(TurnOnOff {
                    mode,
                    user_generated: false,
                }))
            }
            ActionKind::FadeToBrightness => {
                let brightness = value("Brightness")?
                    .as_f64()
                    .ok_or_else(|| ParamError::WrongType("Brightness".to_string()))?;
                let duration_minutes = value("Duration")?
                    .as_i64()
                    .ok_or_else(|| ParamError::WrongType("Duration".to_string()))?;
                Ok(Self::FadeToBrightness(FadeToBrightness {
                    brightness,
                    duration_minutes,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn should_decode_turn_on_off_with_mode() {
        let action = Action::decode(ActionKind::TurnOnOff, &params(&[("Mode", "Turn off")])).unwrap();
        assert_eq!(
            action,
            Action::TurnOnOff(TurnOnOff {
                mode: TurnOnOffMode::TurnOff,
                user_generated: false,
            })
        );
    }

    #[test]
    fn should_decode_fade_to_brightness() {
        let action = Action::decode(
            ActionKind::FadeToBrightness,
            &params(&[("Brightness", "0.75"), ("Duration", "15")]),
        )
        .unwrap();
        assert_eq!(
            action,
            Action::FadeToBrightness(FadeToBrightness {
                brightness: 0.75,
                duration_minutes: 15,
            })
        );
    }

    #[test]
    fn should_reject_missing_parameter() {
        let result = Action::decode(ActionKind::FadeToBrightness, &params(&[("Brightness", "0.5")]));
        assert_eq!(result, Err(ParamError::Missing("Duration".to_string())));
    }

    #[test]
    fn should_reject_unexpected_parameter() {
        let result = Action::decode(
            ActionKind::TurnOnOff,
            &params(&[("Mode", "Toggle"), ("Speed", "fast")]),
        );
        assert_eq!(result, Err(ParamError::Unexpected("Speed".to_string())));
    }

    #[test]
    fn should_look_up_kind_by_display_name() {
        assert_eq!(ActionKind::from_name("Turn on/off"), Some(ActionKind::TurnOnOff));
        assert_eq!(ActionKind::from_name("Dance"), None);
    }

    #[test]
    fn should_describe_declared_parameters() {
        let described = ActionKind::FadeToBrightness.describe();
        let names: Vec<_> = described.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Brightness", "Duration"]);
    }
}
