//! Schedule — persisted per-device entries that invoke a consumable action
//! at a time of day on selected weekdays.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::action::ConsumableAction;
use crate::error::ValidationError;
use crate::time::{LocalTime, weekday_index};

/// Hour and minute of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    #[must_use]
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Weekdays (Monday = 0 .. Sunday = 6) and a time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTrigger {
    pub days: BTreeSet<u8>,
    pub time: TimeOfDay,
}

impl ScheduleTrigger {
    #[must_use]
    pub fn new(days: impl IntoIterator<Item = u8>, time: TimeOfDay) -> Self {
        Self {
            days: days.into_iter().collect(),
            time,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.days.iter().all(|d| *d < 7) && self.time.is_valid()
    }

    /// Whether the trigger fires at the given minute.
    #[must_use]
    pub fn matches(&self, now: &LocalTime) -> bool {
        self.days.contains(&weekday_index(now))
            && u32::from(self.time.hour) == now.hour()
            && u32::from(self.time.minute) == now.minute()
    }
}

impl std::fmt::Display for ScheduleTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let days: Vec<String> = self.days.iter().map(ToString::to_string).collect();
        write!(f, "days [{}] at {}", days.join(", "), self.time)
    }
}

/// Invoke `event_type` with `parameters` whenever `trigger` matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceScheduleEntry {
    /// Name of a consumable action of the device.
    pub event_type: String,
    pub parameters: BTreeMap<String, String>,
    pub trigger: ScheduleTrigger,
}

impl DeviceScheduleEntry {
    /// Check the entry against the actions the device currently exposes.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::UnknownAction`] if no eligible action has this name
    /// - [`ValidationError::ParameterMismatch`] if parameter names or count
    ///   differ from the declaration, or a value fails its descriptor
    /// - [`ValidationError::InvalidTrigger`] if a day, hour or minute is out of range
    pub fn validate(&self, eligible: &[ConsumableAction]) -> Result<(), ValidationError> {
        let action = eligible
            .iter()
            .find(|a| a.name == self.event_type)
            .ok_or_else(|| ValidationError::UnknownAction(self.event_type.clone()))?;

        let mismatch = || ValidationError::ParameterMismatch(self.event_type.clone());
        if self.parameters.len() != action.parameters.len() {
            return Err(mismatch());
        }
        for (key, value) in &self.parameters {
            let param = action
                .parameters
                .iter()
                .find(|p| &p.name == key)
                .ok_or_else(mismatch)?;
            if !param.param.validate(value) {
                return Err(mismatch());
            }
        }

        if !self.trigger.is_valid() {
            return Err(ValidationError::InvalidTrigger);
        }
        Ok(())
    }
}

impl std::fmt::Display for DeviceScheduleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        write!(
            f,
            "{} with {} on {}",
            self.event_type,
            params.join(", "),
            self.trigger
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use chrono::NaiveDate;

    fn monday_at(h: u32, m: u32) -> LocalTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 30)
            .unwrap()
    }

    fn turn_off_entry(days: &[u8], hour: u8, minute: u8) -> DeviceScheduleEntry {
        DeviceScheduleEntry {
            event_type: "Turn on/off".to_string(),
            parameters: [("Mode".to_string(), "Turn off".to_string())].into(),
            trigger: ScheduleTrigger::new(days.iter().copied(), TimeOfDay::new(hour, minute)),
        }
    }

    #[test]
    fn should_match_when_day_hour_and_minute_match() {
        let trigger = ScheduleTrigger::new([0, 2], TimeOfDay::new(7, 15));
        assert!(trigger.matches(&monday_at(7, 15)));
    }

    #[test]
    fn should_not_match_other_minute_or_day() {
        let trigger = ScheduleTrigger::new([1], TimeOfDay::new(7, 15));
        assert!(!trigger.matches(&monday_at(7, 15)));

        let trigger = ScheduleTrigger::new([0], TimeOfDay::new(7, 15));
        assert!(!trigger.matches(&monday_at(7, 16)));
    }

    #[test]
    fn should_accept_entry_matching_declared_action() {
        let eligible = vec![ActionKind::TurnOnOff.describe()];
        assert!(turn_off_entry(&[0], 7, 0).validate(&eligible).is_ok());
    }

    #[test]
    fn should_reject_entry_naming_absent_action() {
        let eligible = vec![ActionKind::FadeToBrightness.describe()];
        assert_eq!(
            turn_off_entry(&[0], 7, 0).validate(&eligible),
            Err(ValidationError::UnknownAction("Turn on/off".to_string()))
        );
    }

    #[test]
    fn should_reject_entry_with_wrong_parameter_arity() {
        let eligible = vec![ActionKind::TurnOnOff.describe()];
        let mut entry = turn_off_entry(&[0], 7, 0);
        entry.parameters.insert("Extra".to_string(), "1".to_string());
        assert!(matches!(
            entry.validate(&eligible),
            Err(ValidationError::ParameterMismatch(_))
        ));
    }

    #[test]
    fn should_reject_entry_with_out_of_range_trigger() {
        let eligible = vec![ActionKind::TurnOnOff.describe()];
        assert_eq!(
            turn_off_entry(&[7], 7, 0).validate(&eligible),
            Err(ValidationError::InvalidTrigger)
        );
        assert_eq!(
            turn_off_entry(&[0], 24, 0).validate(&eligible),
            Err(ValidationError::InvalidTrigger)
        );
    }

    #[test]
    fn should_display_entry() {
        let entry = turn_off_entry(&[0, 4], 6, 5);
        assert_eq!(
            entry.to_string(),
            "Turn on/off with Mode=Turn off on days [0, 4] at 06:05"
        );
    }
}
