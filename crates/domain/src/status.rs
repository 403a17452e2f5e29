//! Status conversion — turns raw device message fields into display values.
//!
//! Each profile declares a table of `field -> (display name, conversion)`.
//! Fields not listed in the table are ignored.

use std::collections::BTreeMap;

use crate::fields::Fields;

/// How a raw field value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Identity,
    /// `1`/`true`/`on`/`yes` render as `On`, anything else as `Off`.
    Bool,
    /// Milli-units to units with two decimals and the given unit suffix (`3000` -> `3.00V`).
    MilliToUnit(&'static str),
    Percent,
    /// Mired to Kelvin (`1_000_000 / value`).
    InverseColorTemp,
    /// Append a unit suffix verbatim.
    Suffix(&'static str),
}

impl Conversion {
    #[must_use]
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Identity => value.to_string(),
            Self::Bool => {
                let lower = value.trim().to_lowercase();
                let on = matches!(lower.as_str(), "1" | "true" | "on" | "yes");
                if on { "On" } else { "Off" }.to_string()
            }
            Self::MilliToUnit(unit) => match value.trim().parse::<f64>() {
                Ok(milli) => format!("{:.2}{unit}", milli / 1000.0),
                Err(_) => value.to_string(),
            },
            Self::Percent => format!("{value}%"),
            Self::InverseColorTemp => match value.trim().parse::<f64>() {
                Ok(mired) if mired > 0.0 => format!("{:.0}K", 1_000_000.0 / mired),
                _ => value.to_string(),
            },
            Self::Suffix(unit) => format!("{value}{unit}"),
        }
    }
}

/// Declarative field table for one device profile.
#[derive(Debug, Clone, Default)]
pub struct StatusConverter {
    fields: BTreeMap<&'static str, (&'static str, Conversion)>,
}

impl StatusConverter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: &'static str, name: &'static str, conversion: Conversion) -> Self {
        self.fields.insert(field, (name, conversion));
        self
    }

    /// Convert the known fields of a message, keyed by display name.
    #[must_use]
    pub fn extract(&self, data: &Fields) -> BTreeMap<String, String> {
        data.iter()
            .filter_map(|(key, value)| {
                self.fields
                    .get(key.as_str())
                    .map(|(name, conversion)| ((*name).to_string(), conversion.apply(value)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::fields;

    #[test]
    fn should_render_bool_variants() {
        assert_eq!(Conversion::Bool.apply("ON"), "On");
        assert_eq!(Conversion::Bool.apply("1"), "On");
        assert_eq!(Conversion::Bool.apply("off"), "Off");
        assert_eq!(Conversion::Bool.apply("garbage"), "Off");
    }

    #[test]
    fn should_scale_milli_units() {
        assert_eq!(Conversion::MilliToUnit("V").apply("3000"), "3.00V");
        assert_eq!(Conversion::MilliToUnit("V").apply("n/a"), "n/a");
    }

    #[test]
    fn should_invert_mired_to_kelvin() {
        assert_eq!(Conversion::InverseColorTemp.apply("250"), "4000K");
        assert_eq!(Conversion::InverseColorTemp.apply("0"), "0");
    }

    #[test]
    fn should_extract_only_declared_fields() {
        let converter = StatusConverter::new()
            .with("battery", "Battery", Conversion::Percent)
            .with("state", "State", Conversion::Bool);
        let status = converter.extract(&fields([
            ("battery", "87"),
            ("state", "ON"),
            ("action", "single"),
        ]));
        assert_eq!(status.len(), 2);
        assert_eq!(status["Battery"], "87%");
        assert_eq!(status["State"], "On");
    }
}
