//! Parameter descriptors — typed declarations for action parameters and
//! service options, plus decoding of their persisted string form.

use serde::{Deserialize, Serialize};

/// Declared type and range of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamDescriptor {
    /// One of a fixed list of display values; the first is the default.
    Enum { values: Vec<String> },
    /// Inclusive float range.
    Float { min: f64, max: f64 },
    /// Normalized brightness, a float in `0.0..=1.0`.
    Brightness,
    /// Inclusive integer range with an optional display unit.
    Int {
        min: i64,
        max: i64,
        unit: Option<String>,
    },
}

impl ParamDescriptor {
    #[must_use]
    pub fn enumeration(values: &[&str]) -> Self {
        Self::Enum {
            values: values.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn float(min: f64, max: f64) -> Self {
        Self::Float { min, max }
    }

    #[must_use]
    pub fn int(min: i64, max: i64, unit: Option<&str>) -> Self {
        Self::Int {
            min,
            max,
            unit: unit.map(ToString::to_string),
        }
    }

    /// Decode a persisted string into a typed value, checking the range.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] when the string does not parse as the declared
    /// type or lies outside the declared range.
    pub fn decode(&self, raw: &str) -> Result<ParamValue, ParamError> {
        let raw = raw.trim();
        match self {
            Self::Enum { values } => values
                .iter()
                .find(|v| v.as_str() == raw)
                .map(|v| ParamValue::Enum(v.clone()))
                .ok_or_else(|| ParamError::UnknownVariant(raw.to_string())),
            Self::Float { min, max } => decode_float(raw, *min, *max),
            Self::Brightness => decode_float(raw, 0.0, 1.0),
            Self::Int { min, max, .. } => {
                let value: i64 = raw
                    .parse()
                    .map_err(|_| ParamError::NotANumber(raw.to_string()))?;
                if value < *min || value > *max {
                    return Err(ParamError::OutOfRange(raw.to_string()));
                }
                Ok(ParamValue::Int(value))
            }
        }
    }

    /// Whether `raw` decodes successfully.
    #[must_use]
    pub fn validate(&self, raw: &str) -> bool {
        self.decode(raw).is_ok()
    }
}

fn decode_float(raw: &str, min: f64, max: f64) -> Result<ParamValue, ParamError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| ParamError::NotANumber(raw.to_string()))?;
    if !value.is_finite() || value < min || value > max {
        return Err(ParamError::OutOfRange(raw.to_string()));
    }
    Ok(ParamValue::Float(value))
}

/// A named parameter declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    pub param: ParamDescriptor,
}

impl ParamInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, param: ParamDescriptor) -> Self {
        Self {
            name: name.into(),
            param,
        }
    }
}

/// A decoded parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Enum(String),
    Float(f64),
    Int(i64),
}

impl ParamValue {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Some(*v as f64),
            Self::Enum(_) => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(_) | Self::Enum(_) => None,
        }
    }

    #[must_use]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Self::Enum(v) => Some(v),
            Self::Float(_) | Self::Int(_) => None,
        }
    }
}

/// Why a parameter string could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("`{0}` is out of range")]
    OutOfRange(String),

    #[error("`{0}` is not one of the allowed values")]
    UnknownVariant(String),

    #[error("missing parameter `{0}`")]
    Missing(String),

    #[error("unexpected parameter `{0}`")]
    Unexpected(String),

    #[error("parameter `{0}` has the wrong type")]
    WrongType(String),
}
