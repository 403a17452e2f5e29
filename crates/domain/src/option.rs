//! Service options — named, persisted, user-configurable settings on a
//! device service.

use serde::{Deserialize, Serialize};

use crate::param::ParamInfo;

/// How the UI may preview an option value on the live device before saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PreviewMode {
    /// No preview, or end an ongoing preview.
    #[default]
    None,
    /// Show the light at the given linear (un-gamma-corrected) brightness.
    Brightness,
}

/// A configurable setting as offered to the UI, with its current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOption {
    pub param: ParamInfo,
    pub value: String,
    pub preview_mode: PreviewMode,
}

/// A persisted option value, keyed per device address in the runtime data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOptionValue {
    pub name: String,
    pub value: String,
}

impl ServiceOptionValue {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
