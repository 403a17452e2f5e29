//! Runtime data — the aggregate root persisted by the storage port.
//!
//! Loaded once at startup and saved wholesale after any change to routes,
//! schedules or option values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::option::ServiceOptionValue;
use crate::route::EventRoute;
use crate::schedule::DeviceScheduleEntry;

/// All user configuration, keyed by device address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunTimeData {
    pub routes: BTreeMap<String, Vec<EventRoute>>,
    pub schedules: BTreeMap<String, Vec<DeviceScheduleEntry>>,
    pub service_option_values: BTreeMap<String, Vec<ServiceOptionValue>>,
}

impl RunTimeData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.schedules.is_empty() && self.service_option_values.is_empty()
    }
}
