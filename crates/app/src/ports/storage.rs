//! Storage port — load and save the persisted runtime data.

use std::future::Future;

use lighthub_domain::error::HubError;
use lighthub_domain::runtime_data::RunTimeData;

/// Persistence for routes, schedules and option values.
pub trait DataStorage: Send + Sync {
    /// Load the stored data.
    ///
    /// Never fails the caller: a missing or unreadable store yields
    /// [`RunTimeData::default`].
    fn load(&self) -> RunTimeData;

    /// Replace the stored data.
    fn save(&self, data: RunTimeData) -> impl Future<Output = Result<(), HubError>> + Send;
}

impl<T: DataStorage> DataStorage for std::sync::Arc<T> {
    fn load(&self) -> RunTimeData {
        (**self).load()
    }

    fn save(&self, data: RunTimeData) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).save(data)
    }
}
