//! Clock port — local wall-clock time for schedule evaluation.

use lighthub_domain::time::{self, LocalTime};

pub trait Clock: Send + Sync {
    fn now(&self) -> LocalTime;
}

/// The system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> LocalTime {
        time::now()
    }
}

impl<T: Clock> Clock for std::sync::Arc<T> {
    fn now(&self) -> LocalTime {
        (**self).now()
    }
}
