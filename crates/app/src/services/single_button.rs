//! Single button — one physical button reporting single, double and long presses.

use super::{DeviceService, PushService};

/// Composite of the `Single`, `Double` and `Long` push sources.
pub struct SingleButtonService {
    children: Vec<Box<dyn DeviceService>>,
}

impl SingleButtonService {
    #[must_use]
    pub fn new(single: &str, double: &str, long: &str) -> Self {
        Self {
            children: vec![
                Box::new(PushService::new("Single", single)),
                Box::new(PushService::new("Double", double)),
                Box::new(PushService::new("Long", long)),
            ],
        }
    }
}

impl DeviceService for SingleButtonService {
    fn name(&self) -> &str {
        "Single button"
    }

    fn children(&self) -> &[Box<dyn DeviceService>] {
        &self.children
    }
}
