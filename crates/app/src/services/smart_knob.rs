//! Smart knob — a push button that also rotates, both released and held down.

use super::{DeviceService, PushService, RotateService};

/// `action` values a knob model reports.
#[derive(Debug, Clone, Copy)]
pub struct SmartKnobActions<'a> {
    pub press: &'a str,
    pub long_press: &'a str,
    pub rotate_left: &'a str,
    pub rotate_right: &'a str,
    pub pushed_rotate_left: &'a str,
    pub pushed_rotate_right: &'a str,
    pub degrees_per_step: f64,
}

/// Composite of `Press`, `Long press`, `Rotate normal` and `Rotate pushed`.
pub struct SmartKnobService {
    children: Vec<Box<dyn DeviceService>>,
}

impl SmartKnobService {
    #[must_use]
    pub fn new(actions: &SmartKnobActions<'_>) -> Self {
        Self {
            children: vec![
                Box::new(PushService::new("Press", actions.press)),
                Box::new(PushService::new("Long press", actions.long_press)),
                Box::new(RotateService::new(
                    "Rotate normal",
                    actions.rotate_left,
                    actions.rotate_right,
                    actions.degrees_per_step,
                )),
                Box::new(RotateService::new(
                    "Rotate pushed",
                    actions.pushed_rotate_left,
                    actions.pushed_rotate_right,
                    actions.degrees_per_step,
                )),
            ],
        }
    }
}

impl DeviceService for SmartKnobService {
    fn name(&self) -> &str {
        "Smart knob"
    }

    fn children(&self) -> &[Box<dyn DeviceService>] {
        &self.children
    }
}
