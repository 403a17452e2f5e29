//! Rotate — emits a rotate event for left/right knob actions carrying a step size.

use lighthub_domain::event::{EventKind, InternalEvent, ProvidedEvent};
use lighthub_domain::fields::{ACTION, ACTION_STEP_SIZE, Fields};
use tracing::debug;

use super::DeviceService;
use crate::ports::Device;

pub struct RotateService {
    name: String,
    rotate_left: String,
    rotate_right: String,
    degrees_per_step: f64,
}

impl RotateService {
    /// A rotate source; `left`/`right` are the `action` values for each
    /// direction and `degrees_per_step` scales `action_step_size`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
        degrees_per_step: f64,
    ) -> Self {
        Self {
            name: name.into(),
            rotate_left: left.into(),
            rotate_right: right.into(),
            degrees_per_step,
        }
    }
}

impl DeviceService for RotateService {
    fn name(&self) -> &str {
        &self.name
    }

    fn provided_events(&self) -> Vec<ProvidedEvent> {
        vec![ProvidedEvent {
            kind: EventKind::Rotate,
            name: self.name.clone(),
        }]
    }

    fn process_external_event(&self, device: &dyn Device, data: &Fields) -> Vec<InternalEvent> {
        let Some(action) = data.get(ACTION) else {
            return Vec::new();
        };
        let is_up = if !self.rotate_right.is_empty() && *action == self.rotate_right {
            true
        } else if !self.rotate_left.is_empty() && *action == self.rotate_left {
            false
        } else {
            return Vec::new();
        };

        let Some(step) = data.get(ACTION_STEP_SIZE) else {
            return Vec::new();
        };
        let Ok(step) = step.trim().parse::<i32>() else {
            debug!(address = device.address(), step = %step, "ignoring rotate with malformed step size");
            return Vec::new();
        };

        let degrees = f64::from(step) * self.degrees_per_step;
        vec![InternalEvent::rotate(
            device.address(),
            self.name.clone(),
            degrees,
            is_up,
        )]
    }
}
