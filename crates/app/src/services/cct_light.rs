//! CCT light — a dimmable light with an adjustable color temperature.

use std::sync::{Arc, Mutex, PoisonError};

use lighthub_domain::event::{ConsumedEvent, EventKind, InternalEvent, InternalEventType};

use super::dimmable_light::FAST_TRANSITION_SECS;
use super::{DeviceService, DimmableLightService, ServiceContext};
use crate::ports::Device;

const COLOR_TEMPERATURE: &str = "Color temperature";
const RESET_COLOR_TEMPERATURE: &str = "Reset color temperature";
const DEFAULT_COLOR_TEMPERATURE: f64 = 0.5;

/// Adds `Color temperature` (rotate) and `Reset color temperature` (push)
/// sinks to a [`DimmableLightService`].
///
/// The color temperature is kept normalized in `0.0..=1.0` and sent as a raw
/// value in `min_color_temp..=max_color_temp` (mired).
pub struct CctLightService {
    device: Arc<dyn Device>,
    children: Vec<Box<dyn DeviceService>>,
    min_color_temp: i64,
    max_color_temp: i64,
    color_temp: Mutex<f64>,
}

impl CctLightService {
    #[must_use]
    pub fn new(
        device: Arc<dyn Device>,
        max_raw: i64,
        color_temp_range: (i64, i64),
        context: &ServiceContext,
    ) -> Self {
        let light = DimmableLightService::new(device.clone(), max_raw, context);
        Self {
            device,
            children: vec![Box::new(light)],
            min_color_temp: color_temp_range.0,
            max_color_temp: color_temp_range.1,
            color_temp: Mutex::new(DEFAULT_COLOR_TEMPERATURE),
        }
    }

    #[must_use]
    pub fn color_temp(&self) -> f64 {
        *self.color_temp.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_color_temp(&self, update: impl FnOnce(f64) -> f64) {
        let value = {
            let mut color_temp = self.color_temp.lock().unwrap_or_else(PoisonError::into_inner);
            *color_temp = update(*color_temp).clamp(0.0, 1.0);
            *color_temp
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let raw = self.min_color_temp
            + (value * (self.max_color_temp - self.min_color_temp) as f64) as i64;
        self.device
            .send_color_temp_transition(raw, FAST_TRANSITION_SECS);
    }
}

impl DeviceService for CctLightService {
    fn name(&self) -> &str {
        "CCT light"
    }

    fn children(&self) -> &[Box<dyn DeviceService>] {
        &self.children
    }

    fn sinks(&self) -> Vec<ConsumedEvent> {
        vec![
            ConsumedEvent {
                kind: EventKind::Rotate,
                functionality: COLOR_TEMPERATURE.to_string(),
            },
            ConsumedEvent {
                kind: EventKind::Push,
                functionality: RESET_COLOR_TEMPERATURE.to_string(),
            },
        ]
    }

    fn handle_sink(&self, functionality: &str, event: &InternalEvent) {
        match (functionality, event.event_type) {
            (COLOR_TEMPERATURE, InternalEventType::Rotate { degrees, is_up }) => {
                let change = degrees / 360.0 * if is_up { 1.0 } else { -1.0 };
                self.update_color_temp(|current| current + change);
            }
            (RESET_COLOR_TEMPERATURE, _) => {
                self.update_color_temp(|_| DEFAULT_COLOR_TEMPERATURE);
            }
            _ => {}
        }
    }
}
