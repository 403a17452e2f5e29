//! Dimmable light — brightness state machine with toggle, accelerated
//! dimming, debounced rotate-to-fade and scheduled fades.
//!
//! Brightness is kept normalized (`0.0..=1.0`, perceived) and converted to
//! the device's raw scale through a [`BrightnessConverter`]. All mutable
//! state lives behind one mutex private to the light; its two timers (the
//! fade debounce and the fade stepper) are single-flight and are only armed,
//! fired or cancelled while that mutex is held.
//!
//! ## Fades
//! Rotating the `Fade` sink accumulates a signed fade time (3600 s per full
//! turn). The commit is debounced: every rotate restarts a 750 ms timer, and
//! only when it expires does the light start fading towards the rail in the
//! accumulated direction, taking `|accumulated|` seconds for the full range.
//! The stepper advances in whole raw steps, grouping them so that device
//! messages are at least 500 ms apart.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use lighthub_domain::action::{Action, ActionKind, FadeToBrightness, TurnOnOff, TurnOnOffMode};
use lighthub_domain::brightness::{BrightnessConverter, MIN_VISIBLE};
use lighthub_domain::event::{ConsumedEvent, EventKind, InternalEvent, InternalEventType};
use lighthub_domain::option::{PreviewMode, ServiceOption};
use lighthub_domain::param::{ParamDescriptor, ParamInfo, ParamValue};
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::timer::OneShot;
use super::{DeviceService, ServiceContext};
use crate::ports::Device;

/// Transition used for direct adjustments (dim steps, previews, color temperature).
pub const FAST_TRANSITION_SECS: f64 = 0.25;
/// Transition for a full off-to-on toggle; smaller changes scale down linearly.
const SLOW_TRANSITION_SECS: f64 = 1.25;

const FADE_DEBOUNCE: Duration = Duration::from_millis(750);
const FADE_MIN_INTERVAL_MS: f64 = 500.0;
const FADE_SECONDS_PER_ROTATION: f64 = 3600.0;

const DIM_DECAY_MS: f64 = 350.0;
const DIM_ROTATIONS_ZERO_TO_FULL: f64 = 2.0;
const DIM_MAX_STEP: f64 = 0.25;

const STEP_FADE_LEVELS: u32 = 4;

const TOGGLE: &str = "Toggle on/off";
const DIM: &str = "Dim";
const FADE: &str = "Fade";
const STEP_FADE: &str = "Step fade";
const MID_BRIGHTNESS: &str = "Mid brightness";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeMode {
    Idle,
    FadeUp,
    FadeDown,
}

/// Turns a burst of rotate events into accelerating brightness steps.
///
/// Same-direction rotations add onto the previous step after exponential
/// decay with the time since the last rotation; a reversal starts over.
#[derive(Debug, Default)]
struct DimAccelerator {
    step: f64,
    last_rotation: Option<Instant>,
}

impl DimAccelerator {
    fn next_step(&mut self, is_up: bool, degrees: f64, now: Instant) -> f64 {
        let last_was_up = self.step > 0.0;
        if is_up == last_was_up {
            if let Some(last) = self.last_rotation {
                let elapsed_ms = now.saturating_duration_since(last).as_secs_f64() * 1000.0;
                self.step *= (-elapsed_ms / DIM_DECAY_MS).exp();
            }
        } else {
            self.step = 0.0;
        }
        self.last_rotation = Some(now);

        let delta = degrees / (360.0 * DIM_ROTATIONS_ZERO_TO_FULL);
        self.step += if is_up { delta } else { -delta };
        self.step = self.step.clamp(-DIM_MAX_STEP, DIM_MAX_STEP);
        self.step
    }
}

#[derive(Debug)]
struct LightState {
    converter: BrightnessConverter,
    brightness: f64,
    last_steady: f64,
    mode: FadeMode,
    fade_target: f64,
    /// Seconds a fade takes across the full `0..=1` range.
    fade_time: f64,
    upcoming_fade_time: f64,
    dim: DimAccelerator,
    debounce: OneShot,
    fader: OneShot,
}

impl LightState {
    fn new(max_raw: i64) -> Self {
        Self {
            converter: BrightnessConverter::new(max_raw),
            brightness: 0.0,
            last_steady: 1.0,
            mode: FadeMode::Idle,
            fade_target: 0.0,
            fade_time: 0.0,
            upcoming_fade_time: 0.0,
            dim: DimAccelerator::default(),
            debounce: OneShot::default(),
            fader: OneShot::default(),
        }
    }

    fn is_on(&self) -> bool {
        self.brightness >= MIN_VISIBLE
    }

    fn target_reached(&self) -> bool {
        (self.fade_target - self.brightness).abs() < MIN_VISIBLE
    }

    fn stop_fade(&mut self) {
        self.fader.cancel();
        self.mode = FadeMode::Idle;
        self.fade_target = self.brightness;
    }

    fn cancel_pending_fade(&mut self) {
        self.debounce.cancel();
        self.upcoming_fade_time = 0.0;
    }

    fn interval_ms(&self, next: f64) -> f64 {
        (next - self.brightness).abs() * self.fade_time * 1000.0
    }

    /// Next fade step as `(interval in ms, normalized brightness)`.
    fn next_fade_step(&self) -> (f64, f64) {
        let up = self.fade_target > self.brightness;
        if up && !self.is_on() {
            return (1.0, MIN_VISIBLE);
        }

        let direction = if up { 1.0 } else { -1.0 };
        let passed_target = |value: f64| (value - self.fade_target) * direction >= 0.0;
        let mut next = self.brightness;
        loop {
            // No raw level left on this side: the target shares the rail.
            let Some(candidate) = self.converter.step_raw(next, up) else {
                next = self.fade_target;
                break;
            };
            next = candidate;
            if passed_target(next) || self.interval_ms(next) >= FADE_MIN_INTERVAL_MS {
                break;
            }
        }
        if passed_target(next) {
            next = self.fade_target;
        }
        (self.interval_ms(next).max(1.0), next)
    }
}

struct LightCore {
    device: Arc<dyn Device>,
    runtime: Handle,
    state: Mutex<LightState>,
}

impl LightCore {
    fn lock(&self) -> MutexGuard<'_, LightState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_brightness(&self, state: &mut LightState, value: f64, transition_secs: f64) {
        state.brightness = value.clamp(0.0, 1.0);
        let raw = state.converter.norm_to_raw(state.brightness);
        self.device.send_brightness_transition(raw, transition_secs);
    }

    fn turn_on_off(&self, request: TurnOnOff) {
        let mut state = self.lock();
        state.cancel_pending_fade();
        if state.fader.is_armed() {
            state.stop_fade();
            if request.user_generated {
                debug!(address = self.device.address(), "fade interrupted");
                return;
            }
        }

        let on = state.is_on();
        match request.mode {
            TurnOnOffMode::TurnOn if on => return,
            TurnOnOffMode::TurnOff if !on => return,
            _ => {}
        }

        let target = if on {
            state.last_steady = state.brightness;
            0.0
        } else {
            state.last_steady
        };
        let transition = (target - state.brightness).abs() * SLOW_TRANSITION_SECS;
        state.fade_target = target;
        self.set_brightness(&mut state, target, transition);
    }

    fn dim(&self, is_up: bool, degrees: f64) {
        let now = Instant::now();
        let mut state = self.lock();
        state.cancel_pending_fade();
        state.stop_fade();

        let step = state.dim.next_step(is_up, degrees, now);
        let direction = if is_up { 1.0 } else { -1.0 };
        let min_next = state
            .converter
            .step_raw(state.brightness, is_up)
            .unwrap_or(if is_up { 1.0 } else { 0.0 });
        let mut next = state.brightness + step;
        if (next - min_next) * direction < 0.0 {
            next = min_next;
        }

        self.set_brightness(&mut state, next, FAST_TRANSITION_SECS);
        state.fade_target = state.brightness;
    }

    fn rotate_to_fade(self: &Arc<Self>, is_up: bool, degrees: f64) {
        let seconds = degrees / 360.0 * FADE_SECONDS_PER_ROTATION;
        let mut state = self.lock();
        state.upcoming_fade_time += if is_up { seconds } else { -seconds };

        let core = Arc::downgrade(self);
        state
            .debounce
            .arm(&self.runtime, FADE_DEBOUNCE, move |generation| {
                if let Some(core) = Weak::upgrade(&core) {
                    core.trigger_fade(generation);
                }
            });
    }

    fn trigger_fade(self: &Arc<Self>, generation: u64) {
        let mut state = self.lock();
        if !state.debounce.fire(generation) {
            return;
        }

        let upcoming = std::mem::take(&mut state.upcoming_fade_time);
        let up = upcoming > 0.0;
        let target = if up { 1.0 } else { 0.0 };
        if (state.brightness - target).abs() < MIN_VISIBLE {
            debug!(address = self.device.address(), up, "fade refused, already at target");
            return;
        }

        state.fader.cancel();
        state.fade_target = target;
        state.fade_time = upcoming.abs().round();
        state.mode = if up { FadeMode::FadeUp } else { FadeMode::FadeDown };
        info!(
            address = self.device.address(),
            up,
            seconds = state.fade_time,
            "fade started"
        );
        self.run_fade_step(&mut state);
    }

    fn fade_to_brightness(self: &Arc<Self>, request: FadeToBrightness) {
        if request.duration_minutes <= 0 {
            return;
        }
        let mut state = self.lock();
        state.cancel_pending_fade();
        state.stop_fade();

        let target = request.brightness.clamp(0.0, 1.0);
        let distance = (state.brightness - target).abs();
        if distance < MIN_VISIBLE {
            return;
        }

        #[allow(clippy::cast_precision_loss)]
        let duration_secs = (request.duration_minutes * 60) as f64;
        state.fade_target = target;
        state.fade_time = duration_secs / distance;
        state.mode = if target > state.brightness {
            FadeMode::FadeUp
        } else {
            FadeMode::FadeDown
        };
        info!(
            address = self.device.address(),
            target,
            minutes = request.duration_minutes,
            "scheduled fade started"
        );
        self.run_fade_step(&mut state);
    }

    fn on_fade_timer(self: &Arc<Self>, generation: u64) {
        let mut state = self.lock();
        if state.fader.fire(generation) {
            self.run_fade_step(&mut state);
        }
    }

    fn run_fade_step(self: &Arc<Self>, state: &mut LightState) {
        if state.target_reached() {
            state.mode = FadeMode::Idle;
            return;
        }

        let (interval_ms, next) = state.next_fade_step();
        self.set_brightness(state, next, interval_ms / 1000.0);
        if state.target_reached() {
            state.mode = FadeMode::Idle;
            return;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let delay = Duration::from_millis(interval_ms.ceil() as u64);
        let core = Arc::downgrade(self);
        state.fader.arm(&self.runtime, delay, move |generation| {
            if let Some(core) = Weak::upgrade(&core) {
                core.on_fade_timer(generation);
            }
        });
    }

    fn step_fade(&self) {
        let mut state = self.lock();
        state.cancel_pending_fade();
        state.stop_fade();

        let levels = f64::from(STEP_FADE_LEVELS);
        let next = (1..=STEP_FADE_LEVELS)
            .map(|level| f64::from(level) / levels)
            .find(|level| *level > state.brightness + MIN_VISIBLE)
            .unwrap_or(1.0 / levels);
        let transition = (next - state.brightness).abs() * SLOW_TRANSITION_SECS;
        state.fade_target = next;
        self.set_brightness(&mut state, next, transition);
    }

    fn shutdown(&self) {
        let mut state = self.lock();
        state.cancel_pending_fade();
        state.stop_fade();
    }
}

impl Drop for LightCore {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.debounce.cancel();
        state.fader.cancel();
    }
}

/// A light with a single brightness channel.
///
/// Sinks: `Toggle on/off` and `Step fade` (push), `Dim` and `Fade` (rotate).
/// Actions: `Turn on/off`, `Fade to brightness`. Option: `Mid brightness`.
pub struct DimmableLightService {
    core: Arc<LightCore>,
}

impl DimmableLightService {
    /// A light whose raw brightness scale is `0..=max_raw`.
    #[must_use]
    pub fn new(device: Arc<dyn Device>, max_raw: i64, context: &ServiceContext) -> Self {
        Self {
            core: Arc::new(LightCore {
                device,
                runtime: context.runtime.clone(),
                state: Mutex::new(LightState::new(max_raw)),
            }),
        }
    }

    /// Current normalized brightness.
    #[must_use]
    pub fn brightness(&self) -> f64 {
        self.core.lock().brightness
    }

    #[must_use]
    pub fn fade_mode(&self) -> FadeMode {
        self.core.lock().mode
    }
}

impl DeviceService for DimmableLightService {
    fn name(&self) -> &str {
        "Light"
    }

    fn sinks(&self) -> Vec<ConsumedEvent> {
        [
            (EventKind::Push, TOGGLE),
            (EventKind::Rotate, DIM),
            (EventKind::Rotate, FADE),
            (EventKind::Push, STEP_FADE),
        ]
        .into_iter()
        .map(|(kind, functionality)| ConsumedEvent {
            kind,
            functionality: functionality.to_string(),
        })
        .collect()
    }

    fn handle_sink(&self, functionality: &str, event: &InternalEvent) {
        match (functionality, event.event_type) {
            (TOGGLE, _) => self.core.turn_on_off(TurnOnOff {
                mode: TurnOnOffMode::Toggle,
                user_generated: true,
            }),
            (STEP_FADE, _) => self.core.step_fade(),
            (DIM, InternalEventType::Rotate { degrees, is_up }) => self.core.dim(is_up, degrees),
            (FADE, InternalEventType::Rotate { degrees, is_up }) => {
                self.core.rotate_to_fade(is_up, degrees);
            }
            _ => {}
        }
    }

    fn consumable_actions(&self) -> Vec<ActionKind> {
        vec![ActionKind::TurnOnOff, ActionKind::FadeToBrightness]
    }

    fn invoke_action(&self, action: &Action) -> bool {
        match action {
            Action::TurnOnOff(request) => self.core.turn_on_off(*request),
            Action::FadeToBrightness(request) => self.core.fade_to_brightness(*request),
        }
        true
    }

    fn service_options(&self) -> Vec<ServiceOption> {
        let mid = self.core.lock().converter.mid_brightness();
        vec![ServiceOption {
            param: ParamInfo::new(MID_BRIGHTNESS, ParamDescriptor::float(0.01, 0.99)),
            value: mid.to_string(),
            preview_mode: PreviewMode::Brightness,
        }]
    }

    fn apply_option(&self, name: &str, value: &ParamValue) -> bool {
        if name != MID_BRIGHTNESS {
            return false;
        }
        let Some(mid) = value.as_f64() else {
            return false;
        };
        let mut state = self.core.lock();
        state.converter.set_mid_brightness(mid);
        if state.is_on() && !state.fader.is_armed() {
            let current = state.brightness;
            self.core.set_brightness(&mut state, current, FAST_TRANSITION_SECS);
        }
        true
    }

    fn preview_option(&self, value: &str, mode: PreviewMode) {
        let state = self.core.lock();
        let raw = match mode {
            PreviewMode::Brightness => match value.trim().parse::<f64>() {
                Ok(linear) if linear.is_finite() => {
                    state.converter.norm_to_raw_linear(linear.clamp(0.0, 1.0))
                }
                _ => {
                    warn!(address = self.core.device.address(), value, "unreadable preview value");
                    return;
                }
            },
            PreviewMode::None => state.converter.norm_to_raw(state.brightness),
        };
        self.core
            .device
            .send_brightness_transition(raw, FAST_TRANSITION_SECS);
    }

    fn shutdown(&self) {
        self.core.shutdown();
    }
}
