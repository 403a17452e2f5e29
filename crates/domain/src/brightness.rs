//! Brightness conversion — maps normalized perceived brightness to a
//! device's raw integer scale through a configurable gamma curve.
//!
//! The curve is parameterized by the *mid brightness*: the fraction of the
//! raw range reached at a normalized brightness of `0.5`.
//! `gamma = ln(mid) / ln(0.5)`, so a mid brightness of `0.5` is linear.

/// Smallest normalized brightness that still lights the output.
///
/// Kept far below any curve's first raw step so that a flat curve
/// (mid brightness near `0.99`) still reaches raw `1`.
pub const MIN_VISIBLE: f64 = f64::MIN_POSITIVE;

pub const MIN_MID_BRIGHTNESS: f64 = 0.01;
pub const MAX_MID_BRIGHTNESS: f64 = 0.99;

const DEFAULT_GAMMA: f64 = 5.0;

/// Gamma converter between normalized `0.0..=1.0` and raw `0..=max_raw`.
///
/// Raw `0` is off; every normalized value at or above [`MIN_VISIBLE`] maps
/// to at least raw `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessConverter {
    max_raw: i64,
    gamma: f64,
}

impl BrightnessConverter {
    /// `max_raw` is raised to 2 if lower.
    #[must_use]
    pub fn new(max_raw: i64) -> Self {
        Self {
            max_raw: max_raw.max(2),
            gamma: DEFAULT_GAMMA,
        }
    }

    /// Fraction of the raw range reached at normalized `0.5`.
    #[must_use]
    pub fn mid_brightness(&self) -> f64 {
        0.5_f64.powf(self.gamma)
    }

    /// Reshape the curve; `mid` is clamped to `0.01..=0.99`.
    pub fn set_mid_brightness(&mut self, mid: f64) {
        let mid = mid.clamp(MIN_MID_BRIGHTNESS, MAX_MID_BRIGHTNESS);
        self.gamma = mid.ln() / 0.5_f64.ln();
    }

    #[must_use]
    pub fn norm_to_raw(&self, norm: f64) -> i64 {
        if norm < MIN_VISIBLE {
            return 0;
        }
        self.scale(norm.min(1.0).powf(self.gamma))
    }

    #[must_use]
    pub fn raw_to_norm(&self, raw: i64) -> f64 {
        if raw <= 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let linear = (raw.min(self.max_raw) - 1) as f64 / (self.max_raw - 1) as f64;
        linear.powf(1.0 / self.gamma).clamp(MIN_VISIBLE, 1.0)
    }

    /// Same as [`Self::norm_to_raw`] without the gamma curve, used to preview
    /// raw levels while tuning the mid brightness.
    #[must_use]
    pub fn norm_to_raw_linear(&self, norm: f64) -> i64 {
        if norm < MIN_VISIBLE {
            return 0;
        }
        self.scale(norm.min(1.0))
    }

    /// Normalized brightness of the nearest raw level past `norm` in
    /// direction `up`, or `None` when `norm` already sits on that rail.
    ///
    /// Raw levels the curve cannot reproduce (their normalized value maps
    /// back onto the current level) are skipped, so the returned value
    /// always lands on a different raw level.
    #[must_use]
    pub fn step_raw(&self, norm: f64, up: bool) -> Option<f64> {
        let current = self.norm_to_raw(norm);
        let step = if up { 1 } else { -1 };
        let mut raw = current + step;
        while (0..=self.max_raw).contains(&raw) {
            let candidate = self.raw_to_norm(raw);
            if (self.norm_to_raw(candidate) - current) * step > 0 {
                return Some(candidate);
            }
            raw += step;
        }
        None
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn scale(&self, curved: f64) -> i64 {
        (curved * (self.max_raw - 1) as f64 + 1.0).round() as i64
    }
}
