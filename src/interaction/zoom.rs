use serde::{Deserialize, Serialize};

/// Bounds and step of the chart zoom control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 3.0,
            step: 0.1,
        }
    }
}

impl ZoomConfig {
    /// `0 < min <= 1 <= max` with a positive finite step.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.min > 0.0
            && self.min <= 1.0
            && self.max >= 1.0
            && self.step > 0.0
    }
}

/// Zoom factor tracked as whole steps away from 1.0 so the bounds stay exact
/// no matter how many times the controls are pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    config: ZoomConfig,
    steps: i32,
    min_steps: i32,
    max_steps: i32,
    transform_applied: bool,
}

impl ZoomState {
    #[must_use]
    pub fn new(config: ZoomConfig) -> Self {
        let (min_steps, max_steps) = step_bounds(config);
        Self {
            config,
            steps: 0,
            min_steps,
            max_steps,
            transform_applied: false,
        }
    }

    /// Current factor, rounded to two decimals.
    #[must_use]
    pub fn factor(&self) -> f64 {
        let raw = 1.0 + f64::from(self.steps) * self.config.step;
        let rounded = (raw * 100.0).round() / 100.0;
        if self.config.is_valid() {
            rounded.clamp(self.config.min, self.config.max)
        } else {
            rounded
        }
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.steps = (self.steps + 1).min(self.max_steps);
        self.transform_applied = true;
        self.factor()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.steps = (self.steps - 1).max(self.min_steps);
        self.transform_applied = true;
        self.factor()
    }

    /// Back to 1.0 with no transform on the root element.
    pub fn reset(&mut self) {
        self.steps = 0;
        self.transform_applied = false;
    }

    /// CSS transform for the root element; `None` means no transform.
    #[must_use]
    pub fn transform(&self) -> Option<String> {
        self.transform_applied
            .then(|| format!("scale({})", self.factor()))
    }

    #[must_use]
    pub fn transform_origin(&self) -> &'static str {
        "center center"
    }

    #[must_use]
    pub fn config(&self) -> ZoomConfig {
        self.config
    }
}

fn step_bounds(config: ZoomConfig) -> (i32, i32) {
    if !config.is_valid() {
        return (0, 0);
    }
    const EPS: f64 = 1e-9;
    let down = ((1.0 - config.min) / config.step + EPS).floor();
    let up = ((config.max - 1.0) / config.step + EPS).floor();
    // Bounded by the ratio of two finite, validated floats.
    (-(down.min(f64::from(i32::MAX)) as i32), up.min(f64::from(i32::MAX)) as i32)
}
