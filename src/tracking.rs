use crate::config::Config;

/// Fixed sinusoidal guide path the torch is meant to follow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingEvaluator {
    center_y: f64,
    amplitude: f64,
    frequency: f64,
    tolerance: f64,
}

impl TrackingEvaluator {
    pub fn new(config: &Config) -> Self {
        Self {
            center_y: config.center_y,
            amplitude: config.guide_amplitude,
            frequency: config.guide_frequency,
            tolerance: config.tracking_tolerance,
        }
    }

    pub fn ideal_y(&self, x: f64) -> f64 {
        self.center_y + self.amplitude * (x * self.frequency).sin()
    }

    pub fn error(&self, x: f64, y: f64) -> f64 {
        (y - self.ideal_y(x)).abs()
    }

    pub fn evaluate(&self, x: f64, y: f64) -> bool {
        self.error(x, y) <= self.tolerance
    }

    /// Guide points from 0 up to (excluding) `width`, every `step` pixels
    pub fn guide_points(&self, width: f64, step: f64) -> Vec<(f64, f64)> {
        if !(step.is_finite() && step > 0.0 && width.is_finite() && width > 0.0) {
            return Vec::new();
        }
        let n = (width / step).ceil() as usize;
        (0..n)
            .map(|i| {
                let x = i as f64 * step;
                (x, self.ideal_y(x))
            })
            .collect()
    }
}

impl Default for TrackingEvaluator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
