use serde::{Deserialize, Serialize};

/// Baseline bead width in pixels
pub const BASELINE_WIDTH: u8 = 8;
/// Torch moving too fast leaves a thin bead
pub const THIN_WIDTH: u8 = 4;
/// Torch dragging leaves a thick bead
pub const THICK_WIDTH: u8 = 12;
/// Weave too slow: wide and irregular
pub const WIDE_WEAVE_WIDTH: u8 = 10;
/// Weave too fast: narrow and irregular
pub const NARROW_WEAVE_WIDTH: u8 = 6;

const LOW_FACTOR: f64 = 0.5;
const HIGH_FACTOR: f64 = 1.5;

/// Closed interval of acceptable values for a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    pub fn trend(&self, v: f64) -> Trend {
        if self.contains(v) {
            Trend::Ideal
        } else if v > self.max {
            Trend::TooFast
        } else {
            Trend::TooSlow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum BeadColor {
    #[strum(serialize = "ideal")]
    Ideal,
    #[strum(serialize = "speed-violation")]
    SpeedViolation,
    #[strum(serialize = "frequency-violation")]
    FrequencyViolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Trend {
    #[strum(serialize = "ideal")]
    Ideal,
    #[strum(serialize = "too-fast")]
    TooFast,
    #[strum(serialize = "too-slow")]
    TooSlow,
}

/// The rendered quality signal for one segment of the weld
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bead {
    pub color: BeadColor,
    pub width: u8,
}

/// Maps advance speed and weave frequency onto the bead that would be laid down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityClassifier {
    speed: Band,
    frequency: Band,
}

impl QualityClassifier {
    pub fn new(speed: Band, frequency: Band) -> Self {
        Self { speed, frequency }
    }

    pub fn is_ideal(&self, speed: f64, frequency: f64) -> bool {
        self.speed.contains(speed) && self.frequency.contains(frequency)
    }

    pub fn classify(&self, speed: f64, frequency: f64) -> Bead {
        Bead {
            color: self.color(speed, frequency),
            width: self.width(speed, frequency),
        }
    }

    /// First matching rule wins; speed faults outrank weave faults.
    pub fn width(&self, speed: f64, frequency: f64) -> u8 {
        if speed > self.speed.max * HIGH_FACTOR {
            THIN_WIDTH
        } else if speed < self.speed.min * LOW_FACTOR {
            THICK_WIDTH
        } else if frequency < self.frequency.min * LOW_FACTOR {
            WIDE_WEAVE_WIDTH
        } else if frequency > self.frequency.max * HIGH_FACTOR {
            NARROW_WEAVE_WIDTH
        } else {
            BASELINE_WIDTH
        }
    }

    pub fn color(&self, speed: f64, frequency: f64) -> BeadColor {
        match (self.speed.contains(speed), self.frequency.contains(frequency)) {
            (true, true) => BeadColor::Ideal,
            (false, _) => BeadColor::SpeedViolation,
            (true, false) => BeadColor::FrequencyViolation,
        }
    }

    pub fn speed_trend(&self, speed: f64) -> Trend {
        self.speed.trend(speed)
    }

    pub fn frequency_trend(&self, frequency: f64) -> Trend {
        self.frequency.trend(frequency)
    }
}

impl Default for QualityClassifier {
    fn default() -> Self {
        let cfg = crate::config::Config::default();
        Self::new(cfg.speed_band, cfg.frequency_band)
    }
}
