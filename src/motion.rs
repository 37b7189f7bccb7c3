use crate::config::Config;
use crate::sample::Sample;
use std::collections::VecDeque;
use thiserror::Error;

/// Why a sample produced no reading. None of these are faults.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("sample has a non-finite component")]
    NonFinite,
    #[error("no time elapsed since the previous sample")]
    NoElapsedTime,
    #[error("sample timestamp is older than the previous sample")]
    OutOfOrder,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionReading {
    /// mm/s
    pub speed: f64,
    /// Hz
    pub frequency: f64,
    /// seconds since the previous accepted sample
    pub dt_secs: f64,
}

/// Seam between the session and whatever turns samples into readings.
pub trait MotionAnalyzer {
    fn process(&mut self, sample: &Sample) -> Result<MotionReading, Rejection>;
    /// The most recent accepted sample (or the origin before any)
    fn last_sample(&self) -> Sample;
    fn reset(&mut self, origin: Sample);
}

/// Timestamps (ms) of detected reversals, strictly increasing.
#[derive(Debug, Clone)]
pub struct PeakWindow {
    peaks: VecDeque<f64>,
    window_ms: f64,
}

impl PeakWindow {
    pub fn new(window_ms: f64) -> Self {
        Self {
            peaks: VecDeque::with_capacity(128),
            window_ms,
        }
    }

    /// Appends a peak and evicts everything older than the window, oldest first.
    pub fn push(&mut self, t: f64) {
        if let Some(&newest) = self.peaks.back() {
            if t <= newest {
                return;
            }
        }
        self.peaks.push_back(t);
        self.expire(t);
    }

    pub fn expire(&mut self, now: f64) {
        while let Some(&oldest) = self.peaks.front() {
            if now - oldest > self.window_ms {
                self.peaks.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.peaks.iter()
    }

    pub fn span_secs(&self) -> f64 {
        match (self.peaks.front(), self.peaks.back()) {
            (Some(first), Some(last)) => (last - first) / 1000.0,
            _ => 0.0,
        }
    }

    pub fn frequency(&self) -> f64 {
        if self.peaks.len() < 2 {
            return 0.0;
        }
        let span = self.span_secs();
        if span > 0.0 {
            (self.peaks.len() - 1) as f64 / span
        } else {
            0.0
        }
    }

    pub fn clear(&mut self) {
        self.peaks.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub last_x: f64,
    pub last_y: f64,
    pub last_t: f64,
}

impl From<Sample> for MotionState {
    fn from(s: Sample) -> Self {
        Self {
            last_x: s.x,
            last_y: s.y,
            last_t: s.t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Rising,
    Falling,
}

/// Advance speed and weave frequency from a raw pointer stream.
///
/// Samples arrive at irregular intervals. Speed is the instantaneous horizontal
/// rate between consecutive samples; frequency is a count-based rate over the
/// vertical direction reversals seen in a trailing time window.
#[derive(Debug, Clone)]
pub struct MotionMetrics {
    pixel_to_mm: f64,
    noise_threshold: f64,
    state: MotionState,
    direction: Option<Direction>,
    peaks: PeakWindow,
}

impl MotionMetrics {
    pub fn new(config: &Config, origin: Sample) -> Self {
        Self {
            pixel_to_mm: config.pixel_to_mm,
            noise_threshold: config.peak_noise_threshold,
            state: origin.into(),
            direction: None,
            peaks: PeakWindow::new(config.peak_window_ms),
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn peaks(&self) -> &PeakWindow {
        &self.peaks
    }

    fn track_reversal(&mut self, y: f64, t: f64) {
        let dy = y - self.state.last_y;
        if dy.abs() <= self.noise_threshold {
            return;
        }
        let dir = if dy > 0.0 {
            Direction::Rising
        } else {
            Direction::Falling
        };
        if self.direction.is_some_and(|prev| prev != dir) {
            self.peaks.push(t);
        }
        self.direction = Some(dir);
    }
}

impl MotionAnalyzer for MotionMetrics {
    fn process(&mut self, sample: &Sample) -> Result<MotionReading, Rejection> {
        if !sample.is_finite() {
            return Err(Rejection::NonFinite);
        }
        let dt_ms = sample.t - self.state.last_t;
        if dt_ms == 0.0 {
            return Err(Rejection::NoElapsedTime);
        }
        if dt_ms < 0.0 {
            return Err(Rejection::OutOfOrder);
        }
        let dt_secs = dt_ms / 1000.0;

        let dx_mm = (sample.x - self.state.last_x) * self.pixel_to_mm;
        let speed = (dx_mm / dt_secs).abs();

        self.track_reversal(sample.y, sample.t);
        self.peaks.expire(sample.t);

        self.state = (*sample).into();

        Ok(MotionReading {
            speed,
            frequency: self.peaks.frequency(),
            dt_secs,
        })
    }

    fn last_sample(&self) -> Sample {
        Sample::new(self.state.last_x, self.state.last_y, self.state.last_t)
    }

    fn reset(&mut self, origin: Sample) {
        self.state = origin.into();
        self.direction = None;
        self.peaks.clear();
    }
}
