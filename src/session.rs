use crate::config::Config;
use crate::motion::{MotionAnalyzer, MotionMetrics, MotionReading, Rejection};
use crate::quality::{Bead, QualityClassifier};
use crate::sample::Sample;
use crate::score::{ScoreAccumulator, SessionTotals};
use crate::tracking::TrackingEvaluator;
use thiserror::Error;
use tracing::{debug, info};

pub const EXCELLENT_THRESHOLD: f64 = 90.0;
pub const GOOD_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Verdict {
    #[strum(serialize = "excellent")]
    Excellent,
    #[strum(serialize = "good")]
    Good,
    #[strum(serialize = "needs improvement")]
    NeedsImprovement,
}

impl Verdict {
    /// Judged on the raw percentages, never on rounded display values
    pub fn from_scores(quality: f64, tracking: f64) -> Self {
        if quality >= EXCELLENT_THRESHOLD && tracking >= EXCELLENT_THRESHOLD {
            Verdict::Excellent
        } else if quality >= GOOD_THRESHOLD && tracking >= GOOD_THRESHOLD {
            Verdict::Good
        } else {
            Verdict::NeedsImprovement
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Excellent => "EXCELLENT! Perfect coordination and flawless tracking.",
            Verdict::Good => "VERY GOOD! Consistent results. A few final adjustments.",
            Verdict::NeedsImprovement => {
                "NEEDS IMPROVEMENT. Work on the consistency of your travel and weave."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalReport {
    pub quality_percent: f64,
    pub tracking_percent: f64,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SessionState {
    Running,
    Ended(FinalReport),
}

/// Everything committed for one accepted sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub from: Sample,
    pub to: Sample,
    pub reading: MotionReading,
    pub bead: Bead,
    pub quality_hit: bool,
    pub tracking_hit: bool,
    pub quality_percent: f64,
    pub tracking_percent: f64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    #[error("sample rejected: {0}")]
    Rejected(#[from] Rejection),
    #[error("session has already ended")]
    SessionEnded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    Accepted(Frame),
    Finished(Frame, FinalReport),
    Dropped(DropReason),
}

/// Owns one run of the simulation, from the first sample to the verdict.
#[derive(Debug)]
pub struct SessionController<M: MotionAnalyzer = MotionMetrics> {
    config: Config,
    motion: M,
    classifier: QualityClassifier,
    tracker: TrackingEvaluator,
    score: ScoreAccumulator,
    state: SessionState,
    last_frame: Option<Frame>,
}

impl SessionController<MotionMetrics> {
    /// A session whose torch rests at the configured origin at `start_t` (ms)
    pub fn new(config: Config, start_t: f64) -> Self {
        let (x, y) = config.origin();
        let motion = MotionMetrics::new(&config, Sample::new(x, y, start_t));
        Self::with_analyzer(config, motion)
    }
}

impl<M: MotionAnalyzer> SessionController<M> {
    pub fn with_analyzer(config: Config, motion: M) -> Self {
        info!(
            width = config.canvas_width,
            height = config.canvas_height,
            "session started"
        );
        Self {
            classifier: QualityClassifier::new(config.speed_band, config.frequency_band),
            tracker: TrackingEvaluator::new(&config),
            score: ScoreAccumulator::new(),
            state: SessionState::Running,
            last_frame: None,
            motion,
            config,
        }
    }

    pub fn on_sample(&mut self, sample: Sample) -> SampleOutcome {
        if self.is_ended() {
            debug!(?sample, "sample after session end dropped");
            return SampleOutcome::Dropped(DropReason::SessionEnded);
        }

        let from = self.motion.last_sample();
        let reading = match self.motion.process(&sample) {
            Ok(r) => r,
            Err(rejection) => {
                debug!(?sample, %rejection, "sample rejected");
                return SampleOutcome::Dropped(rejection.into());
            }
        };

        let bead = self.classifier.classify(reading.speed, reading.frequency);
        let quality_hit = self.classifier.is_ideal(reading.speed, reading.frequency);
        let tracking_hit = self.tracker.evaluate(sample.x, sample.y);
        self.score.tick(reading.dt_secs, quality_hit, tracking_hit);

        let frame = Frame {
            from,
            to: sample,
            reading,
            bead,
            quality_hit,
            tracking_hit,
            quality_percent: self.score.quality_percent(),
            tracking_percent: self.score.tracking_percent(),
        };
        self.last_frame = Some(frame);

        if sample.x >= self.config.end_x() {
            let report = self.finish();
            SampleOutcome::Finished(frame, report)
        } else {
            SampleOutcome::Accepted(frame)
        }
    }

    fn finish(&mut self) -> FinalReport {
        self.settle_final_score();
        let quality_percent = self.score.quality_percent();
        let tracking_percent = self.score.tracking_percent();
        let report = FinalReport {
            quality_percent,
            tracking_percent,
            verdict: Verdict::from_scores(quality_percent, tracking_percent),
        };
        self.state = SessionState::Ended(report);
        info!(
            quality = quality_percent,
            tracking = tracking_percent,
            verdict = %report.verdict,
            "session ended"
        );
        report
    }

    /// Scores the last known position once more. No time has passed since the
    /// last committed sample, so repeated calls leave the totals unchanged.
    pub fn settle_final_score(&mut self) {
        let last = self.motion.last_sample();
        let quality_hit = self
            .last_frame
            .is_some_and(|f| self.classifier.is_ideal(f.reading.speed, f.reading.frequency));
        let tracking_hit = self.tracker.evaluate(last.x, last.y);
        self.score.tick(0.0, quality_hit, tracking_hit);
    }

    /// Starts over with fresh state; the torch returns to the origin.
    pub fn restart(&mut self, start_t: f64) {
        let (x, y) = self.config.origin();
        self.motion.reset(Sample::new(x, y, start_t));
        self.score.reset();
        self.state = SessionState::Running;
        self.last_frame = None;
        info!("session restarted");
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running)
    }

    pub fn is_ended(&self) -> bool {
        !self.is_running()
    }

    pub fn final_report(&self) -> Option<&FinalReport> {
        match &self.state {
            SessionState::Ended(report) => Some(report),
            SessionState::Running => None,
        }
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn position(&self) -> Sample {
        self.motion.last_sample()
    }

    pub fn totals(&self) -> SessionTotals {
        self.score.totals()
    }

    pub fn quality_percent(&self) -> f64 {
        self.score.quality_percent()
    }

    pub fn tracking_percent(&self) -> f64 {
        self.score.tracking_percent()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classifier(&self) -> &QualityClassifier {
        &self.classifier
    }

    pub fn tracker(&self) -> &TrackingEvaluator {
        &self.tracker
    }
}
