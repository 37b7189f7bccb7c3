use std::collections::VecDeque;
use std::time::Instant;

use ratatui::layout::Rect;
use tracing::debug;

use crate::{
    config::Config,
    sample::Sample,
    session::{Frame, SampleOutcome, SessionController},
    time_series::ScorePoint,
    ui::{self, playfield},
};

/// Bead segments kept on screen; older ones fall off the start of the trail
pub const TRAIL_CAPACITY: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welding,
    Results,
}

/// Terminal front end around one session. Everything here besides the
/// session itself is display state derived from committed frames.
#[derive(Debug)]
pub struct App {
    pub session: SessionController,
    pub state: AppState,
    pub trail: VecDeque<Frame>,
    pub history: Vec<ScorePoint>,
    pub viewport: Rect,
    clock: Instant,
    started_at_ms: f64,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            session: SessionController::new(config, 0.0),
            state: AppState::Welding,
            trail: VecDeque::with_capacity(TRAIL_CAPACITY),
            history: Vec::new(),
            viewport: Rect::default(),
            clock: Instant::now(),
            started_at_ms: 0.0,
        }
    }

    /// Milliseconds on the app's monotonic clock
    pub fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    /// Pointer moved over a terminal cell; cells off the plate are ignored.
    pub fn on_pointer(&mut self, column: u16, row: u16) -> Option<SampleOutcome> {
        let t = self.now_ms();
        self.on_pointer_at(column, row, t)
    }

    pub fn on_pointer_at(&mut self, column: u16, row: u16, t_ms: f64) -> Option<SampleOutcome> {
        let plate = ui::plate_rect(self.viewport);
        let (x, y) = playfield::to_canvas(plate, column, row, self.session.config())?;
        Some(self.on_sample(Sample::new(x, y, t_ms)))
    }

    pub fn on_sample(&mut self, sample: Sample) -> SampleOutcome {
        let outcome = self.session.on_sample(sample);
        match outcome {
            SampleOutcome::Accepted(frame) => self.record(frame),
            SampleOutcome::Finished(frame, _) => {
                self.record(frame);
                self.state = AppState::Results;
            }
            SampleOutcome::Dropped(reason) => debug!(%reason, "pointer sample dropped"),
        }
        outcome
    }

    fn record(&mut self, frame: Frame) {
        self.history.push(ScorePoint::new(
            (frame.to.t - self.started_at_ms) / 1000.0,
            frame.quality_percent,
            frame.tracking_percent,
        ));
        if self.trail.len() == TRAIL_CAPACITY {
            self.trail.pop_front();
        }
        self.trail.push_back(frame);
    }

    pub fn restart(&mut self) {
        let now = self.now_ms();
        self.restart_at(now);
    }

    pub fn restart_at(&mut self, t_ms: f64) {
        self.started_at_ms = t_ms;
        self.session.restart(t_ms);
        self.trail.clear();
        self.history.clear();
        self.state = AppState::Welding;
    }
}
