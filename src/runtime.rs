use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEventKind};

pub const TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum WeldEvent {
    /// Pointer moved to a terminal cell
    Pointer { column: u16, row: u16 },
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (pointer, keyboard, resize)
pub trait WeldEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<WeldEvent, RecvTimeoutError>;
}

/// Translates a crossterm event; anything the simulation ignores maps to None.
pub fn translate(ev: CtEvent) -> Option<WeldEvent> {
    match ev {
        CtEvent::Key(key) => Some(WeldEvent::Key(key)),
        CtEvent::Resize(_, _) => Some(WeldEvent::Resize),
        CtEvent::Mouse(m) => match m.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                Some(WeldEvent::Pointer {
                    column: m.column,
                    row: m.row,
                })
            }
            _ => None,
        },
        _ => None,
    }
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<WeldEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if let Some(ev) = translate(ev) {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                }
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WeldEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WeldEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<WeldEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<WeldEvent>) -> Self {
        Self { rx }
    }
}

impl WeldEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WeldEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: WeldEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: WeldEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> WeldEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => WeldEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent};
    use std::sync::mpsc;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CtEvent {
        CtEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        assert_matches!(runner.step(), WeldEvent::Tick);
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(WeldEvent::Pointer { column: 3, row: 4 }).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        assert_matches!(runner.step(), WeldEvent::Pointer { column: 3, row: 4 });
    }

    #[test]
    fn disconnected_source_ticks() {
        let (tx, rx) = mpsc::channel::<WeldEvent>();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::default());
        assert_matches!(runner.step(), WeldEvent::Tick);
    }

    #[test]
    fn mouse_motion_becomes_pointer() {
        assert_matches!(
            translate(mouse(MouseEventKind::Moved, 10, 5)),
            Some(WeldEvent::Pointer { column: 10, row: 5 })
        );
        assert_matches!(
            translate(mouse(MouseEventKind::Drag(MouseButton::Left), 1, 2)),
            Some(WeldEvent::Pointer { column: 1, row: 2 })
        );
        assert_matches!(translate(mouse(MouseEventKind::ScrollUp, 1, 2)), None);
    }

    #[test]
    fn keys_and_resizes_pass_through() {
        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_matches!(translate(CtEvent::Key(key)), Some(WeldEvent::Key(k)) if k.code == KeyCode::Char('r'));
        assert_matches!(translate(CtEvent::Resize(80, 24)), Some(WeldEvent::Resize));
        assert_matches!(translate(CtEvent::FocusGained), None);
    }
}
