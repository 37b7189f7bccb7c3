/// Cumulative seconds spent in each zone
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionTotals {
    pub time_in_quality_zone: f64,
    pub time_in_tracking_zone: f64,
    pub time_played: f64,
}

/// `100 * part / whole`, clamped to [0, 100]; 0 while nothing has been played.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 && part.is_finite() && whole.is_finite() {
        (100.0 * part / whole).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    totals: SessionTotals,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, delta_secs: f64, quality_hit: bool, tracking_hit: bool) {
        let dt = if delta_secs.is_finite() && delta_secs > 0.0 {
            delta_secs
        } else {
            0.0
        };
        self.totals.time_played += dt;
        if quality_hit {
            self.totals.time_in_quality_zone += dt;
        }
        if tracking_hit {
            self.totals.time_in_tracking_zone += dt;
        }
    }

    pub fn totals(&self) -> SessionTotals {
        self.totals
    }

    pub fn quality_percent(&self) -> f64 {
        percentage(self.totals.time_in_quality_zone, self.totals.time_played)
    }

    pub fn tracking_percent(&self) -> f64 {
        percentage(self.totals.time_in_tracking_zone, self.totals.time_played)
    }

    pub fn reset(&mut self) {
        self.totals = SessionTotals::default();
    }
}
