/// Running scores at a moment of the session, `t` in seconds since start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePoint {
    pub t: f64,
    pub quality: f64,
    pub tracking: f64,
}

impl ScorePoint {
    pub fn new(t: f64, quality: f64, tracking: f64) -> Self {
        Self {
            t,
            quality,
            tracking,
        }
    }

    pub fn quality_xy(&self) -> (f64, f64) {
        (self.t, self.quality)
    }

    pub fn tracking_xy(&self) -> (f64, f64) {
        (self.t, self.tracking)
    }
}
