use itertools::Itertools;

use crate::time_series::ScorePoint;

/// Pointer samples arrive far faster than the chart can show; one point per bucket
pub const CHART_BUCKET_SECS: f64 = 0.1;

/// X axis extent (seconds) for the results chart; never shorter than one second
pub fn compute_chart_duration(points: &[ScorePoint]) -> f64 {
    let first = points.first().map_or(0.0, |p| p.t);
    let last = points.last().map_or(0.0, |p| p.t);
    let duration = last - first;
    if duration < 1.0 {
        1.0
    } else {
        duration
    }
}

/// Shift the series so the chart starts at zero, keeping the latest point of
/// every bucket.
pub fn chart_series(points: &[ScorePoint]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let t0 = points.first().map_or(0.0, |p| p.t);
    let buckets = points
        .iter()
        .chunk_by(move |p| ((p.t - t0) / CHART_BUCKET_SECS).floor() as i64);
    let series = buckets
        .into_iter()
        .filter_map(|(_, bucket)| bucket.last())
        .map(|p| {
            let shifted = ScorePoint::new(p.t - t0, p.quality, p.tracking);
            (shifted.quality_xy(), shifted.tracking_xy())
        })
        .unzip();
    series
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_spans_one_second() {
        assert_eq!(compute_chart_duration(&[]), 1.0);
    }

    #[test]
    fn duration_follows_the_series() {
        let pts = [
            ScorePoint::new(0.5, 0.0, 100.0),
            ScorePoint::new(4.0, 50.0, 90.0),
        ];
        assert_eq!(compute_chart_duration(&pts), 3.5);
        let (q, t) = chart_series(&pts);
        assert_eq!(q, vec![(0.0, 0.0), (3.5, 50.0)]);
        assert_eq!(t, vec![(0.0, 100.0), (3.5, 90.0)]);
    }

    #[test]
    fn dense_series_is_bucketed() {
        let pts: Vec<ScorePoint> = (0..50)
            .map(|i| ScorePoint::new(i as f64 * 0.016, i as f64, 100.0))
            .collect();
        let (q, t) = chart_series(&pts);
        // 0.8s of samples land in 8 buckets
        assert_eq!(q.len(), 8);
        assert_eq!(t.len(), 8);
        assert_eq!(q.last(), Some(&(49.0 * 0.016, 49.0)));
        assert!(q.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(10.64), "10.6");
    }
}
