use std::collections::VecDeque;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders, Widget,
    },
};

use crate::config::Config;
use crate::session::Frame;
use crate::tracking::TrackingEvaluator;
use crate::ui::hud::bead_color;

const DASH_PX: f64 = 5.0;
const TORCH: &str = "◉";

/// Inner drawing area of the bordered plate
pub fn canvas_rect(field: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(field)
}

/// Maps a terminal cell inside `inner` onto canvas pixels (cell centers).
pub fn to_canvas(inner: Rect, column: u16, row: u16, config: &Config) -> Option<(f64, f64)> {
    if inner.width == 0
        || inner.height == 0
        || column < inner.x
        || row < inner.y
        || column >= inner.x + inner.width
        || row >= inner.y + inner.height
    {
        return None;
    }
    let fx = (f64::from(column - inner.x) + 0.5) / f64::from(inner.width);
    let fy = (f64::from(row - inner.y) + 0.5) / f64::from(inner.height);
    Some((fx * config.canvas_width, fy * config.canvas_height))
}

/// Vertical offsets (px) of the strokes that make up a bead of `width` pixels
pub fn bead_offsets(width: u8) -> Vec<f64> {
    let half = i32::from(width / 2);
    (-half..=half).step_by(2).map(f64::from).collect()
}

/// Dashed guide: alternating 5px runs, sampled every pixel
pub fn dashed_guide(tracker: &TrackingEvaluator, width: f64) -> Vec<(f64, f64)> {
    tracker
        .guide_points(width, 1.0)
        .into_iter()
        .filter(|&(x, _)| ((x / DASH_PX).floor() as i64) % 2 == 0)
        .collect()
}

/// The weld plate: guide wave, bead trail and torch drawn on a Braille canvas.
///
/// Canvas space has its origin top-left with y growing downwards, like the
/// pointer samples. ratatui's canvas grows y upwards, so every point is
/// flipped on the way in.
pub struct Playfield<'a> {
    pub config: &'a Config,
    pub tracker: &'a TrackingEvaluator,
    pub trail: &'a VecDeque<Frame>,
    pub torch: (f64, f64),
}

impl Widget for Playfield<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = self.config.canvas_height;
        let width = self.config.canvas_width;
        let flip = |y: f64| height - y;

        let guide: Vec<(f64, f64)> = dashed_guide(self.tracker, width)
            .into_iter()
            .map(|(x, y)| (x, flip(y)))
            .collect();
        let end_x = self.config.end_x();

        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" plate ")
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .background_color(Color::Rgb(51, 51, 51))
            .marker(Marker::Braille)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                ctx.draw(&Points {
                    coords: &guide,
                    color: Color::Rgb(68, 160, 68),
                });
                ctx.draw(&CanvasLine::new(end_x, 0.0, end_x, height, Color::DarkGray));
                ctx.layer();

                for frame in self.trail {
                    let color = bead_color(frame.bead.color);
                    for dy in bead_offsets(frame.bead.width) {
                        ctx.draw(&CanvasLine::new(
                            frame.from.x,
                            flip(frame.from.y + dy),
                            frame.to.x,
                            flip(frame.to.y + dy),
                            color,
                        ));
                    }
                }
                ctx.layer();

                ctx.print(
                    self.torch.0,
                    flip(self.torch.1),
                    Span::styled(
                        TORCH,
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                );
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner() -> Rect {
        Rect::new(1, 2, 80, 20)
    }

    #[test]
    fn cells_map_inside_the_canvas() {
        let cfg = Config::default();
        let (x, y) = to_canvas(inner(), 1, 2, &cfg).unwrap();
        assert!((x - 5.0).abs() < 1e-9);
        assert!((y - 10.0).abs() < 1e-9);

        let (x, y) = to_canvas(inner(), 80, 21, &cfg).unwrap();
        assert!(x < cfg.canvas_width && y < cfg.canvas_height);
    }

    #[test]
    fn cells_outside_are_ignored() {
        let cfg = Config::default();
        assert!(to_canvas(inner(), 0, 5, &cfg).is_none());
        assert!(to_canvas(inner(), 81, 5, &cfg).is_none());
        assert!(to_canvas(inner(), 5, 1, &cfg).is_none());
        assert!(to_canvas(inner(), 5, 22, &cfg).is_none());
        assert!(to_canvas(Rect::new(0, 0, 0, 0), 0, 0, &cfg).is_none());
    }

    #[test]
    fn bead_strokes_grow_with_width() {
        assert_eq!(bead_offsets(4), vec![-2.0, 0.0, 2.0]);
        assert_eq!(bead_offsets(8).len(), 5);
        assert_eq!(bead_offsets(12).len(), 7);
    }

    #[test]
    fn guide_is_dashed() {
        let t = TrackingEvaluator::default();
        let pts = dashed_guide(&t, 20.0);
        let xs: Vec<f64> = pts.iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0, 10.0, 11.0, 12.0, 13.0, 14.0]);
    }

    #[test]
    fn renders_into_small_areas() {
        let cfg = Config::default();
        let tracker = TrackingEvaluator::new(&cfg);
        for area in [Rect::new(0, 0, 3, 3), Rect::new(0, 0, 100, 30)] {
            let mut buf = Buffer::empty(area);
            Playfield {
                config: &cfg,
                tracker: &tracker,
                trail: &VecDeque::new(),
                torch: cfg.origin(),
            }
            .render(area, &mut buf);
            assert_eq!(*buf.area(), area);
        }
    }
}
