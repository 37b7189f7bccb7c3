use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::quality::{BeadColor, Trend};
use crate::session::Frame;

pub fn format_speed(mm_per_sec: f64) -> String {
    format!("{mm_per_sec:.1}")
}

pub fn format_frequency(hz: f64) -> String {
    format!("{hz:.1}")
}

pub fn format_percent(p: f64) -> String {
    format!("{:.0}%", p.clamp(0.0, 100.0))
}

pub fn bead_color(color: BeadColor) -> Color {
    match color {
        BeadColor::Ideal => Color::Rgb(60, 179, 113),
        BeadColor::SpeedViolation => Color::Rgb(255, 69, 0),
        BeadColor::FrequencyViolation => Color::Rgb(255, 215, 0),
    }
}

/// Speed faults are shown at full strength, the rest slightly dimmed
pub fn bead_style(color: BeadColor) -> Style {
    let style = Style::default().fg(bead_color(color));
    match color {
        BeadColor::SpeedViolation => style.add_modifier(Modifier::BOLD),
        _ => style.add_modifier(Modifier::DIM),
    }
}

pub fn trend_style(trend: Trend) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match trend {
        Trend::Ideal => bold.fg(Color::Green),
        Trend::TooFast => bold.fg(Color::Red),
        Trend::TooSlow => bold.fg(Color::Yellow),
    }
}

/// Numbers shown on the heads-up line, projected from committed session
/// values. Nothing here is ever parsed back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudValues {
    pub speed: f64,
    pub frequency: f64,
    pub speed_trend: Trend,
    pub frequency_trend: Trend,
    pub quality_percent: f64,
    pub tracking_percent: f64,
    pub bead: Option<(BeadColor, u8)>,
}

impl HudValues {
    pub fn idle() -> Self {
        Self {
            speed: 0.0,
            frequency: 0.0,
            speed_trend: Trend::TooSlow,
            frequency_trend: Trend::TooSlow,
            quality_percent: 0.0,
            tracking_percent: 0.0,
            bead: None,
        }
    }

    pub fn from_frame(frame: &Frame, speed_trend: Trend, frequency_trend: Trend) -> Self {
        Self {
            speed: frame.reading.speed,
            frequency: frame.reading.frequency,
            speed_trend,
            frequency_trend,
            quality_percent: frame.quality_percent,
            tracking_percent: frame.tracking_percent,
            bead: Some((frame.bead.color, frame.bead.width)),
        }
    }

    pub fn line(&self) -> Line<'static> {
        let label = Style::default().add_modifier(Modifier::DIM);
        let value = Style::default().add_modifier(Modifier::BOLD);
        let mut spans = vec![
            Span::styled("travel ", label),
            Span::styled(format_speed(self.speed), trend_style(self.speed_trend)),
            Span::styled(" mm/s   weave ", label),
            Span::styled(
                format_frequency(self.frequency),
                trend_style(self.frequency_trend),
            ),
            Span::styled(" Hz   quality ", label),
            Span::styled(format_percent(self.quality_percent), value),
            Span::styled("   tracking ", label),
            Span::styled(format_percent(self.tracking_percent), value),
        ];
        if let Some((color, width)) = self.bead {
            spans.push(Span::styled("   bead ", label));
            spans.push(Span::styled(format!("{width}px {color}"), bead_style(color)));
        }
        Line::from(spans)
    }
}
