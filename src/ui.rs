pub mod charting;
pub mod hud;
pub mod playfield;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, AppState},
    ui::hud::{format_percent, HudValues},
    ui::playfield::Playfield,
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

/// Regions of the welding screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeldLayout {
    pub hud: Rect,
    pub field: Rect,
    pub legend: Rect,
}

pub fn weld_layout(area: Rect) -> WeldLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // hud
            Constraint::Min(3),    // plate
            Constraint::Length(1), // legend
        ])
        .split(area);
    WeldLayout {
        hud: chunks[0],
        field: chunks[1],
        legend: chunks[2],
    }
}

/// Where pointer cells land on the plate for a terminal of `area`
pub fn plate_rect(area: Rect) -> Rect {
    playfield::canvas_rect(weld_layout(area).field)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        match self.state {
            AppState::Welding => {
                let layout = weld_layout(area);

                let hud = match session.last_frame() {
                    Some(frame) => HudValues::from_frame(
                        frame,
                        session.classifier().speed_trend(frame.reading.speed),
                        session.classifier().frequency_trend(frame.reading.frequency),
                    ),
                    None => HudValues::idle(),
                };
                Paragraph::new(hud.line())
                    .alignment(Alignment::Center)
                    .render(layout.hud, buf);

                let position = session.position();
                Playfield {
                    config: session.config(),
                    tracker: session.tracker(),
                    trail: &self.trail,
                    torch: (position.x, position.y),
                }
                .render(layout.field, buf);

                Paragraph::new(Span::styled(
                    "follow the dashed guide left to right with the mouse / (r)estart / (esc)ape",
                    italic_style,
                ))
                .alignment(Alignment::Center)
                .render(layout.legend, buf);
            }
            AppState::Results => {
                let Some(report) = session.final_report() else {
                    return;
                };

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([
                        Constraint::Min(1),    // chart
                        Constraint::Length(1), // final scores
                        Constraint::Length(2), // verdict
                        Constraint::Length(1), // padding
                        Constraint::Length(1), // legend
                    ])
                    .split(area);

                let duration = charting::compute_chart_duration(&self.history);
                let (quality, tracking) = charting::chart_series(&self.history);
                let datasets = vec![
                    Dataset::default()
                        .name("quality")
                        .marker(ratatui::symbols::Marker::Braille)
                        .style(Style::default().fg(Color::Magenta))
                        .graph_type(GraphType::Line)
                        .data(&quality),
                    Dataset::default()
                        .name("tracking")
                        .marker(ratatui::symbols::Marker::Braille)
                        .style(Style::default().fg(Color::Cyan))
                        .graph_type(GraphType::Line)
                        .data(&tracking),
                ];

                Chart::new(datasets)
                    .x_axis(
                        Axis::default()
                            .title("seconds")
                            .bounds([0.0, duration])
                            .labels(vec![
                                Span::styled("0", bold_style),
                                Span::styled(charting::format_label(duration), bold_style),
                            ]),
                    )
                    .y_axis(
                        Axis::default()
                            .title("%")
                            .bounds([0.0, 100.0])
                            .labels(vec![
                                Span::styled("0", bold_style),
                                Span::styled("100", bold_style),
                            ]),
                    )
                    .render(chunks[0], buf);

                Paragraph::new(Span::styled(
                    format!(
                        "final quality {}   final tracking {}",
                        format_percent(report.quality_percent),
                        format_percent(report.tracking_percent)
                    ),
                    bold_style,
                ))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);

                let verdict_color = match report.verdict {
                    crate::session::Verdict::Excellent => Color::Green,
                    crate::session::Verdict::Good => Color::Yellow,
                    crate::session::Verdict::NeedsImprovement => Color::Red,
                };
                Paragraph::new(Span::styled(
                    report.verdict.message(),
                    bold_style.fg(verdict_color),
                ))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[2], buf);

                Paragraph::new(Span::styled("(r)estart / (esc)ape", italic_style))
                    .render(chunks[4], buf);

                let banner = centered(chunks[0], 34, 3);
                Clear.render(banner, buf);
                Paragraph::new(Line::from(Span::styled(
                    "SIMULATION COMPLETE!",
                    bold_style.fg(Color::White),
                )))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Cyan)),
                )
                .render(banner, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sample::Sample;

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn finished_app() -> App {
        let mut app = App::new(Config::default());
        let tracker = *app.session.tracker();
        let mut t = 0.0;
        let mut x = 80.0;
        while app.state == AppState::Welding {
            t += 20.0;
            x += 20.0;
            app.on_sample(Sample::new(x, tracker.ideal_y(x), t));
        }
        app
    }

    #[test]
    fn welding_screen_shows_hud_and_legend() {
        let app = App::new(Config::default());
        let text = rendered(&app, Rect::new(0, 0, 120, 30));
        assert!(text.contains("travel"));
        assert!(text.contains("tracking"));
        assert!(text.contains("(r)estart"));
    }

    #[test]
    fn welding_screen_after_samples() {
        let mut app = App::new(Config::default());
        app.on_sample(Sample::new(90.0, 200.0, 16.0));
        app.on_sample(Sample::new(92.0, 210.0, 32.0));
        let text = rendered(&app, Rect::new(0, 0, 120, 30));
        assert!(text.contains("mm/s"));
        assert!(text.contains("bead"));
    }

    #[test]
    fn results_screen_shows_verdict_and_banner() {
        let app = finished_app();
        assert_eq!(app.state, AppState::Results);
        let text = rendered(&app, Rect::new(0, 0, 120, 30));
        assert!(text.contains("SIMULATION COMPLETE!"));
        assert!(text.contains("final quality"));
        assert!(text.contains("NEEDS IMPROVEMENT"));
    }

    #[test]
    fn renders_at_awkward_sizes() {
        let welding = App::new(Config::default());
        let done = finished_app();
        for area in [
            Rect::new(0, 0, 10, 5),
            Rect::new(0, 0, 200, 5),
            Rect::new(0, 0, 20, 50),
            Rect::new(0, 0, 1, 1),
        ] {
            let mut a = Buffer::empty(area);
            (&welding).render(area, &mut a);
            assert_eq!(*a.area(), area);
            let mut b = Buffer::empty(area);
            (&done).render(area, &mut b);
            assert_eq!(*b.area(), area);
        }
    }

    #[test]
    fn plate_sits_inside_the_frame() {
        let area = Rect::new(0, 0, 80, 24);
        let plate = plate_rect(area);
        assert!(plate.width > 0 && plate.height > 0);
        assert!(plate.x >= HORIZONTAL_MARGIN);
        assert!(plate.y >= 1);
        assert!(plate.x + plate.width <= area.width);
        assert!(plate.y + plate.height <= area.height);
    }
}
