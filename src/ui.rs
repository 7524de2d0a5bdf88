use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{self, Canvas},
        Block, Borders, Paragraph, Widget, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

use stride::geo::Point;
use stride::session::Status;

use crate::{App, HISTORY_CARD_WIDTH};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.controller.status() {
            Status::Idle => render_start_screen(self, area, buf),
            Status::Running | Status::Paused => render_running_screen(self, area, buf),
        }
    }
}

fn render_start_screen(app: &App, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(2), // hints / alert
            Constraint::Min(0),    // history
        ])
        .split(area);

    Paragraph::new(Span::styled("stride", bold.fg(Color::Green)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let line = if let Some(alert) = app.controller.alert() {
        Line::from(Span::styled(
            alert.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            "(s)tart a run · (t)weet your latest run · (q)uit",
            dim,
        ))
    };
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

    render_history(app, chunks[2], buf);
}

fn render_history(app: &App, area: Rect, buf: &mut Buffer) {
    let history = app.controller.history();
    if history.is_empty() {
        Paragraph::new(Span::styled(
            "no runs yet",
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(area, buf);
        return;
    }

    let now = chrono::Local::now();
    let card_width = HISTORY_CARD_WIDTH.min(area.width);
    let x = area.x + (area.width.saturating_sub(card_width)) / 2;

    let mut y = area.y;
    for record in history.runs() {
        // each card is three lines: stats, completed-at, separator
        if y + 2 > area.bottom() {
            break;
        }
        let card = Rect::new(x, y, card_width, 2);
        let stats = format!(
            "{} km    {}    {} min/km",
            record.distance_km, record.elapsed, record.pace
        );
        // pad the narrower line so both render centered against the card
        let ago = record.completed_ago(now);
        let pad = stats.width().saturating_sub(ago.width()) / 2;
        let ago_line = format!("{}{}", " ".repeat(pad), ago);

        Paragraph::new(vec![
            Line::from(Span::styled(
                stats,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                ago_line,
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center)
        .render(card, buf);

        y += 3;
    }
}

fn render_running_screen(app: &App, area: Rect, buf: &mut Buffer) {
    let readout = app.controller.readout();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(3), // readout
            Constraint::Min(5),    // route canvas
            Constraint::Length(1), // status / alert
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[0]);

    render_stat(&readout.distance, "km", columns[0], buf);
    render_stat(&readout.time, "time", columns[1], buf);
    render_stat(&readout.pace, "min/km", columns[2], buf);

    render_route(app, chunks[1], buf);

    let status_line = if let Some(alert) = app.controller.alert() {
        Line::from(Span::styled(
            alert.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else {
        let status = app.controller.status();
        let status_style = match status {
            Status::Paused => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            _ => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        };
        Line::from(vec![
            Span::styled(status.to_string(), status_style),
            Span::styled(
                "  ·  (space) pause/resume · (f)inish",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ])
    };
    Paragraph::new(status_line)
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
}

fn render_stat(value: &str, unit: &str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            unit.to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .alignment(Alignment::Center)
    .render(area, buf);
}

fn render_route(app: &App, area: Rect, buf: &mut Buffer) {
    let map = app.controller.map();
    let Some((min, max)) = map.bounds() else {
        Paragraph::new(Span::styled(
            "waiting for a gps fix…",
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(area, buf);
        return;
    };

    // pad degenerate bounds so a single fix still renders inside the view
    let pad_lat = ((max.lat - min.lat) * 0.15).max(0.0005);
    let pad_lon = ((max.lon - min.lon) * 0.15).max(0.0005);

    let route: Vec<Point> = map.route().to_vec();
    let current = map.center();

    Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("route"))
        .x_bounds([min.lon - pad_lon, max.lon + pad_lon])
        .y_bounds([min.lat - pad_lat, max.lat + pad_lat])
        .paint(move |ctx| {
            for pair in route.windows(2) {
                ctx.draw(&canvas::Line {
                    x1: pair[0].lon,
                    y1: pair[0].lat,
                    x2: pair[1].lon,
                    y2: pair[1].lat,
                    color: Color::Blue,
                });
            }
            if let Some(p) = current {
                ctx.draw(&canvas::Points {
                    coords: &[(p.lon, p.lat)],
                    color: Color::Green,
                });
            }
        })
        .render(area, buf);
}
