//! Full-screen notices: loading, locked and load failure

use crate::api::Project;
use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_loading(frame: &mut Frame, area: Rect, app: &App) {
    draw_notice(
        frame,
        area,
        None,
        &app.catalog.t("app.loading"),
        Color::DarkGray,
    );
}

pub fn draw_locked(frame: &mut Frame, area: Rect, app: &App, project: &Project) {
    let title = format!("{}: {}", app.catalog.t("app.locked.title"), project.name);
    draw_notice(
        frame,
        area,
        Some(title.as_str()),
        &app.catalog.t("app.locked.message"),
        Color::Yellow,
    );
}

pub fn draw_failed(frame: &mut Frame, area: Rect, app: &App, message: &str) {
    let title = app.catalog.t("app.failed.title");
    draw_notice(
        frame,
        area,
        Some(title.as_str()),
        message,
        Color::Red,
    );
}

/// Centered bordered box with an optional title line
fn draw_notice(frame: &mut Frame, area: Rect, title: Option<&str>, message: &str, color: Color) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(7),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(64_u16.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    let mut lines = Vec::new();
    if let Some(title) = title {
        lines.push(Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(message.to_string()));

    let notice = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(notice, horizontal[1]);
}
