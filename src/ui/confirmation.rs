//! Confirmation screen shown after a successful submit

use super::components::{render_button, ButtonStyle, BUTTON_HEIGHT};
use crate::app::App;
use crate::state::Questionnaire;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App, session: &Questionnaire) {
    let catalog = &app.catalog;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(12),            // Message and next steps
            Constraint::Length(BUTTON_HEIGHT), // Back button
            Constraint::Min(0),
        ])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("✓ {}", catalog.t("projectForm.confirmation.title")),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(catalog.t("projectForm.confirmation.message")),
        Line::from(""),
        Line::from(Span::styled(
            catalog.t("projectForm.confirmation.nextSteps"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for step in 1..=3 {
        lines.push(Line::from(format!(
            "  {step}. {}",
            catalog.t(&format!("projectForm.confirmation.step{step}"))
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("{}: ", catalog.t("projectForm.confirmation.referenceId")),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            session.project_id.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        chunks[0],
    );

    let button_area = Rect {
        width: 24_u16.min(chunks[1].width),
        ..chunks[1]
    };
    render_button(
        frame,
        button_area,
        &catalog.t("projectForm.confirmation.backToDashboard"),
        true,
        true,
        ButtonStyle::Primary,
    );
}
