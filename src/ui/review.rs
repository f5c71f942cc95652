//! Review screen: every answer grouped by section, with edit targets

use super::components::{ButtonStyle, BUTTON_HEIGHT};
use super::layout::{draw_button_row, header_lines, RowButton};
use crate::app::{App, ButtonKind, FocusTarget};
use crate::state::{review_sections, Questionnaire, ReviewSection};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App, session: &Questionnaire) {
    let Some(schema) = session.schema() else {
        return;
    };
    let catalog = &app.catalog;

    let error_rows = if session.submit_error.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),             // Title, subtitle
            Constraint::Min(3),                // Answers
            Constraint::Length(error_rows),    // Submit error
            Constraint::Length(BUTTON_HEIGHT), // Buttons
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(header_lines(
            &catalog.t("projectForm.review.title"),
            &catalog.t("projectForm.review.subtitle"),
        )),
        chunks[0],
    );

    let sections = review_sections(schema, &session.values, catalog);
    let focused_section = match app.focused() {
        Some(FocusTarget::EditSection(index)) => Some(index),
        _ => None,
    };
    let (lines, starts) = answer_lines(&sections, focused_section, &catalog.t("projectForm.review.edit"));

    let answers_area = chunks[1];
    let inner_height = answers_area.height.saturating_sub(2) as usize;
    let scroll = scroll_offset(&starts, focused_section, lines.len(), inner_height);

    let answers = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    frame.render_widget(answers, answers_area);

    if let Some(error) = &session.submit_error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.clone(), Style::default().fg(Color::Red))),
            chunks[2],
        );
    }

    let buttons = [
        RowButton {
            kind: ButtonKind::Previous,
            label: catalog.t("projectForm.actions.previous"),
            enabled: true,
            style: ButtonStyle::Normal,
        },
        RowButton {
            kind: ButtonKind::Save,
            label: if session.is_saving {
                catalog.t("projectForm.actions.saving")
            } else {
                catalog.t("projectForm.actions.save")
            },
            enabled: !session.is_saving,
            style: ButtonStyle::Normal,
        },
        RowButton {
            kind: ButtonKind::Submit,
            label: if session.is_submitting {
                catalog.t("projectForm.actions.submitting")
            } else {
                catalog.t("projectForm.actions.submit")
            },
            enabled: session.can_submit(),
            style: ButtonStyle::Primary,
        },
    ];
    draw_button_row(frame, chunks[3], app, &buttons);
}

/// Lines of the answer list and the first line of every section
fn answer_lines(
    sections: &[ReviewSection],
    focused_section: Option<usize>,
    edit_label: &str,
) -> (Vec<Line<'static>>, Vec<usize>) {
    let mut lines = Vec::new();
    let mut starts = Vec::with_capacity(sections.len());

    for section in sections {
        starts.push(lines.len());
        let is_focused = focused_section == Some(section.index);
        let edit_style = if is_focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}. {}", section.index + 1, section.title),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("[{edit_label}]"), edit_style),
        ]));

        for entry in &section.entries {
            let value_style = if entry.answered {
                Style::default().fg(Color::White)
            } else {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            };
            let mut value_lines = entry.value.split('\n');
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}: ", entry.label),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(value_lines.next().unwrap_or_default().to_string(), value_style),
            ]));
            for rest in value_lines {
                lines.push(Line::from(Span::styled(format!("    {rest}"), value_style)));
            }
        }
        lines.push(Line::from(""));
    }

    (lines, starts)
}

/// Scroll so the focused section header is on screen; buttons show the end
fn scroll_offset(starts: &[usize], focused: Option<usize>, total: usize, height: usize) -> usize {
    let max = total.saturating_sub(height);
    match focused.and_then(|index| starts.get(index)) {
        Some(&start) => start.min(max),
        None => max,
    }
}
