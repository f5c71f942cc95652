//! Layout components (content area, button row, status bar)

use super::components::{render_button, ButtonStyle, BUTTON_HEIGHT};
use crate::app::{App, ButtonKind, FocusTarget, Phase};
use crate::platform::{NEXT_SHORTCUT, PREVIOUS_SHORTCUT, SAVE_SHORTCUT};
use crate::state::Screen;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Width of one button in a button row
const BUTTON_WIDTH: u16 = 18;

/// Split the screen into content and a one-line status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Header block of a screen: bold title plus a dimmed subtitle line
pub fn header_lines(title: &str, subtitle: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            subtitle.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// A button in a button row
pub struct RowButton {
    pub kind: ButtonKind,
    pub label: String,
    pub enabled: bool,
    pub style: ButtonStyle,
}

/// Draw buttons left to right, highlighting the focused one
pub fn draw_button_row(frame: &mut Frame, area: Rect, app: &App, buttons: &[RowButton]) {
    let mut constraints: Vec<Constraint> = buttons
        .iter()
        .map(|_| Constraint::Length(BUTTON_WIDTH))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .spacing(1)
        .constraints(constraints)
        .split(Rect {
            height: BUTTON_HEIGHT.min(area.height),
            ..area
        });

    let focused = app.focused();
    for (button, chunk) in buttons.iter().zip(chunks.iter()) {
        let is_selected = focused == Some(FocusTarget::Button(button.kind));
        render_button(
            frame,
            *chunk,
            &button.label,
            is_selected,
            button.enabled,
            button.style,
        );
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::raw(" ")];

    for (key, action) in view_hints(app) {
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(
            format!(":{}  ", app.catalog.t(&format!("app.hints.{action}"))),
            Style::default().fg(Color::Gray),
        ));
    }

    if let Some(message) = &app.status_message {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Project reference on the right
    let project = format!(" {} ", app.project_id());
    let width = project.chars().count() as u16;
    if width < area.width / 2 {
        let project_area = Rect {
            x: area.x + area.width - width,
            width,
            ..area
        };
        let widget = Paragraph::new(project)
            .style(Style::default().bg(Color::DarkGray).fg(Color::Black));
        frame.render_widget(widget, project_area);
    }
}

/// Key hints for the current screen as (key, hint name) pairs
fn view_hints(app: &App) -> Vec<(String, &'static str)> {
    let hint = |key: &str, action: &'static str| (key.to_string(), action);

    match &app.phase {
        Phase::Loading | Phase::Locked(_) => vec![hint("Esc", "quit")],
        Phase::Failed(_) => vec![hint("r", "retry"), hint("Esc", "quit")],
        Phase::Ready(session) => match session.screen() {
            Screen::TypeSelection => vec![
                hint("←/→", "choose"),
                hint("Enter", "start"),
                hint("Esc", "cancel"),
            ],
            Screen::Editing(_) => {
                let mut hints = vec![hint("Tab", "focus")];
                if app
                    .focused_field()
                    .is_some_and(|field| !field.field_type.is_free_text())
                {
                    hints.push(hint("↑/↓", "choose"));
                    hints.push(hint("Space", "pick"));
                }
                hints.extend([
                    hint(NEXT_SHORTCUT, "next"),
                    hint(PREVIOUS_SHORTCUT, "previous"),
                    hint(SAVE_SHORTCUT, "save"),
                    hint("Esc", "cancel"),
                ]);
                hints
            }
            Screen::Review => vec![
                hint("Tab", "focus"),
                hint("Enter", "activate"),
                hint(SAVE_SHORTCUT, "save"),
                hint("Esc", "cancel"),
            ],
            Screen::Confirmation => vec![hint("Enter", "back"), hint("c", "copy")],
        },
    }
}
