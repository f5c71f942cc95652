//! Section editing screen: progress, section tabs, fields and buttons

use super::field_renderer::{draw_field, field_view};
use crate::app::{App, ButtonKind, FocusTarget};
use crate::state::{visible_fields, Questionnaire};
use crate::ui::components::{ButtonStyle, BUTTON_HEIGHT};
use crate::ui::layout::{draw_button_row, header_lines, RowButton};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Tabs},
    Frame,
};

/// Draw the section currently being edited
pub fn draw_section(frame: &mut Frame, area: Rect, app: &App, session: &Questionnaire) {
    let Some(section) = session.current_section() else {
        return;
    };
    let catalog = &app.catalog;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),             // Title, section heading
            Constraint::Length(1),             // Progress
            Constraint::Length(1),             // Tabs
            Constraint::Length(1),             // Spacer
            Constraint::Min(3),                // Fields
            Constraint::Length(BUTTON_HEIGHT), // Buttons
        ])
        .split(area);

    let title = catalog.t("projectForm.title");
    let heading = catalog.t_or_humanize(&section.title_key(), &section.key);
    frame.render_widget(Paragraph::new(header_lines(&title, &heading)), chunks[0]);

    draw_progress(frame, chunks[1], app, session);
    draw_tabs(frame, chunks[2], app, session);

    // Fields
    let views: Vec<_> = visible_fields(section, &session.values)
        .map(|field| {
            field_view(
                section,
                field,
                &session.values,
                session.error_for(&field.key),
                catalog,
            )
        })
        .collect();
    let focused = match app.focused() {
        Some(FocusTarget::Field(key)) => views.iter().position(|v| v.key == key),
        _ => None,
    };
    let heights: Vec<u16> = views
        .iter()
        .enumerate()
        .map(|(i, view)| view.height(focused == Some(i)))
        .collect();

    let fields_area = chunks[4];
    let first = first_visible_field(&heights, focused, fields_area.height);
    let mut y = fields_area.y;
    for (index, view) in views.iter().enumerate().skip(first) {
        let remaining = fields_area.bottom().saturating_sub(y);
        if heights[index] > remaining && index != first {
            break;
        }
        let height = heights[index].min(remaining);
        let is_active = focused == Some(index);
        draw_field(
            frame,
            Rect {
                y,
                height,
                ..fields_area
            },
            view,
            is_active,
            if is_active { app.option_cursor } else { 0 },
        );
        y += height;
    }

    // Buttons
    let mut buttons = Vec::new();
    if session.current_section_index > 0 {
        buttons.push(RowButton {
            kind: ButtonKind::Previous,
            label: catalog.t("projectForm.actions.previous"),
            enabled: true,
            style: ButtonStyle::Normal,
        });
    }
    buttons.push(RowButton {
        kind: ButtonKind::Save,
        label: if session.is_saving {
            catalog.t("projectForm.actions.saving")
        } else {
            catalog.t("projectForm.actions.save")
        },
        enabled: !session.is_saving,
        style: ButtonStyle::Normal,
    });
    buttons.push(RowButton {
        kind: ButtonKind::Next,
        label: catalog.t("projectForm.actions.next"),
        enabled: true,
        style: ButtonStyle::Primary,
    });
    draw_button_row(frame, chunks[5], app, &buttons);
}

fn draw_progress(frame: &mut Frame, area: Rect, app: &App, session: &Questionnaire) {
    let catalog = &app.catalog;
    let percent = session.progress_percent();
    let label = format!(
        "{} {} {} {}  {}{}",
        catalog.t("projectForm.progress.step"),
        session.current_section_index + 1,
        catalog.t("projectForm.progress.of"),
        session.total_sections(),
        percent,
        catalog.t("projectForm.progress.complete"),
    );

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue).bg(Color::Black))
        .percent(percent.min(100))
        .label(Span::styled(label, Style::default().fg(Color::White)));
    frame.render_widget(gauge, area);
}

/// Section tabs; earlier sections can be revisited, later ones are dimmed
fn draw_tabs(frame: &mut Frame, area: Rect, app: &App, session: &Questionnaire) {
    let Some(schema) = session.schema() else {
        return;
    };
    let current = session.current_section_index;

    let titles: Vec<Line> = schema
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            let title = format!(
                "{} {}",
                index + 1,
                app.catalog.t_or_humanize(&section.title_key(), &section.key)
            );
            let style = if index < current {
                Style::default().fg(Color::Gray)
            } else if index == current {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(title, style))
        })
        .collect();

    // Keep the current tab on screen when there are many sections
    let offset = current.saturating_sub(2);
    let tabs = Tabs::new(titles.into_iter().skip(offset).collect::<Vec<_>>())
        .select(current - offset)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
        .divider(Span::styled("│", Style::default().fg(Color::DarkGray)));
    frame.render_widget(tabs, area);
}

/// Index of the first field to draw so that the focused one fits
fn first_visible_field(heights: &[u16], focused: Option<usize>, available: u16) -> usize {
    let Some(focused) = focused.filter(|&i| i < heights.len()) else {
        return 0;
    };
    let mut first = 0;
    while first < focused && heights[first..=focused].iter().sum::<u16>() > available {
        first += 1;
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_scroll_when_everything_fits() {
        assert_eq!(first_visible_field(&[3, 3, 6], Some(2), 12), 0);
    }

    #[test]
    fn test_scrolls_until_focused_field_fits() {
        assert_eq!(first_visible_field(&[3, 3, 6, 9], Some(3), 12), 3);
        assert_eq!(first_visible_field(&[3, 3, 6, 9], Some(3), 15), 2);
        assert_eq!(first_visible_field(&[3, 3, 6, 9], Some(3), 18), 1);
    }

    #[test]
    fn test_oversized_field_is_shown_first() {
        assert_eq!(first_visible_field(&[3, 20], Some(1), 10), 1);
    }

    #[test]
    fn test_focus_on_buttons_keeps_top() {
        assert_eq!(first_visible_field(&[3, 3], None, 2), 0);
    }
}
