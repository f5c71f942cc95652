//! Form type selection screen

use super::layout::header_lines;
use crate::app::App;
use crate::schema::FormType;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Height of one choice card
const CARD_HEIGHT: u16 = 7;

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let catalog = &app.catalog;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),           // Title, subtitle
            Constraint::Length(1),           // Spacer
            Constraint::Length(1),           // Question
            Constraint::Length(1),           // Spacer
            Constraint::Length(CARD_HEIGHT), // Cards
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(header_lines(
            &catalog.t("projectForm.title"),
            &catalog.t("projectForm.subtitle"),
        )),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            catalog.t("projectForm.chooseType"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        chunks[2],
    );

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .spacing(2)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[4]);

    for (index, (form_type, card)) in FormType::ALL.iter().zip(cards.iter()).enumerate() {
        let is_selected = index == app.type_cursor;
        let border_style = if is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title_style = if is_selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let content = vec![
            Line::from(Span::styled(catalog.t(&form_type.label_key()), title_style)),
            Line::from(""),
            Line::from(Span::styled(
                catalog.t(&format!(
                    "projectForm.formTypeDescriptions.{}",
                    form_type.as_str()
                )),
                Style::default().fg(Color::Gray),
            )),
        ];

        let block = Block::default()
            .title(format!(" {} ", index + 1))
            .borders(Borders::ALL)
            .border_style(border_style);
        frame.render_widget(
            Paragraph::new(content)
                .wrap(Wrap { trim: true })
                .block(block),
            *card,
        );
    }
}
