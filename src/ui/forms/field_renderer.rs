//! Field rendering for questionnaire inputs
//!
//! Every field type maps to one [`InputKind`]; [`field_view`] resolves the
//! texts and current value of a field once, and [`draw_field`] draws it.

use crate::i18n::Catalog;
use crate::schema::{field_path, option_key, FieldText, FieldType, FormField, FormSection};
use crate::state::{FormValues, ValidationError};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows a multi-line text input shows
const MULTILINE_ROWS: u16 = 4;

/// Input affordance of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    SingleLine,
    MultiLine,
    /// Collapsed to the selected option until focused
    Dropdown,
    SingleChoice,
    MultiChoice,
}

impl InputKind {
    pub fn for_field(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text | FieldType::Email | FieldType::Phone | FieldType::Url => {
                Self::SingleLine
            }
            FieldType::Textarea => Self::MultiLine,
            FieldType::Select => Self::Dropdown,
            FieldType::Radio => Self::SingleChoice,
            FieldType::Checkbox | FieldType::Multiselect => Self::MultiChoice,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::SingleLine | Self::MultiLine)
    }

    /// Rows needed including borders
    pub fn height(&self, option_count: usize, is_active: bool) -> u16 {
        let options = option_count as u16;
        match self {
            Self::SingleLine => 3,
            Self::MultiLine => MULTILINE_ROWS + 2,
            Self::Dropdown if is_active => options + 2,
            Self::Dropdown => 3,
            Self::SingleChoice | Self::MultiChoice => options + 2,
        }
    }
}

/// One option as shown in a choice input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRow {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// Everything needed to draw one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub key: String,
    pub kind: InputKind,
    pub label: String,
    pub required: bool,
    /// Content of a text input
    pub text: String,
    pub placeholder: Option<String>,
    pub help: Option<String>,
    pub rows: Vec<ChoiceRow>,
    pub error: Option<String>,
}

impl FieldView {
    pub fn height(&self, is_active: bool) -> u16 {
        self.kind.height(self.rows.len(), is_active)
    }
}

/// Resolve a field's texts and current value
pub fn field_view(
    section: &FormSection,
    field: &FormField,
    values: &FormValues,
    error: Option<&ValidationError>,
    catalog: &Catalog,
) -> FieldView {
    let path = field_path(section.origin, &section.key, &field.key);
    let kind = InputKind::for_field(field.field_type);
    let selected = values.list(&field.key);
    let current = values.text(&field.key);

    let rows = field
        .options
        .iter()
        .map(|option| ChoiceRow {
            value: option.value.clone(),
            label: catalog
                .t_or_humanize(&option_key(&path, &option.translation_key), &option.value),
            checked: match kind {
                InputKind::MultiChoice => selected.contains(&option.value),
                _ => current == Some(option.value.as_str()),
            },
        })
        .collect();

    FieldView {
        key: field.key.clone(),
        kind,
        label: catalog.t_or_humanize(&FieldText::Label.key(&path), &field.key),
        required: field.required,
        text: if kind.is_text() {
            current.unwrap_or_default().to_string()
        } else {
            String::new()
        },
        placeholder: catalog
            .lookup(&FieldText::Placeholder.key(&path))
            .map(str::to_string),
        help: catalog.lookup(&FieldText::Help.key(&path)).map(str::to_string),
        rows,
        error: error.map(|e| catalog.t(e.translation_key())),
    }
}

/// Draw a field; `option_cursor` is the highlighted option of choice inputs
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    view: &FieldView,
    is_active: bool,
    option_cursor: usize,
) {
    let border_style = if view.error.is_some() {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = if view.required {
        format!(" {} * ", view.label)
    } else {
        format!(" {} ", view.label)
    };

    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(error) = &view.error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(help) = view.help.as_ref().filter(|_| is_active) {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {help} "),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let lines = match view.kind {
        InputKind::SingleLine | InputKind::MultiLine => text_lines(view, is_active),
        InputKind::Dropdown if !is_active => vec![dropdown_line(view)],
        InputKind::Dropdown | InputKind::SingleChoice => {
            choice_lines(view, is_active, option_cursor, ("(•)", "( )"))
        }
        InputKind::MultiChoice => choice_lines(view, is_active, option_cursor, ("[x]", "[ ]")),
    };

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

fn text_lines(view: &FieldView, is_active: bool) -> Vec<Line<'static>> {
    let cursor = Span::styled(
        if is_active { "▌" } else { "" },
        Style::default().fg(Color::Cyan),
    );

    if view.text.is_empty() {
        let placeholder = view.placeholder.clone().unwrap_or_default();
        return vec![Line::from(vec![
            cursor,
            Span::styled(placeholder, Style::default().fg(Color::DarkGray)),
        ])];
    }

    let style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut lines: Vec<Line> = view
        .text
        .split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), style)))
        .collect();
    if let Some(last) = lines.last_mut() {
        last.spans.push(cursor);
    }

    // Keep the end of a long answer in view
    if view.kind == InputKind::MultiLine {
        let skip = lines.len().saturating_sub(MULTILINE_ROWS as usize);
        lines.drain(..skip);
    }
    lines
}

fn dropdown_line(view: &FieldView) -> Line<'static> {
    match view.rows.iter().find(|row| row.checked) {
        Some(row) => Line::from(format!("{} ▾", row.label)),
        None => Line::from(Span::styled(
            "(none) ▾".to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    }
}

fn choice_lines(
    view: &FieldView,
    is_active: bool,
    option_cursor: usize,
    (on, off): (&str, &str),
) -> Vec<Line<'static>> {
    view.rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let highlighted = is_active && index == option_cursor;
            let style = if highlighted {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if row.checked {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if row.checked { on } else { off };
            Line::from(Span::styled(format!("{marker} {}", row.label), style))
        })
        .collect()
}
