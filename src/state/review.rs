//! Read-only summary of the answers, grouped by section

use super::values::{FieldValue, FormValues};
use super::visibility::visible_fields;
use crate::i18n::Catalog;
use crate::schema::{field_path, option_key, FieldText, FormField, FormSchema, FormSection};

pub const NO_ANSWER_KEY: &str = "projectForm.review.noAnswer";

/// One answered (or unanswered) question on the review screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub field_key: String,
    pub label: String,
    pub value: String,
    pub answered: bool,
}

/// One section on the review screen; `index` is the edit target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSection {
    pub index: usize,
    pub title: String,
    pub entries: Vec<ReviewEntry>,
}

/// Build the review summary for all sections of a schema.
///
/// Only currently visible fields are listed.
pub fn review_sections(
    schema: &FormSchema,
    values: &FormValues,
    catalog: &Catalog,
) -> Vec<ReviewSection> {
    schema
        .sections
        .iter()
        .enumerate()
        .map(|(index, section)| ReviewSection {
            index,
            title: catalog.t_or_humanize(&section.title_key(), &section.key),
            entries: visible_fields(section, values)
                .map(|field| review_entry(section, field, values, catalog))
                .collect(),
        })
        .collect()
}

fn review_entry(
    section: &FormSection,
    field: &FormField,
    values: &FormValues,
    catalog: &Catalog,
) -> ReviewEntry {
    let path = field_path(section.origin, &section.key, &field.key);
    let answered = !values.is_blank(&field.key);
    ReviewEntry {
        field_key: field.key.clone(),
        label: catalog.t_or_humanize(&FieldText::Label.key(&path), &field.key),
        value: display_value(section, field, values.get(&field.key), catalog),
        answered,
    }
}

/// Human readable form of a stored answer.
///
/// Option values resolve to their labels, lists are joined with ", " in the
/// stored order, and empty answers show the "no answer" placeholder.
pub fn display_value(
    section: &FormSection,
    field: &FormField,
    value: Option<&FieldValue>,
    catalog: &Catalog,
) -> String {
    let path = field_path(section.origin, &section.key, &field.key);
    let label_for = |raw: &str| match field.option(raw) {
        Some(option) => catalog.t_or_humanize(&option_key(&path, &option.translation_key), raw),
        None => raw.to_string(),
    };

    match value {
        Some(v) if v.is_empty() => catalog.t(NO_ANSWER_KEY),
        Some(FieldValue::Text(text)) => label_for(text),
        Some(FieldValue::List(items)) => items
            .iter()
            .map(|item| label_for(item))
            .collect::<Vec<_>>()
            .join(", "),
        None => catalog.t(NO_ANSWER_KEY),
    }
}
