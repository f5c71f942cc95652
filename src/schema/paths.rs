//! Translation key paths for questionnaire text
//!
//! Field text lives under `projectForm.<segment>.<section>.<field>`, where the
//! segment is the origin of the section (there is no segment for `both`).

use super::SchemaOrigin;

/// Text attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldText {
    Label,
    Placeholder,
    Help,
}

impl FieldText {
    fn suffix(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Placeholder => "placeholder",
            Self::Help => "help",
        }
    }

    pub fn key(&self, field_path: &str) -> String {
        format!("{field_path}.{}", self.suffix())
    }
}

/// Base path of a field's translations
pub fn field_path(origin: SchemaOrigin, section_key: &str, field_key: &str) -> String {
    format!("projectForm.{}.{section_key}.{field_key}", origin.segment())
}

/// Translation key of an option's display label
pub fn option_key(field_path: &str, translation_key: &str) -> String {
    format!("{field_path}.options.{translation_key}")
}

/// Translation key of a section heading
pub fn section_title_key(origin: SchemaOrigin, section_key: &str) -> String {
    match origin {
        SchemaOrigin::Website => format!("projectForm.sections.{section_key}"),
        SchemaOrigin::System => format!("projectForm.system.sections.{section_key}"),
    }
}
