//! Questionnaire schema definitions
//!
//! A schema is plain data: an ordered list of sections, each holding an
//! ordered list of fields. The website and system schemas are fixed tables;
//! the combined schema is derived from them rather than maintained by hand.

mod paths;
mod system;
mod website;

pub use paths::{field_path, option_key, section_title_key, FieldText};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Which questionnaire the customer is filling in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    Website,
    System,
    Both,
}

impl FormType {
    /// All form types in the order they are offered on the selection screen
    pub const ALL: [FormType; 3] = [FormType::Website, FormType::System, FormType::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::System => "system",
            Self::Both => "both",
        }
    }

    /// Translation key of the form type's display name
    pub fn label_key(&self) -> String {
        format!("projectForm.formTypes.{}", self.as_str())
    }
}

/// The source schema a section was defined in.
///
/// Sections of the combined schema keep the origin of the schema they were
/// copied from, so their translation keys resolve the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaOrigin {
    Website,
    System,
}

impl SchemaOrigin {
    /// Segment used in `projectForm.<segment>.<section>.<field>` keys
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::System => "system",
        }
    }
}

/// Input kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Phone,
    Url,
    Select,
    Radio,
    Checkbox,
    Multiselect,
}

impl FieldType {
    /// Fields whose value is a list of option values
    pub fn is_multi_choice(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Multiselect)
    }

    /// Fields whose value is one of the field's options
    pub fn is_single_choice(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }

    /// Fields edited by typing
    pub fn is_free_text(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Textarea | Self::Email | Self::Phone | Self::Url
        )
    }
}

/// One selectable option of a choice field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldOption {
    pub value: String,
    pub translation_key: String,
}

/// Expected value(s) of the controlling field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependsOnValue {
    One(String),
    AnyOf(Vec<String>),
}

/// Makes a field visible only while another field of the same section holds
/// an expected value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependsOn {
    pub field: String,
    pub value: DependsOnValue,
}

/// Optional per-field format constraints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// A single question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FormFieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

impl FormField {
    pub fn new(key: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_string(),
            field_type,
            required: false,
            depends_on: None,
            options: Vec::new(),
            validation: None,
        }
    }

    pub fn text(key: &str) -> Self {
        Self::new(key, FieldType::Text)
    }

    pub fn textarea(key: &str) -> Self {
        Self::new(key, FieldType::Textarea)
    }

    /// Radio field whose option values double as translation keys
    pub fn radio(key: &str, options: &[&str]) -> Self {
        Self::new(key, FieldType::Radio).with_options(options)
    }

    /// Multiselect field whose option values double as translation keys
    pub fn multiselect(key: &str, options: &[&str]) -> Self {
        Self::new(key, FieldType::Multiselect).with_options(options)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn depends_on(mut self, field: &str, value: &str) -> Self {
        self.depends_on = Some(DependsOn {
            field: field.to_string(),
            value: DependsOnValue::One(value.to_string()),
        });
        self
    }

    pub fn depends_on_any(mut self, field: &str, values: &[&str]) -> Self {
        self.depends_on = Some(DependsOn {
            field: field.to_string(),
            value: DependsOnValue::AnyOf(values.iter().map(|v| v.to_string()).collect()),
        });
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options
            .iter()
            .map(|value| FormFieldOption {
                value: value.to_string(),
                translation_key: value.to_string(),
            })
            .collect();
        self
    }

    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Find an option by its stored value
    pub fn option(&self, value: &str) -> Option<&FormFieldOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// A named step of the questionnaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSection {
    pub key: String,
    pub origin: SchemaOrigin,
    pub fields: Vec<FormField>,
}

impl FormSection {
    pub fn new(key: &str, origin: SchemaOrigin, fields: Vec<FormField>) -> Self {
        Self {
            key: key.to_string(),
            origin,
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Translation key of the section heading
    pub fn title_key(&self) -> String {
        section_title_key(self.origin, &self.key)
    }
}

/// Complete structural definition of one questionnaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub form_type: FormType,
    pub sections: Vec<FormSection>,
}

impl FormSchema {
    pub fn total_sections(&self) -> usize {
        self.sections.len()
    }

    pub fn section(&self, index: usize) -> Option<&FormSection> {
        self.sections.get(index)
    }

    /// First section that asks the given question
    pub fn section_for_field(&self, field_key: &str) -> Option<&FormSection> {
        self.sections
            .iter()
            .find(|s| s.fields.iter().any(|f| f.key == field_key))
    }

    /// All fields in schema order, with the section they belong to
    pub fn fields(&self) -> impl Iterator<Item = (&FormSection, &FormField)> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter().map(move |f| (s, f)))
    }
}

static WEBSITE_SCHEMA: Lazy<FormSchema> = Lazy::new(website::schema);
static SYSTEM_SCHEMA: Lazy<FormSchema> = Lazy::new(system::schema);
static COMBINED_SCHEMA: Lazy<FormSchema> =
    Lazy::new(|| combine(&WEBSITE_SCHEMA, &SYSTEM_SCHEMA));

/// The website questionnaire (8 sections)
pub fn website_form_schema() -> &'static FormSchema {
    &WEBSITE_SCHEMA
}

/// The system questionnaire (9 sections)
pub fn system_form_schema() -> &'static FormSchema {
    &SYSTEM_SCHEMA
}

/// Look up the schema for a form type
pub fn get_form_schema(form_type: FormType) -> &'static FormSchema {
    match form_type {
        FormType::Website => &WEBSITE_SCHEMA,
        FormType::System => &SYSTEM_SCHEMA,
        FormType::Both => &COMBINED_SCHEMA,
    }
}

/// Website sections followed by system sections, each keeping its own order
fn combine(website: &FormSchema, system: &FormSchema) -> FormSchema {
    FormSchema {
        form_type: FormType::Both,
        sections: website
            .sections
            .iter()
            .chain(system.sections.iter())
            .cloned()
            .collect(),
    }
}
