//! Section validation

use super::values::FormValues;
use super::visibility::is_field_visible;
use crate::schema::{FieldType, FieldValidation, FormField, FormSection};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Why a field's answer was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("this field is required")]
    Required,
    #[error("enter a valid email address")]
    InvalidEmail,
    #[error("enter a valid URL")]
    InvalidUrl,
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
    #[error("has an invalid format")]
    PatternMismatch,
}

impl ValidationError {
    /// Translation key of the user-facing message
    pub fn translation_key(&self) -> &'static str {
        match self {
            Self::Required => "projectForm.validation.required",
            Self::InvalidEmail => "projectForm.validation.email",
            Self::InvalidUrl => "projectForm.validation.url",
            Self::TooShort { .. } => "projectForm.validation.minLength",
            Self::TooLong { .. } => "projectForm.validation.maxLength",
            Self::PatternMismatch => "projectForm.validation.pattern",
        }
    }
}

/// Per-field errors, keyed by field key
pub type FieldErrors = BTreeMap<String, ValidationError>;

/// Outcome of validating one section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionValidation {
    pub errors: FieldErrors,
}

impl SectionValidation {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate the visible fields of a section.
///
/// Hidden fields are skipped entirely, whatever they hold.
pub fn validate_section(section: &FormSection, values: &FormValues) -> SectionValidation {
    validate_section_with(section, values, is_field_visible)
}

/// Validate a section using a caller-supplied visibility rule
pub fn validate_section_with<F>(
    section: &FormSection,
    values: &FormValues,
    is_visible: F,
) -> SectionValidation
where
    F: Fn(&FormField, &FormValues) -> bool,
{
    let errors = section
        .fields
        .iter()
        .filter(|field| is_visible(*field, values))
        .filter_map(|field| validate_field(field, values).map(|e| (field.key.clone(), e)))
        .collect();
    SectionValidation { errors }
}

/// First failing rule of a single field, if any
pub fn validate_field(field: &FormField, values: &FormValues) -> Option<ValidationError> {
    if field.required && values.is_blank(&field.key) {
        return Some(ValidationError::Required);
    }

    let text = values.text(&field.key).filter(|s| !s.is_empty())?;

    match field.field_type {
        FieldType::Email if !EMAIL_PATTERN.is_match(text) => {
            return Some(ValidationError::InvalidEmail)
        }
        FieldType::Url if url::Url::parse(text).is_err() => {
            return Some(ValidationError::InvalidUrl)
        }
        _ => {}
    }

    field
        .validation
        .as_ref()
        .and_then(|rules| check_rules(rules, text))
}

fn check_rules(rules: &FieldValidation, text: &str) -> Option<ValidationError> {
    let length = text.chars().count();
    if let Some(min) = rules.min_length.filter(|min| length < *min) {
        return Some(ValidationError::TooShort { min });
    }
    if let Some(max) = rules.max_length.filter(|max| length > *max) {
        return Some(ValidationError::TooLong { max });
    }
    let pattern = rules.pattern.as_deref()?;
    match Regex::new(pattern) {
        Ok(re) if !re.is_match(text) => Some(ValidationError::PatternMismatch),
        _ => None,
    }
}
