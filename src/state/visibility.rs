//! Conditional field visibility

use super::values::{FieldValue, FormValues};
use crate::schema::{DependsOnValue, FormField, FormSchema, FormSection};

/// Whether a field is shown for the current answers.
///
/// A field without a dependency is always visible. Otherwise the controlling
/// field must hold a single value equal to (or contained in) the expected
/// value. Hidden fields keep their stored answers.
pub fn is_field_visible(field: &FormField, values: &FormValues) -> bool {
    let Some(dep) = &field.depends_on else {
        return true;
    };
    let Some(current) = values.text(&dep.field) else {
        return false;
    };
    match &dep.value {
        DependsOnValue::One(expected) => current == expected,
        DependsOnValue::AnyOf(expected) => expected.iter().any(|v| v == current),
    }
}

/// Fields of a section that are currently visible, in schema order
pub fn visible_fields<'a>(
    section: &'a FormSection,
    values: &'a FormValues,
) -> impl Iterator<Item = &'a FormField> + 'a {
    section
        .fields
        .iter()
        .filter(move |field| is_field_visible(field, values))
}

/// Answers restricted to fields visible in at least one section.
///
/// Used at submit time so answers left behind by a changed gating question
/// are not sent with the final questionnaire.
pub fn visible_values(schema: &FormSchema, values: &FormValues) -> FormValues {
    values
        .iter()
        .filter(|(key, _)| {
            schema
                .fields()
                .any(|(_, field)| &field.key == *key && is_field_visible(field, values))
        })
        .map(|(key, value): (&String, &FieldValue)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{get_form_schema, FieldType, FormType};
    use pretty_assertions::assert_eq;

    fn url_field() -> &'static FormField {
        get_form_schema(FormType::Website)
            .section(1)
            .and_then(|s| s.field("existing_website_url"))
            .unwrap()
    }

    #[test]
    fn test_field_without_dependency_is_visible() {
        let field = FormField::text("company_name");
        assert!(is_field_visible(&field, &FormValues::new()));
    }

    #[test]
    fn test_scalar_dependency_requires_exact_match() {
        let mut values = FormValues::new();
        assert!(!is_field_visible(url_field(), &values));

        values.set("has_existing_website", "yes");
        assert!(is_field_visible(url_field(), &values));

        values.set("has_existing_website", "no");
        assert!(!is_field_visible(url_field(), &values));

        values.set("has_existing_website", "Yes");
        assert!(!is_field_visible(url_field(), &values));
    }

    #[test]
    fn test_list_dependency_requires_membership() {
        let field =
            FormField::new("api_docs", FieldType::Url).depends_on_any("system_type", &["api", "saas"]);
        let mut values = FormValues::new();

        values.set("system_type", "saas");
        assert!(is_field_visible(&field, &values));

        values.set("system_type", "internal_tool");
        assert!(!is_field_visible(&field, &values));
    }

    #[test]
    fn test_list_valued_controller_never_matches() {
        let field = FormField::text("detail").depends_on("kinds", "a");
        let mut values = FormValues::new();
        values.set("kinds", vec!["a".to_string()]);
        assert!(!is_field_visible(&field, &values));
    }

    #[test]
    fn test_hiding_keeps_stored_value() {
        let mut values = FormValues::new();
        values.set("has_existing_website", "yes");
        values.set("existing_website_url", "http://old.com");

        values.set("has_existing_website", "no");
        assert!(!is_field_visible(url_field(), &values));
        assert_eq!(values.text("existing_website_url"), Some("http://old.com"));

        values.set("has_existing_website", "yes");
        assert!(is_field_visible(url_field(), &values));
    }

    #[test]
    fn test_visible_fields_filters_in_order() {
        let section = get_form_schema(FormType::Website).section(1).unwrap();
        let mut values = FormValues::new();
        let keys: Vec<_> = visible_fields(section, &values).map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["has_existing_website"]);

        values.set("has_existing_website", "yes");
        let keys: Vec<_> = visible_fields(section, &values).map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "has_existing_website",
                "existing_website_url",
                "existing_website_issues"
            ]
        );
    }

    #[test]
    fn test_visible_values_drops_hidden_and_unknown_keys() {
        let schema = get_form_schema(FormType::Website);
        let mut values = FormValues::new();
        values.set("company_name", "Acme");
        values.set("has_existing_website", "no");
        values.set("existing_website_url", "http://old.com");
        values.set("not_in_schema", "x");

        let submitted = visible_values(schema, &values);
        assert_eq!(submitted.text("company_name"), Some("Acme"));
        assert_eq!(submitted.text("has_existing_website"), Some("no"));
        assert!(submitted.get("existing_website_url").is_none());
        assert!(submitted.get("not_in_schema").is_none());
    }
}
