//! System development project questionnaire

use super::{FormField, FormSchema, FormSection, FormType, SchemaOrigin};

pub(super) fn schema() -> FormSchema {
    let section = |key: &str, fields| FormSection::new(key, SchemaOrigin::System, fields);

    FormSchema {
        form_type: FormType::System,
        sections: vec![
            section(
                "overview",
                vec![
                    FormField::radio(
                        "system_type",
                        &[
                            "internal_tool",
                            "customer_portal",
                            "saas",
                            "mobile_app",
                            "api",
                            "automation",
                            "other",
                        ],
                    )
                    .required(),
                    FormField::textarea("problem_description").required(),
                    FormField::textarea("expected_outcome").required(),
                ],
            ),
            section(
                "current_systems",
                vec![
                    FormField::multiselect(
                        "existing_systems",
                        &[
                            "excel",
                            "custom_system",
                            "saas_tools",
                            "paper_based",
                            "erp",
                            "crm",
                            "other",
                        ],
                    ),
                    FormField::textarea("pain_points"),
                    FormField::radio("data_to_migrate", &["yes_much", "yes_some", "no", "unsure"]),
                ],
            ),
            section(
                "requirements",
                vec![
                    FormField::textarea("must_have_features").required(),
                    FormField::textarea("nice_to_have_features"),
                    FormField::textarea("workflow_description"),
                ],
            ),
            section(
                "users",
                vec![
                    FormField::radio("user_count", &["small", "medium", "large", "enterprise"])
                        .required(),
                    FormField::multiselect(
                        "user_types",
                        &["admin", "internal_users", "customers", "partners", "public"],
                    )
                    .required(),
                    FormField::multiselect(
                        "access_requirements",
                        &["sso", "mfa", "role_based", "audit_log", "ip_restriction"],
                    ),
                ],
            ),
            section(
                "data",
                vec![
                    FormField::multiselect(
                        "data_types",
                        &[
                            "customer_data",
                            "financial_data",
                            "product_data",
                            "documents",
                            "sensitive_personal_data",
                            "other",
                        ],
                    )
                    .required(),
                    FormField::multiselect(
                        "integrations_needed",
                        &[
                            "accounting",
                            "crm",
                            "erp",
                            "email",
                            "payment",
                            "logistics",
                            "api_external",
                            "other",
                        ],
                    ),
                    FormField::textarea("reporting_needs"),
                ],
            ),
            section(
                "performance",
                vec![
                    FormField::radio("availability_requirements", &["standard", "high", "critical"])
                        .required(),
                    FormField::radio("expected_load", &["low", "medium", "high", "very_high"]),
                    FormField::radio(
                        "scaling_needs",
                        &["stable", "growing", "peaks", "unpredictable"],
                    ),
                ],
            ),
            section(
                "security",
                vec![
                    FormField::multiselect(
                        "compliance_requirements",
                        &["gdpr", "pci_dss", "hipaa", "iso27001", "none", "other"],
                    ),
                    FormField::radio("data_location", &["sweden", "eu", "anywhere", "on_premise"])
                        .required(),
                    FormField::radio(
                        "backup_requirements",
                        &["standard", "frequent", "realtime", "custom"],
                    ),
                ],
            ),
            section(
                "support",
                vec![
                    FormField::radio(
                        "support_level",
                        &["self_service", "business_hours", "extended", "24_7"],
                    ),
                    FormField::multiselect(
                        "training_needs",
                        &["none", "documentation", "video", "onsite", "ongoing"],
                    ),
                    FormField::radio(
                        "maintenance_preference",
                        &["fully_managed", "shared", "self_managed"],
                    ),
                ],
            ),
            section(
                "budget_timeline",
                vec![
                    FormField::radio(
                        "budget_range",
                        &["small", "medium", "large", "enterprise", "unsure"],
                    )
                    .required(),
                    FormField::radio("timeline_flexibility", &["fixed", "flexible", "asap"])
                        .required(),
                    FormField::radio("mvp_approach", &["yes", "no", "unsure"]),
                ],
            ),
        ],
    }
}
