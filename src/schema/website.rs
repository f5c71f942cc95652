//! Website project questionnaire

use super::{FieldType, FormField, FormSchema, FormSection, FormType, SchemaOrigin};

pub(super) fn schema() -> FormSchema {
    let section = |key: &str, fields| FormSection::new(key, SchemaOrigin::Website, fields);

    FormSchema {
        form_type: FormType::Website,
        sections: vec![
            section(
                "basic_info",
                vec![
                    FormField::text("company_name").required(),
                    FormField::text("contact_person").required(),
                    FormField::new("contact_email", FieldType::Email).required(),
                    FormField::new("contact_phone", FieldType::Phone),
                ],
            ),
            section(
                "current_situation",
                vec![
                    FormField::radio("has_existing_website", &["yes", "no", "unsure"]).required(),
                    FormField::new("existing_website_url", FieldType::Url)
                        .depends_on("has_existing_website", "yes"),
                    FormField::multiselect(
                        "existing_website_issues",
                        &[
                            "outdated_design",
                            "poor_mobile_experience",
                            "slow_loading",
                            "hard_to_update",
                            "poor_seo",
                            "not_converting",
                            "other",
                        ],
                    )
                    .depends_on("has_existing_website", "yes"),
                ],
            ),
            section(
                "goals",
                vec![
                    FormField::radio(
                        "primary_goal",
                        &[
                            "lead_generation",
                            "sales",
                            "information",
                            "recruitment",
                            "branding",
                            "support",
                        ],
                    )
                    .required(),
                    FormField::textarea("target_audience").required(),
                    FormField::textarea("unique_selling_points"),
                    FormField::textarea("competitor_websites"),
                ],
            ),
            section(
                "design",
                vec![
                    FormField::radio(
                        "has_brand_guidelines",
                        &["yes_complete", "yes_partial", "no_but_assets", "no_nothing"],
                    ),
                    FormField::multiselect(
                        "design_preferences",
                        &["minimalist", "modern", "classic", "playful", "luxury"],
                    ),
                    FormField::textarea("inspiration_websites"),
                    FormField::textarea("colors"),
                ],
            ),
            section(
                "content",
                vec![
                    FormField::radio(
                        "content_status",
                        &[
                            "all_ready",
                            "partially_ready",
                            "needs_help",
                            "needs_full_service",
                        ],
                    )
                    .required(),
                    FormField::multiselect(
                        "pages_needed",
                        &[
                            "home",
                            "about",
                            "services",
                            "portfolio",
                            "blog",
                            "contact",
                            "faq",
                            "careers",
                            "other",
                        ],
                    )
                    .required(),
                    FormField::radio("languages", &["swedish", "english", "both", "other"])
                        .required(),
                ],
            ),
            section(
                "functionality",
                vec![
                    FormField::multiselect(
                        "features_needed",
                        &[
                            "contact_form",
                            "newsletter",
                            "booking",
                            "ecommerce",
                            "member_area",
                            "search",
                            "chat",
                            "maps",
                            "video",
                            "social_feed",
                            "other",
                        ],
                    ),
                    FormField::multiselect(
                        "integrations_needed",
                        &["crm", "email_marketing", "analytics", "payment", "erp", "other"],
                    ),
                ],
            ),
            section(
                "technical",
                vec![
                    FormField::radio("hosting_preference", &["you_handle", "we_have", "unsure"]),
                    FormField::radio("domain_status", &["yes_keep", "yes_change", "no"]),
                    FormField::radio(
                        "cms_preference",
                        &["no_preference", "wordpress", "custom", "other"],
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
                    FormField::text("deadline"),
                    FormField::text("launch_date"),
                    FormField::radio("priority", &["quality", "speed", "price"]).required(),
                ],
            ),
        ],
    }
}
