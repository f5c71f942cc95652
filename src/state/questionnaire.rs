//! Questionnaire session state and its transition function
//!
//! The whole session lives in one [`Questionnaire`] record. Every user intent
//! and every collaborator outcome is an [`Action`]; [`reduce`] consumes the
//! current record and returns the next one together with the side effects the
//! host has to run. Nothing here touches the terminal or the network.

use super::validation::{validate_section, FieldErrors, ValidationError};
use super::values::{FieldValue, FormValues};
use super::visibility::visible_values;
use crate::schema::{get_form_schema, FormSchema, FormSection, FormType};

/// The four mutually exclusive screens of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TypeSelection,
    Editing(usize),
    Review,
    Confirmation,
}

/// State of one questionnaire session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    /// Project the answers belong to (display only)
    pub project_id: String,
    /// `None` until the customer picks a questionnaire
    pub form_type: Option<FormType>,
    pub current_section_index: usize,
    pub show_review: bool,
    pub is_submitted: bool,
    pub values: FormValues,
    pub errors: FieldErrors,
    pub is_saving: bool,
    /// A save was requested while another one was in flight
    pub save_queued: bool,
    pub is_submitting: bool,
    /// Message of the last failed submit, cleared on the next attempt
    pub submit_error: Option<String>,
}

/// Something the user did, or the outcome of a collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectFormType(FormType),
    SetValue { field: String, value: FieldValue },
    ToggleOption { field: String, option: String },
    Next,
    Previous,
    /// Jump back to an already visited section from the tab strip
    SelectTab(usize),
    /// Edit a section from the review screen
    EditSection(usize),
    Save,
    SaveFinished(Result<(), String>),
    Submit,
    SubmitFinished(Result<(), String>),
    Cancel,
    BackToDashboard,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Save {
        form_type: FormType,
        values: FormValues,
    },
    Submit {
        form_type: FormType,
        values: FormValues,
    },
    /// Fire the completion callback once the confirmation has been seen
    ScheduleCompletion,
    Exit,
}

/// Result of applying an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: Questionnaire,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: Questionnaire) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: Questionnaire, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }
}

impl Questionnaire {
    /// Start a session, skipping type selection when the form type is known
    pub fn new(
        project_id: impl Into<String>,
        initial_form_type: Option<FormType>,
        initial_values: FormValues,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            form_type: initial_form_type,
            current_section_index: 0,
            show_review: false,
            is_submitted: false,
            values: initial_values,
            errors: FieldErrors::new(),
            is_saving: false,
            save_queued: false,
            is_submitting: false,
            submit_error: None,
        }
    }

    pub fn screen(&self) -> Screen {
        if self.is_submitted {
            Screen::Confirmation
        } else if self.form_type.is_none() {
            Screen::TypeSelection
        } else if self.show_review {
            Screen::Review
        } else {
            Screen::Editing(self.current_section_index)
        }
    }

    pub fn schema(&self) -> Option<&'static FormSchema> {
        self.form_type.map(get_form_schema)
    }

    pub fn total_sections(&self) -> usize {
        self.schema().map_or(0, FormSchema::total_sections)
    }

    pub fn current_section(&self) -> Option<&'static FormSection> {
        self.schema()?.section(self.current_section_index)
    }

    pub fn is_last_section(&self) -> bool {
        self.current_section_index + 1 >= self.total_sections()
    }

    /// Completion of the current step, rounded to whole percent
    pub fn progress_percent(&self) -> u16 {
        let total = self.total_sections();
        if total == 0 {
            return 0;
        }
        (((self.current_section_index + 1) as f64 / total as f64) * 100.0).round() as u16
    }

    pub fn error_for(&self, field_key: &str) -> Option<&ValidationError> {
        self.errors.get(field_key)
    }

    /// Submit is offered only on review with no request in flight
    pub fn can_submit(&self) -> bool {
        self.screen() == Screen::Review && !self.is_submitting && !self.is_saving
    }

    /// First section that fails validation, with its errors
    fn first_invalid_section(&self) -> Option<(usize, FieldErrors)> {
        let schema = self.schema()?;
        schema
            .sections
            .iter()
            .enumerate()
            .map(|(index, section)| (index, validate_section(section, &self.values)))
            .find(|(_, result)| !result.ok())
            .map(|(index, result)| (index, result.errors))
    }
}

/// Apply an action to the session
pub fn reduce(mut state: Questionnaire, action: Action) -> Transition {
    let screen = state.screen();

    match action {
        Action::SelectFormType(form_type) => {
            if screen != Screen::TypeSelection {
                return Transition::unchanged(state);
            }
            state.form_type = Some(form_type);
            state.current_section_index = 0;
            state.show_review = false;
            Transition::unchanged(state)
        }

        Action::SetValue { field, value } => {
            if !matches!(screen, Screen::Editing(_)) {
                return Transition::unchanged(state);
            }
            state.errors.remove(&field);
            state.values.set(&field, value);
            Transition::unchanged(state)
        }

        Action::ToggleOption { field, option } => {
            if !matches!(screen, Screen::Editing(_)) {
                return Transition::unchanged(state);
            }
            state.errors.remove(&field);
            state.values.toggle_option(&field, &option);
            Transition::unchanged(state)
        }

        Action::Next => {
            let Screen::Editing(index) = screen else {
                return Transition::unchanged(state);
            };
            let Some(section) = state.current_section() else {
                return Transition::unchanged(state);
            };
            let result = validate_section(section, &state.values);
            if !result.ok() {
                state.errors = result.errors;
                return Transition::unchanged(state);
            }
            state.errors.clear();
            if index + 1 < state.total_sections() {
                state.current_section_index = index + 1;
            } else {
                state.show_review = true;
            }
            Transition::unchanged(state)
        }

        Action::Previous => {
            match screen {
                Screen::Review => {
                    state.show_review = false;
                    state.current_section_index = state.total_sections().saturating_sub(1);
                }
                Screen::Editing(index) if index > 0 => {
                    state.current_section_index = index - 1;
                }
                _ => {}
            }
            Transition::unchanged(state)
        }

        Action::SelectTab(target) => {
            if let Screen::Editing(index) = screen {
                if target < index {
                    state.current_section_index = target;
                }
            }
            Transition::unchanged(state)
        }

        Action::EditSection(target) => {
            if screen == Screen::Review && target < state.total_sections() {
                state.show_review = false;
                state.current_section_index = target;
            }
            Transition::unchanged(state)
        }

        Action::Save => {
            let Some(form_type) = state.form_type else {
                return Transition::unchanged(state);
            };
            if !matches!(screen, Screen::Editing(_) | Screen::Review) {
                return Transition::unchanged(state);
            }
            if state.is_saving {
                state.save_queued = true;
                return Transition::unchanged(state);
            }
            state.is_saving = true;
            let values = state.values.clone();
            Transition::with(state, Effect::Save { form_type, values })
        }

        Action::SaveFinished(_) => {
            state.is_saving = false;
            match state.form_type {
                Some(form_type) if state.save_queued && !state.is_submitted => {
                    state.save_queued = false;
                    state.is_saving = true;
                    let values = state.values.clone();
                    Transition::with(state, Effect::Save { form_type, values })
                }
                _ => {
                    state.save_queued = false;
                    Transition::unchanged(state)
                }
            }
        }

        Action::Submit => {
            let Some(form_type) = state.form_type else {
                return Transition::unchanged(state);
            };
            if !state.can_submit() {
                return Transition::unchanged(state);
            }
            if let Some((index, errors)) = state.first_invalid_section() {
                state.show_review = false;
                state.current_section_index = index;
                state.errors = errors;
                return Transition::unchanged(state);
            }
            let Some(schema) = state.schema() else {
                return Transition::unchanged(state);
            };
            state.is_submitting = true;
            state.submit_error = None;
            let values = visible_values(schema, &state.values);
            Transition::with(state, Effect::Submit { form_type, values })
        }

        Action::SubmitFinished(result) => {
            state.is_submitting = false;
            match result {
                Ok(()) => {
                    state.is_submitted = true;
                    state.show_review = false;
                    Transition::with(state, Effect::ScheduleCompletion)
                }
                Err(message) => {
                    state.submit_error = Some(message);
                    Transition::unchanged(state)
                }
            }
        }

        Action::Cancel => Transition::with(state, Effect::Exit),

        Action::BackToDashboard => {
            if screen == Screen::Confirmation {
                Transition::with(state, Effect::Exit)
            } else {
                Transition::unchanged(state)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn start(form_type: Option<FormType>) -> Questionnaire {
        Questionnaire::new("project-1", form_type, FormValues::new())
    }

    fn apply(state: Questionnaire, action: Action) -> Questionnaire {
        reduce(state, action).state
    }

    fn set(state: Questionnaire, field: &str, value: &str) -> Questionnaire {
        apply(
            state,
            Action::SetValue {
                field: field.to_string(),
                value: value.into(),
            },
        )
    }

    fn pick(state: Questionnaire, field: &str, option: &str) -> Questionnaire {
        apply(
            state,
            Action::ToggleOption {
                field: field.to_string(),
                option: option.to_string(),
            },
        )
    }

    /// Answers that satisfy every section of the website questionnaire
    fn complete_website_values() -> FormValues {
        let mut values = FormValues::new();
        values.set("company_name", "Acme");
        values.set("contact_person", "Kim");
        values.set("contact_email", "kim@acme.se");
        values.set("has_existing_website", "no");
        values.set("primary_goal", "sales");
        values.set("target_audience", "Small businesses");
        values.set("content_status", "all_ready");
        values.set("pages_needed", vec!["home".to_string()]);
        values.set("languages", "english");
        values.set("budget_range", "medium");
        values.set("priority", "quality");
        values
    }

    fn at_review() -> Questionnaire {
        let mut state = Questionnaire::new(
            "project-1",
            Some(FormType::Website),
            complete_website_values(),
        );
        for _ in 0..8 {
            state = apply(state, Action::Next);
        }
        assert_eq!(state.screen(), Screen::Review);
        state
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_starts_at_type_selection_without_initial_type() {
            let state = start(None);
            assert_eq!(state.screen(), Screen::TypeSelection);
            assert_eq!(state.total_sections(), 0);
        }

        #[test]
        fn test_starts_editing_with_initial_type() {
            let state = start(Some(FormType::System));
            assert_eq!(state.screen(), Screen::Editing(0));
            assert_eq!(state.current_section().unwrap().key, "overview");
        }

        #[test]
        fn test_selecting_website_opens_first_of_eight_sections() {
            let state = apply(start(None), Action::SelectFormType(FormType::Website));
            assert_eq!(state.screen(), Screen::Editing(0));
            assert_eq!(state.total_sections(), 8);
            assert_eq!(state.current_section().unwrap().key, "basic_info");
        }

        #[test]
        fn test_form_type_cannot_change_once_chosen() {
            let state = apply(start(None), Action::SelectFormType(FormType::Website));
            let state = apply(state, Action::SelectFormType(FormType::System));
            assert_eq!(state.form_type, Some(FormType::Website));
        }

        #[test]
        fn test_next_blocked_by_empty_required_field() {
            let state = start(Some(FormType::Website));
            let state = set(state, "contact_person", "Kim");
            let state = set(state, "contact_email", "kim@acme.se");
            let state = apply(state, Action::Next);

            assert_eq!(state.current_section_index, 0);
            assert_eq!(state.errors.len(), 1);
            assert_eq!(state.error_for("company_name"), Some(&ValidationError::Required));
        }

        #[test]
        fn test_editing_clears_only_that_fields_error() {
            let state = apply(start(Some(FormType::Website)), Action::Next);
            assert_eq!(state.errors.len(), 3);

            let state = set(state, "company_name", "A");
            assert!(state.error_for("company_name").is_none());
            assert!(state.error_for("contact_person").is_some());
        }

        #[test]
        fn test_hidden_filled_field_does_not_block_next() {
            let mut state = start(Some(FormType::Website));
            state.current_section_index = 1;
            let state = set(state, "has_existing_website", "yes");
            let state = set(state, "existing_website_url", "http://old.com");
            let state = set(state, "has_existing_website", "no");
            let state = apply(state, Action::Next);

            assert_eq!(state.screen(), Screen::Editing(2));
            assert!(state.errors.is_empty());
            assert_eq!(state.values.text("existing_website_url"), Some("http://old.com"));
        }

        #[test]
        fn test_dependency_toggle_flips_validation() {
            let mut state = start(Some(FormType::Website));
            state.current_section_index = 1;
            let state = set(state, "has_existing_website", "yes");
            let state = set(state, "existing_website_url", "old site");
            let state = apply(state, Action::Next);
            assert_eq!(
                state.error_for("existing_website_url"),
                Some(&ValidationError::InvalidUrl)
            );

            let state = set(state, "has_existing_website", "unsure");
            let state = apply(state, Action::Next);
            assert_eq!(state.screen(), Screen::Editing(2));
        }

        #[test]
        fn test_last_section_next_goes_to_review() {
            let mut state = Questionnaire::new(
                "project-1",
                Some(FormType::Website),
                complete_website_values(),
            );
            state.current_section_index = 7;
            assert_eq!(state.current_section().unwrap().key, "budget_timeline");

            let state = apply(state, Action::Next);
            assert_eq!(state.screen(), Screen::Review);
            assert_eq!(state.current_section_index, 7);
        }

        #[test]
        fn test_previous_is_noop_on_first_section() {
            let state = apply(start(Some(FormType::Website)), Action::Previous);
            assert_eq!(state.screen(), Screen::Editing(0));
        }

        #[test]
        fn test_previous_skips_validation() {
            let mut state = start(Some(FormType::Website));
            state.current_section_index = 3;
            let state = apply(state, Action::Previous);
            assert_eq!(state.screen(), Screen::Editing(2));
            assert!(state.errors.is_empty());
        }

        #[test]
        fn test_previous_from_review_returns_to_last_section() {
            let state = apply(at_review(), Action::EditSection(2));
            let state = apply(state, Action::Next);
            let state = apply(state, Action::Next);
            let state = apply(state, Action::Next);
            let state = apply(state, Action::Next);
            let state = apply(state, Action::Next);
            let state = apply(state, Action::Next);
            assert_eq!(state.screen(), Screen::Review);

            let state = apply(state, Action::Previous);
            assert_eq!(state.screen(), Screen::Editing(7));
        }

        #[test]
        fn test_edit_section_from_review_jumps_directly() {
            let state = apply(at_review(), Action::EditSection(3));
            assert_eq!(state.screen(), Screen::Editing(3));
        }

        #[test]
        fn test_edit_section_out_of_range_is_ignored() {
            let state = apply(at_review(), Action::EditSection(8));
            assert_eq!(state.screen(), Screen::Review);
        }

        #[test]
        fn test_tabs_only_go_backwards() {
            let mut state = start(Some(FormType::Website));
            state.current_section_index = 4;
            let state = apply(state, Action::SelectTab(6));
            assert_eq!(state.screen(), Screen::Editing(4));
            let state = apply(state, Action::SelectTab(1));
            assert_eq!(state.screen(), Screen::Editing(1));
        }

        #[test]
        fn test_values_only_change_while_editing() {
            let state = set(at_review(), "company_name", "Other");
            assert_eq!(state.values.text("company_name"), Some("Acme"));
        }

        #[test]
        fn test_progress_percent() {
            let mut state = start(Some(FormType::Website));
            assert_eq!(state.progress_percent(), 13);
            state.current_section_index = 7;
            assert_eq!(state.progress_percent(), 100);
            assert_eq!(start(None).progress_percent(), 0);
        }

        #[test]
        fn test_both_walks_all_seventeen_sections() {
            let state = start(Some(FormType::Both));
            assert_eq!(state.total_sections(), 17);
            let mut state = state;
            state.current_section_index = 8;
            assert_eq!(state.current_section().unwrap().key, "overview");
        }

        #[test]
        fn test_cancel_exits_from_any_screen() {
            let transition = reduce(start(None), Action::Cancel);
            assert_eq!(transition.effects, vec![Effect::Exit]);
            let transition = reduce(start(Some(FormType::System)), Action::Cancel);
            assert_eq!(transition.effects, vec![Effect::Exit]);
        }
    }

    mod multiselect {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_toggle_preserves_pick_order() {
            let mut state = start(Some(FormType::Website));
            state.current_section_index = 4;
            let state = pick(state, "pages_needed", "faq");
            let state = pick(state, "pages_needed", "home");
            let state = pick(state, "pages_needed", "blog");
            let state = pick(state, "pages_needed", "home");
            assert_eq!(state.values.list("pages_needed"), &["faq", "blog"]);
        }

        #[test]
        fn test_unchecking_last_option_fails_required() {
            let mut state = start(Some(FormType::Website));
            state.current_section_index = 4;
            let state = set(state, "content_status", "all_ready");
            let state = set(state, "languages", "swedish");
            let state = pick(state, "pages_needed", "home");
            let state = pick(state, "pages_needed", "home");
            let state = apply(state, Action::Next);
            assert_eq!(state.error_for("pages_needed"), Some(&ValidationError::Required));
        }
    }

    mod saving {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_save_emits_effect_without_validation() {
            let state = set(start(Some(FormType::Website)), "contact_email", "not-an-email");
            let transition = reduce(state, Action::Save);

            assert!(transition.state.is_saving);
            assert!(transition.state.errors.is_empty());
            assert_eq!(transition.state.screen(), Screen::Editing(0));
            match &transition.effects[..] {
                [Effect::Save { form_type, values }] => {
                    assert_eq!(*form_type, FormType::Website);
                    assert_eq!(values.text("contact_email"), Some("not-an-email"));
                }
                other => panic!("unexpected effects: {other:?}"),
            }
        }

        #[test]
        fn test_save_ignored_before_type_selection() {
            let transition = reduce(start(None), Action::Save);
            assert!(transition.effects.is_empty());
            assert!(!transition.state.is_saving);
        }

        #[test]
        fn test_save_while_saving_is_coalesced() {
            let state = reduce(start(Some(FormType::Website)), Action::Save).state;
            let transition = reduce(state, Action::Save);
            assert!(transition.effects.is_empty());
            let transition = reduce(transition.state, Action::Save);
            assert!(transition.effects.is_empty());
            assert!(transition.state.save_queued);

            let state = set(transition.state, "company_name", "Later");
            let transition = reduce(state, Action::SaveFinished(Ok(())));
            assert!(transition.state.is_saving);
            assert!(!transition.state.save_queued);
            match &transition.effects[..] {
                [Effect::Save { values, .. }] => {
                    assert_eq!(values.text("company_name"), Some("Later"));
                }
                other => panic!("unexpected effects: {other:?}"),
            }

            let transition = reduce(transition.state, Action::SaveFinished(Ok(())));
            assert!(!transition.state.is_saving);
            assert!(transition.effects.is_empty());
        }

        #[test]
        fn test_failed_save_keeps_navigation() {
            let state = reduce(start(Some(FormType::Website)), Action::Save).state;
            let state = apply(state, Action::SaveFinished(Err("offline".to_string())));
            assert!(!state.is_saving);
            assert_eq!(state.screen(), Screen::Editing(0));
        }

        #[test]
        fn test_save_available_from_review() {
            let transition = reduce(at_review(), Action::Save);
            assert_eq!(transition.effects.len(), 1);
            assert_eq!(transition.state.screen(), Screen::Review);
        }
    }

    mod submitting {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_submit_sends_visible_values() {
            let mut state = at_review();
            state.values.set("existing_website_url", "http://old.com");
            let transition = reduce(state, Action::Submit);

            assert!(transition.state.is_submitting);
            match &transition.effects[..] {
                [Effect::Submit { form_type, values }] => {
                    assert_eq!(*form_type, FormType::Website);
                    assert_eq!(values.text("company_name"), Some("Acme"));
                    assert!(values.get("existing_website_url").is_none());
                }
                other => panic!("unexpected effects: {other:?}"),
            }
        }

        #[test]
        fn test_submit_success_confirms_and_schedules_completion() {
            let state = reduce(at_review(), Action::Submit).state;
            let transition = reduce(state, Action::SubmitFinished(Ok(())));

            assert!(transition.state.is_submitted);
            assert_eq!(transition.state.screen(), Screen::Confirmation);
            assert_eq!(transition.effects, vec![Effect::ScheduleCompletion]);
        }

        #[test]
        fn test_submit_failure_stays_on_review() {
            let state = reduce(at_review(), Action::Submit).state;
            let state = apply(state, Action::SubmitFinished(Err("server said no".to_string())));

            assert!(!state.is_submitted);
            assert!(!state.is_submitting);
            assert_eq!(state.screen(), Screen::Review);
            assert_eq!(state.submit_error.as_deref(), Some("server said no"));

            let transition = reduce(state, Action::Submit);
            assert_eq!(transition.effects.len(), 1);
            assert_eq!(transition.state.submit_error, None);
        }

        #[test]
        fn test_submit_refused_while_in_flight() {
            let state = reduce(at_review(), Action::Submit).state;
            let transition = reduce(state, Action::Submit);
            assert!(transition.effects.is_empty());

            let state = reduce(at_review(), Action::Save).state;
            let transition = reduce(state, Action::Submit);
            assert!(transition.effects.is_empty());
            assert!(!transition.state.is_submitting);
        }

        #[test]
        fn test_submit_only_from_review() {
            let transition = reduce(start(Some(FormType::Website)), Action::Submit);
            assert!(transition.effects.is_empty());
        }

        #[test]
        fn test_submit_revalidates_every_section() {
            let mut state = at_review();
            state.values.set("target_audience", "");
            let transition = reduce(state, Action::Submit);

            assert!(transition.effects.is_empty());
            assert_eq!(transition.state.screen(), Screen::Editing(2));
            assert_eq!(
                transition.state.error_for("target_audience"),
                Some(&ValidationError::Required)
            );
        }

        #[test]
        fn test_back_to_dashboard_only_after_confirmation() {
            let transition = reduce(at_review(), Action::BackToDashboard);
            assert!(transition.effects.is_empty());

            let state = reduce(at_review(), Action::Submit).state;
            let state = apply(state, Action::SubmitFinished(Ok(())));
            let transition = reduce(state, Action::BackToDashboard);
            assert_eq!(transition.effects, vec![Effect::Exit]);
        }

        #[test]
        fn test_confirmation_ignores_further_saves() {
            let state = reduce(at_review(), Action::Submit).state;
            let state = apply(state, Action::SubmitFinished(Ok(())));
            let transition = reduce(state, Action::Save);
            assert!(transition.effects.is_empty());
        }
    }

    mod initial_values {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_initial_values_are_kept_verbatim() {
            let values = complete_website_values();
            let state = Questionnaire::new("project-1", Some(FormType::Website), values.clone());
            assert_eq!(state.values, values);
        }
    }
}
