//! Draft and submit persistence for one project's questionnaire

use super::error::ApiResult;
use super::traits::FormResponseApi;
use super::types::{NewFormResponse, Project, ProjectState};
use crate::schema::{get_form_schema, FormType};
use crate::state::{FieldValue, FormValues};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// What a session starts from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedForm {
    pub project: Project,
    /// Form type of the first stored answer, if any
    pub form_type: Option<FormType>,
    pub values: FormValues,
}

impl LoadedForm {
    pub fn is_editable(&self) -> bool {
        self.project.is_draft()
    }
}

#[derive(Debug, Clone)]
struct StoredAnswer {
    id: Uuid,
    value: FieldValue,
}

/// Saves and submits the answers of one project.
///
/// Answers are written one record per question key, sequentially. The store
/// remembers which records exist so repeated saves update rather than
/// duplicate, and skips answers that have not changed since the last write.
pub struct ProjectFormStore {
    api: Arc<dyn FormResponseApi>,
    project_id: Uuid,
    answers: Mutex<HashMap<String, StoredAnswer>>,
    project_state: Mutex<Option<ProjectState>>,
}

impl ProjectFormStore {
    pub fn new(api: Arc<dyn FormResponseApi>, project_id: Uuid) -> Self {
        Self {
            api,
            project_id,
            answers: Mutex::new(HashMap::new()),
            project_state: Mutex::new(None),
        }
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    /// Fetch the project and its stored answers
    pub async fn load(&self) -> ApiResult<LoadedForm> {
        let project = self.api.get_project(self.project_id).await?;
        let responses = self.api.list_form_responses(self.project_id).await?;
        info!(
            "Loaded {} stored answers for project {}",
            responses.len(),
            self.project_id
        );

        let form_type = responses.first().map(|r| r.form_type);
        let mut answers = self.answers.lock().await;
        answers.clear();
        // Duplicates keep the first record's id and the latest value
        for response in responses {
            let value = response.answer_value.value;
            answers
                .entry(response.question_key)
                .and_modify(|stored| stored.value = value.clone())
                .or_insert(StoredAnswer {
                    id: response.id,
                    value,
                });
        }
        let values = answers
            .iter()
            .map(|(key, stored)| (key.clone(), stored.value.clone()))
            .collect();

        *self.project_state.lock().await = Some(project.state);
        Ok(LoadedForm {
            project,
            form_type,
            values,
        })
    }

    /// Persist every non-empty answer; returns how many records were written
    pub async fn save(&self, form_type: FormType, values: &FormValues) -> ApiResult<usize> {
        let schema = get_form_schema(form_type);
        let mut answers = self.answers.lock().await;
        let mut written = 0;

        for (key, value) in values.iter() {
            if value.is_empty() {
                continue;
            }
            match answers.get(key).cloned() {
                Some(stored) if &stored.value == value => continue,
                Some(stored) => {
                    self.api
                        .update_form_response(stored.id, value.clone().into())
                        .await?;
                    answers.insert(
                        key.clone(),
                        StoredAnswer {
                            id: stored.id,
                            value: value.clone(),
                        },
                    );
                }
                None => {
                    let Some(section) = schema.section_for_field(key) else {
                        warn!("Skipping answer for unknown question {}", key);
                        continue;
                    };
                    let created = self
                        .api
                        .create_form_response(NewFormResponse {
                            project_id: self.project_id,
                            form_type,
                            section: section.key.clone(),
                            question_key: key.clone(),
                            answer_value: value.clone().into(),
                        })
                        .await?;
                    answers.insert(
                        key.clone(),
                        StoredAnswer {
                            id: created.id,
                            value: value.clone(),
                        },
                    );
                }
            }
            written += 1;
        }

        info!("Saved {} answers for project {}", written, self.project_id);
        Ok(written)
    }

    /// Delete stored records whose question has no answer in `values`
    async fn purge_unanswered(&self, values: &FormValues) -> ApiResult<usize> {
        let mut answers = self.answers.lock().await;
        let stale: Vec<(String, Uuid)> = answers
            .iter()
            .filter(|(key, _)| values.get(key).map_or(true, FieldValue::is_empty))
            .map(|(key, stored)| (key.clone(), stored.id))
            .collect();

        for (key, id) in &stale {
            self.api.delete_form_response(*id).await?;
            answers.remove(key);
        }
        if !stale.is_empty() {
            info!(
                "Deleted {} unanswered records for project {}",
                stale.len(),
                self.project_id
            );
        }
        Ok(stale.len())
    }

    /// Save the answers, drop stored records the submission no longer
    /// carries, then move the project out of draft if it still is one
    pub async fn submit(&self, form_type: FormType, values: &FormValues) -> ApiResult<()> {
        self.save(form_type, values).await?;
        self.purge_unanswered(values).await?;

        let known = *self.project_state.lock().await;
        let state = match known {
            Some(state) => state,
            None => self.api.get_project(self.project_id).await?.state,
        };

        if state == ProjectState::Draft {
            let project = self.api.submit_project(self.project_id).await?;
            *self.project_state.lock().await = Some(project.state);
            info!("Submitted project {}", self.project_id);
        } else {
            info!(
                "Project {} is {:?}, answers saved without state change",
                self.project_id, state
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{AnswerValue, FormResponse};
    use crate::api::{ApiError, MockFormResponseApi};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn project(id: Uuid, state: ProjectState) -> Project {
        Project {
            id,
            name: "Acme website".to_string(),
            state,
        }
    }

    fn stored(key: &str, section: &str, value: FieldValue) -> FormResponse {
        FormResponse {
            id: Uuid::new_v4(),
            project_id: None,
            form_type: FormType::Website,
            section: section.to_string(),
            question_key: key.to_string(),
            answer_value: AnswerValue { value },
            answer_metadata: None,
            inserted_at: None,
            updated_at: None,
        }
    }

    fn created_from(input: NewFormResponse) -> FormResponse {
        FormResponse {
            id: Uuid::new_v4(),
            project_id: Some(input.project_id),
            form_type: input.form_type,
            section: input.section,
            question_key: input.question_key,
            answer_value: input.answer_value,
            answer_metadata: None,
            inserted_at: None,
            updated_at: None,
        }
    }

    fn store(mock: MockFormResponseApi, project_id: Uuid) -> ProjectFormStore {
        ProjectFormStore::new(Arc::new(mock), project_id)
    }

    #[tokio::test]
    async fn test_load_restores_type_and_values() {
        let project_id = Uuid::new_v4();
        let mut mock = MockFormResponseApi::new();
        mock.expect_get_project()
            .with(eq(project_id))
            .returning(|id| Ok(project(id, ProjectState::Draft)));
        mock.expect_list_form_responses().returning(|_| {
            Ok(vec![
                stored("company_name", "basic_info", "Acme".into()),
                stored(
                    "pages_needed",
                    "content",
                    FieldValue::List(vec!["home".to_string()]),
                ),
            ])
        });

        let store = store(mock, project_id);
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.form_type, Some(FormType::Website));
        assert_eq!(loaded.values.text("company_name"), Some("Acme"));
        assert_eq!(loaded.values.list("pages_needed"), &["home"]);
        assert!(loaded.is_editable());
    }

    #[test]
    fn test_save_without_answers_makes_no_calls() {
        let store = store(MockFormResponseApi::new(), Uuid::new_v4());
        let written = tokio_test::block_on(store.save(FormType::System, &FormValues::new()));
        assert_eq!(written.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_load_without_answers_has_no_form_type() {
        let mut mock = MockFormResponseApi::new();
        mock.expect_get_project()
            .returning(|id| Ok(project(id, ProjectState::PendingApproval)));
        mock.expect_list_form_responses().returning(|_| Ok(vec![]));

        let store = store(mock, Uuid::new_v4());
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.form_type, None);
        assert!(loaded.values.is_empty());
        assert!(!loaded.is_editable());
    }

    #[tokio::test]
    async fn test_save_creates_under_schema_section() {
        let project_id = Uuid::new_v4();
        let mut mock = MockFormResponseApi::new();
        mock.expect_create_form_response()
            .withf(move |input| {
                input.project_id == project_id
                    && input.question_key == "target_audience"
                    && input.section == "goals"
                    && input.form_type == FormType::Website
            })
            .times(1)
            .returning(|input| Ok(created_from(input)));

        let mut values = FormValues::new();
        values.set("target_audience", "Small businesses");
        values.set("contact_phone", "");
        values.set("pages_needed", FieldValue::List(vec![]));

        let written = store(mock, project_id)
            .save(FormType::Website, &values)
            .await
            .unwrap();
        assert_eq!(written, 1);
    }

    #[tokio::test]
    async fn test_second_save_updates_changed_answers_only() {
        let mut mock = MockFormResponseApi::new();
        mock.expect_create_form_response()
            .times(2)
            .returning(|input| Ok(created_from(input)));
        mock.expect_update_form_response()
            .withf(|_, answer| answer.value == FieldValue::from("Acme Group"))
            .times(1)
            .returning(|id, answer| {
                let mut response = stored("company_name", "basic_info", answer.value);
                response.id = id;
                Ok(response)
            });

        let store = store(mock, Uuid::new_v4());
        let mut values = FormValues::new();
        values.set("company_name", "Acme");
        values.set("contact_person", "Kim");
        assert_eq!(store.save(FormType::Website, &values).await.unwrap(), 2);

        assert_eq!(store.save(FormType::Website, &values).await.unwrap(), 0);

        values.set("company_name", "Acme Group");
        assert_eq!(store.save(FormType::Website, &values).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_updates_loaded_records() {
        let project_id = Uuid::new_v4();
        let existing = stored("company_name", "basic_info", "Acme".into());
        let existing_id = existing.id;

        let mut mock = MockFormResponseApi::new();
        mock.expect_get_project()
            .returning(|id| Ok(project(id, ProjectState::Draft)));
        mock.expect_list_form_responses()
            .returning(move |_| Ok(vec![existing.clone()]));
        mock.expect_update_form_response()
            .with(eq(existing_id), eq(AnswerValue::from(FieldValue::from("Beta"))))
            .times(1)
            .returning(|id, answer| {
                let mut response = stored("company_name", "basic_info", answer.value);
                response.id = id;
                Ok(response)
            });
        mock.expect_create_form_response().never();

        let store = store(mock, project_id);
        let mut values = store.load().await.unwrap().values;
        values.set("company_name", "Beta");
        assert_eq!(store.save(FormType::Website, &values).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_skips_unknown_questions() {
        let mut mock = MockFormResponseApi::new();
        mock.expect_create_form_response().never();

        let mut values = FormValues::new();
        values.set("favourite_colour", "teal");
        let written = store(mock, Uuid::new_v4())
            .save(FormType::System, &values)
            .await
            .unwrap();
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_submit_transitions_draft_project() {
        let project_id = Uuid::new_v4();
        let mut mock = MockFormResponseApi::new();
        mock.expect_get_project()
            .times(1)
            .returning(|id| Ok(project(id, ProjectState::Draft)));
        mock.expect_create_form_response()
            .returning(|input| Ok(created_from(input)));
        mock.expect_submit_project()
            .with(eq(project_id))
            .times(1)
            .returning(|id| Ok(project(id, ProjectState::PendingApproval)));

        let store = store(mock, project_id);
        let mut values = FormValues::new();
        values.set("company_name", "Acme");
        store.submit(FormType::Website, &values).await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_deletes_answers_left_out() {
        let project_id = Uuid::new_v4();
        let has_site = stored("has_existing_website", "current_state", "yes".into());
        let old_url = stored("existing_website_url", "current_state", "http://old.com".into());
        let company = stored("company_name", "basic_info", "Acme".into());
        let has_site_id = has_site.id;
        let old_url_id = old_url.id;
        let records = vec![has_site, old_url, company];

        let mut mock = MockFormResponseApi::new();
        mock.expect_get_project()
            .returning(|id| Ok(project(id, ProjectState::Draft)));
        mock.expect_list_form_responses()
            .returning(move |_| Ok(records.clone()));
        mock.expect_update_form_response()
            .with(eq(has_site_id), eq(AnswerValue::from(FieldValue::from("no"))))
            .times(1)
            .returning(|id, answer| {
                let mut response = stored("has_existing_website", "current_state", answer.value);
                response.id = id;
                Ok(response)
            });
        mock.expect_delete_form_response()
            .with(eq(old_url_id))
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_submit_project()
            .with(eq(project_id))
            .times(1)
            .returning(|id| Ok(project(id, ProjectState::PendingApproval)));

        let store = store(mock, project_id);
        store.load().await.unwrap();

        let mut values = FormValues::new();
        values.set("company_name", "Acme");
        values.set("has_existing_website", "no");
        store.submit(FormType::Website, &values).await.unwrap();

        let answers = store.answers.lock().await;
        assert!(!answers.contains_key("existing_website_url"));
        assert_eq!(answers.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_aborts_submit() {
        let old_url = stored("existing_website_url", "current_state", "http://old.com".into());
        let mut mock = MockFormResponseApi::new();
        mock.expect_get_project()
            .returning(|id| Ok(project(id, ProjectState::Draft)));
        mock.expect_list_form_responses()
            .returning(move |_| Ok(vec![old_url.clone()]));
        mock.expect_delete_form_response().returning(|_| {
            Err(ApiError::Rejected {
                action: "form_response_destroy".to_string(),
                message: "Failed to delete form response".to_string(),
            })
        });
        mock.expect_submit_project().never();

        let store = store(mock, Uuid::new_v4());
        store.load().await.unwrap();
        let err = store
            .submit(FormType::Website, &FormValues::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete form response");
    }

    #[tokio::test]
    async fn test_load_duplicates_keep_first_id_and_last_value() {
        let first = stored("company_name", "basic_info", "Acme".into());
        let first_id = first.id;
        let second = stored("company_name", "basic_info", "Acme Group".into());
        let records = vec![first, second];

        let mut mock = MockFormResponseApi::new();
        mock.expect_get_project()
            .returning(|id| Ok(project(id, ProjectState::Draft)));
        mock.expect_list_form_responses()
            .returning(move |_| Ok(records.clone()));
        mock.expect_update_form_response()
            .with(eq(first_id), eq(AnswerValue::from(FieldValue::from("Beta"))))
            .times(1)
            .returning(|id, answer| {
                let mut response = stored("company_name", "basic_info", answer.value);
                response.id = id;
                Ok(response)
            });

        let store = store(mock, Uuid::new_v4());
        let mut values = store.load().await.unwrap().values;
        assert_eq!(values.text("company_name"), Some("Acme Group"));

        assert_eq!(store.save(FormType::Website, &values).await.unwrap(), 0);
        values.set("company_name", "Beta");
        assert_eq!(store.save(FormType::Website, &values).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_submit_leaves_non_draft_project_alone() {
        let mut mock = MockFormResponseApi::new();
        mock.expect_get_project()
            .returning(|id| Ok(project(id, ProjectState::PendingApproval)));
        mock.expect_list_form_responses().returning(|_| Ok(vec![]));
        mock.expect_submit_project().never();

        let store = store(mock, Uuid::new_v4());
        store.load().await.unwrap();
        store
            .submit(FormType::Website, &FormValues::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_save_aborts_submit() {
        let mut mock = MockFormResponseApi::new();
        mock.expect_create_form_response().returning(|_| {
            Err(ApiError::Rejected {
                action: "form_response_create".to_string(),
                message: "invalid answer".to_string(),
            })
        });
        mock.expect_submit_project().never();

        let mut values = FormValues::new();
        values.set("company_name", "Acme");
        let err = store(mock, Uuid::new_v4())
            .submit(FormType::Website, &values)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid answer");
    }
}
