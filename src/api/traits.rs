//! Trait abstraction over the backend to enable mocking in tests

use super::error::ApiResult;
use super::types::{AnswerValue, FormResponse, NewFormResponse, Project};
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormResponseApi: Send + Sync {
    /// Fetch a project record
    async fn get_project(&self, project_id: Uuid) -> ApiResult<Project>;

    /// All stored answers of a project, oldest first
    async fn list_form_responses(&self, project_id: Uuid) -> ApiResult<Vec<FormResponse>>;

    /// Store a new answer
    async fn create_form_response(&self, input: NewFormResponse) -> ApiResult<FormResponse>;

    /// Replace the value of a stored answer
    async fn update_form_response(
        &self,
        id: Uuid,
        answer_value: AnswerValue,
    ) -> ApiResult<FormResponse>;

    /// Remove a stored answer
    async fn delete_form_response(&self, id: Uuid) -> ApiResult<()>;

    /// Move a draft project to pending approval
    async fn submit_project(&self, project_id: Uuid) -> ApiResult<Project>;
}
