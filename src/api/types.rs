//! Wire records of the questionnaire backend

use crate::schema::FormType;
use crate::state::FieldValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a project record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    Draft,
    PendingApproval,
    Approved,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
    /// Any state this client does not know about
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub state: ProjectState,
}

impl Project {
    /// Answers can only change while the project is a draft
    pub fn is_draft(&self) -> bool {
        self.state == ProjectState::Draft
    }
}

/// Stored answer payload, `{ "value": ... }` on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerValue {
    pub value: FieldValue,
}

impl From<FieldValue> for AnswerValue {
    fn from(value: FieldValue) -> Self {
        Self { value }
    }
}

/// One stored answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    pub form_type: FormType,
    pub section: String,
    pub question_key: String,
    pub answer_value: AnswerValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input of the create call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFormResponse {
    pub project_id: Uuid,
    pub form_type: FormType,
    pub section: String,
    pub question_key: String,
    pub answer_value: AnswerValue,
}
