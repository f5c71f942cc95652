//! HTTP client for the questionnaire backend
//!
//! Every call is a `POST <base>/rpc/run` carrying the action name, its input
//! and the fields to return. Replies always have the shape
//! `{ "success": bool, "data": ..., "errors": [{ "message": ... }] }`.

use super::error::{ApiError, ApiResult};
use super::traits::FormResponseApi;
use super::types::{AnswerValue, FormResponse, NewFormResponse, Project};
use crate::config::TuiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const PROJECT_FIELDS: &[&str] = &["id", "name", "state"];
const RESPONSE_FIELDS: &[&str] = &[
    "id",
    "formType",
    "section",
    "questionKey",
    "answerValue",
    "answerMetadata",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RpcRequest<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_key: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
    fields: &'a [&'a str],
}

impl<'a> RpcRequest<'a> {
    fn new(action: &'a str, fields: &'a [&'a str]) -> Self {
        Self {
            action,
            input: None,
            primary_key: None,
            filter: None,
            fields,
        }
    }

    fn input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    fn primary_key(mut self, id: Uuid) -> Self {
        self.primary_key = Some(id);
        self
    }

    fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }
}

#[derive(Debug, Deserialize)]
struct RpcReply<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    errors: Vec<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Check an RPC reply for success, keeping whatever data it carried
fn check_reply<T>(action: &str, reply: RpcReply<T>) -> ApiResult<Option<T>> {
    if !reply.success {
        let message = reply
            .errors
            .into_iter()
            .find_map(|e| e.message)
            .unwrap_or_else(|| format!("Failed to run {action}"));
        return Err(ApiError::Rejected {
            action: action.to_string(),
            message,
        });
    }
    Ok(reply.data)
}

/// Turn an RPC reply into its data or an error carrying the first message
fn into_result<T>(action: &str, reply: RpcReply<T>) -> ApiResult<T> {
    check_reply(action, reply)?.ok_or_else(|| ApiError::EmptyResponse(action.to_string()))
}

/// Client for the questionnaire backend
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &TuiConfig) -> ApiResult<Self> {
        Self::new(
            &config.api_address(),
            config.api_token(),
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn run<T: DeserializeOwned>(&self, request: RpcRequest<'_>) -> ApiResult<T> {
        let action = request.action;
        let reply = self.send(request).await?;
        into_result(action, reply)
    }

    /// Run an action whose reply carries no data worth reading
    async fn run_unit(&self, request: RpcRequest<'_>) -> ApiResult<()> {
        let action = request.action;
        let reply: RpcReply<Value> = self.send(request).await?;
        check_reply(action, reply).map(|_| ())
    }

    async fn send<T: DeserializeOwned>(&self, request: RpcRequest<'_>) -> ApiResult<RpcReply<T>> {
        let url = format!("{}/rpc/run", self.base_url);
        debug!("rpc {}", request.action);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl FormResponseApi for ApiClient {
    async fn get_project(&self, project_id: Uuid) -> ApiResult<Project> {
        let request = RpcRequest::new("project_read", PROJECT_FIELDS)
            .filter(json!({ "id": { "eq": project_id } }));
        let projects: Vec<Project> = self.run(request).await?;
        projects
            .into_iter()
            .next()
            .ok_or(ApiError::ProjectNotFound(project_id))
    }

    async fn list_form_responses(&self, project_id: Uuid) -> ApiResult<Vec<FormResponse>> {
        let request = RpcRequest::new("form_response_by_project", RESPONSE_FIELDS)
            .input(json!({ "projectId": project_id }));
        self.run(request).await
    }

    async fn create_form_response(&self, input: NewFormResponse) -> ApiResult<FormResponse> {
        let request =
            RpcRequest::new("form_response_create", RESPONSE_FIELDS).input(serde_json::to_value(input)?);
        self.run(request).await
    }

    async fn update_form_response(
        &self,
        id: Uuid,
        answer_value: AnswerValue,
    ) -> ApiResult<FormResponse> {
        let request = RpcRequest::new("form_response_update", RESPONSE_FIELDS)
            .primary_key(id)
            .input(json!({ "answerValue": answer_value }));
        self.run(request).await
    }

    async fn delete_form_response(&self, id: Uuid) -> ApiResult<()> {
        let request = RpcRequest::new("form_response_destroy", &["id"]).primary_key(id);
        self.run_unit(request).await
    }

    async fn submit_project(&self, project_id: Uuid) -> ApiResult<Project> {
        let request = RpcRequest::new("project_submit", PROJECT_FIELDS).primary_key(project_id);
        self.run(request).await
    }
}
