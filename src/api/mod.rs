//! Remote persistence for questionnaire answers
//!
//! Answers are stored one record per question on the backend and read back
//! when a session starts. The backend speaks JSON RPC over HTTP.

mod client;
mod error;
mod store;
mod traits;
mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use store::{LoadedForm, ProjectFormStore};
pub use traits::FormResponseApi;
#[cfg(test)]
pub use traits::MockFormResponseApi;
pub use types::{AnswerValue, FormResponse, NewFormResponse, Project, ProjectState};
