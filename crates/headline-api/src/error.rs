//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error becomes a JSON body. Store failures are logged here and the
//! client only ever sees a fixed, human-readable message.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use headline_core::tag::TagName;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The vote body was not a JSON object with a `direction` field.
  #[error("malformed request body")]
  MalformedBody,

  /// A required query parameter was absent.
  #[error("malformed request: missing `{0}` parameter")]
  MissingParam(&'static str),

  /// Bad direction, non-numeric id, or unknown story.
  #[error("cannot record vote: {0}")]
  VoteRejected(String),

  #[error("no stories match tag {0}")]
  InvalidTag(TagName),

  #[error("{message}")]
  Store {
    /// Shown to the client.
    message: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn store<E>(message: &'static str, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store { message, source: Box::new(source) }
  }
}

impl From<headline_core::Error> for ApiError {
  fn from(e: headline_core::Error) -> Self {
    match e {
      headline_core::Error::InvalidDirection(raw) => {
        Self::VoteRejected(format!("invalid direction {raw:?}"))
      }
      headline_core::Error::NoMatch(tag) => Self::InvalidTag(tag),
    }
  }
}

fn message(status: StatusCode, message: &str) -> Response {
  (status, Json(json!({ "error": true, "message": message }))).into_response()
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::Store { source, .. } => {
        tracing::error!(error = %source, "{self}");
      }
      other => tracing::debug!(error = %other, "rejected request"),
    }

    match self {
      ApiError::MalformedBody => {
        message(StatusCode::BAD_REQUEST, "Malformed request body.")
      }
      ApiError::MissingParam(_) => {
        message(StatusCode::BAD_REQUEST, "Malformed request.")
      }
      ApiError::VoteRejected(_) => {
        message(StatusCode::BAD_REQUEST, "Unable to vote for stories.")
      }
      ApiError::InvalidTag(_) => {
        (StatusCode::BAD_REQUEST, Json(json!(["Invalid tag."]))).into_response()
      }
      ApiError::Store { message: m, .. } => {
        message(StatusCode::INTERNAL_SERVER_ERROR, m)
      }
    }
  }
}
