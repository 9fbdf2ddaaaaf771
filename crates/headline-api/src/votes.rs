//! Handler for `POST /stories/{id}/votes`.
//!
//! Body: `{"direction": "up"}` or `{"direction": "down"}`. Responds with the
//! single vote that was recorded.

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use headline_core::{
  store::NewsStore,
  vote::{Direction, Vote},
};
use serde_json::Value;

use crate::{ApiState, error::ApiError};

/// `POST /stories/{id}/votes`
///
/// Input is fully validated before the store is touched: a body without
/// `direction` is malformed; any direction other than the exact strings
/// `"up"` / `"down"` is rejected. An unknown story is rejected by the store
/// without writing anything.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vote>, ApiError>
where
  S: NewsStore,
{
  let Json(body) = body.map_err(|_| ApiError::MalformedBody)?;
  let direction = body.get("direction").ok_or(ApiError::MalformedBody)?;
  let direction = match direction.as_str() {
    Some(raw) => Direction::parse(raw)?,
    None => {
      return Err(ApiError::VoteRejected(format!(
        "direction must be a string, got {direction}"
      )));
    }
  };

  let Path(story_id) =
    id.map_err(|e| ApiError::VoteRejected(e.body_text()))?;

  let vote = state
    .store
    .record_vote(story_id, direction)
    .await
    .map_err(|e| ApiError::store("Unable to vote for stories.", e))?
    .ok_or_else(|| ApiError::VoteRejected(format!("story {story_id} not found")))?;

  Ok(Json(vote))
}
