//! Handler for `GET /stories`.

use axum::{Json, extract::State};
use headline_core::{store::NewsStore, story::RankedStory};
use serde::Serialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct StoriesResponse {
  pub stories:       Vec<RankedStory>,
  pub success:       bool,
  pub total_stories: usize,
}

/// `GET /stories` — every story, highest score first. An empty store is a
/// successful, empty listing.
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<StoriesResponse>, ApiError>
where
  S: NewsStore,
{
  let stories = state
    .store
    .list_stories()
    .await
    .map_err(|e| ApiError::store("Unable to retrieve stories.", e))?;

  Ok(Json(StoriesResponse {
    total_stories: stories.len(),
    success: true,
    stories,
  }))
}
