//! Handler for `GET /search`.
//!
//! `tags` is a comma-separated list. Each entry is normalised to canonical
//! tag form before matching, so `?tags=politics` and `?tags=Politics` are the
//! same query.

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use headline_core::{
  search::collect_matches,
  store::NewsStore,
  tag::{TagName, parse_tag_list},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Comma-separated tags; a story is returned once per tag it matches.
  pub tags: Option<String>,
}

/// One result row: `[title, url, tag]`.
pub type SearchRow = (String, String, TagName);

/// `GET /search?tags=<tag>[,<tag>...]`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<SearchRow>>, ApiError>
where
  S: NewsStore,
{
  let raw = params
    .ok()
    .and_then(|Query(p)| p.tags)
    .ok_or(ApiError::MissingParam("tags"))?;
  let tags = parse_tag_list(&raw);

  let hits = state
    .store
    .search_by_tags(&tags)
    .await
    .map_err(|e| ApiError::store("Unable to search stories.", e))?;

  let rows = collect_matches(hits, state.search_policy)?
    .into_iter()
    .map(|m| (m.title, m.url, m.tag))
    .collect();
  Ok(Json(rows))
}
