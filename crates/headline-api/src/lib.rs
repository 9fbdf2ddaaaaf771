//! JSON REST API for Headline.
//!
//! Exposes an axum [`Router`] backed by any [`headline_core::store::NewsStore`].
//! Static assets, tracing layers and transport concerns are the caller's
//! responsibility.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/stories` | `{stories, success, total_stories}`, highest score first |
//! | `POST` | `/stories/{id}/votes` | Body: `{"direction":"up"\|"down"}`; returns the new vote |
//! | `GET`  | `/search` | `?tags=a,b`; returns `[[title, url, tag], ...]` |

pub mod error;
pub mod search;
pub mod stories;
pub mod votes;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use headline_core::{search::SearchPolicy, store::NewsStore};

pub use error::ApiError;

/// Shared state threaded through all API handlers.
#[derive(Clone)]
pub struct ApiState<S> {
  /// Handlers borrow a pooled connection from the store per call.
  pub store:         Arc<S>,
  pub search_policy: SearchPolicy,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, search_policy: SearchPolicy::default() }
  }

  pub fn with_search_policy(mut self, policy: SearchPolicy) -> Self {
    self.search_policy = policy;
    self
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: NewsStore + Clone + 'static,
{
  Router::new()
    .route("/stories", get(stories::list::<S>))
    .route("/stories/{id}/votes", post(votes::create::<S>))
    .route("/search", get(search::handler::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use headline_core::{
    search::TagHits,
    story::{IngestReport, NewStory, RankedStory},
    tag::TagName,
    vote::{Direction, Vote},
  };
  use headline_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state() -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    ApiState::new(Arc::new(store))
  }

  async fn seed(state: &ApiState<SqliteStore>, triples: &[(&str, &str, &str)]) {
    let batch = triples
      .iter()
      .map(|(title, url, tag)| NewStory::from_scraped(*title, *url, tag).unwrap())
      .collect();
    state.store.ingest(batch).await.unwrap();
  }

  async fn call<S>(
    state:  ApiState<S>,
    method: &str,
    uri:    &str,
    body:   Option<&str>,
  ) -> (StatusCode, Value)
  where
    S: NewsStore + Clone + 'static,
  {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let req = builder
      .body(Body::from(body.unwrap_or_default().to_string()))
      .unwrap();

    let resp   = api_router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json   = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  // ── GET /stories ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn empty_store_lists_successfully() {
    let state = make_state().await;
    let (status, body) = call(state, "GET", "/stories", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "stories": [], "success": true, "total_stories": 0 }));
  }

  #[tokio::test]
  async fn voted_story_is_listed_first() {
    let state = make_state().await;
    seed(&state, &[("B", "http://x/b", "world"), ("A", "http://x/a", "world")]).await;

    let (_, listed) = call(state.clone(), "GET", "/stories", None).await;
    let a_id = listed["stories"][1]["id"].as_i64().unwrap();

    let (status, _) = call(
      state.clone(),
      "POST",
      &format!("/stories/{a_id}/votes"),
      Some(r#"{"direction":"up"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(state, "GET", "/stories", None).await;
    assert_eq!(body["total_stories"], 2);
    assert_eq!(body["stories"][0]["title"], "A");
    assert_eq!(body["stories"][0]["score"], 1);
    assert_eq!(body["stories"][1]["title"], "B");
    assert_eq!(body["stories"][1]["score"], 0);
    for key in ["id", "title", "url", "created_at", "updated_at", "score"] {
      assert!(body["stories"][0].get(key).is_some(), "missing {key}");
    }
  }

  // ── POST /stories/{id}/votes ─────────────────────────────────────────────────

  #[tokio::test]
  async fn vote_returns_only_the_created_vote() {
    let state = make_state().await;
    seed(&state, &[("A", "http://x/a", "world")]).await;

    call(state.clone(), "POST", "/stories/1/votes", Some(r#"{"direction":"up"}"#)).await;
    let (status, body) =
      call(state, "POST", "/stories/1/votes", Some(r#"{"direction":"down"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_object(), "expected a single vote, got {body}");
    assert_eq!(body["direction"], "down");
    assert_eq!(body["story_id"], 1);
    assert_eq!(body["id"], 2);
  }

  #[tokio::test]
  async fn invalid_direction_is_rejected_without_writing() {
    let state = make_state().await;
    seed(&state, &[("A", "http://x/a", "world")]).await;

    for body in [r#"{"direction":"sideways"}"#, r#"{"direction":"UP"}"#, r#"{"direction":1}"#] {
      let (status, json) = call(state.clone(), "POST", "/stories/1/votes", Some(body)).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
      assert_eq!(json, json!({ "error": true, "message": "Unable to vote for stories." }));
    }
    assert_eq!(state.store.count_votes().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn missing_direction_is_malformed() {
    let state = make_state().await;
    seed(&state, &[("A", "http://x/a", "world")]).await;

    for body in [Some(r#"{}"#), Some(r#"{"dir":"up"}"#), Some("not json"), Some("[]"), None] {
      let (status, json) = call(state.clone(), "POST", "/stories/1/votes", body).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{body:?}");
      assert_eq!(json, json!({ "error": true, "message": "Malformed request body." }));
    }
    assert_eq!(state.store.count_votes().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn json_body_without_content_type_is_malformed() {
    let state = make_state().await;
    seed(&state, &[("A", "http://x/a", "world")]).await;

    let req = Request::builder()
      .method("POST")
      .uri("/stories/1/votes")
      .body(Body::from(r#"{"direction":"up"}"#))
      .unwrap();
    let resp = api_router(state.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json, json!({ "error": true, "message": "Malformed request body." }));
    assert_eq!(state.store.count_votes().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn vote_for_unknown_story_is_rejected() {
    let state = make_state().await;
    let (status, json) =
      call(state.clone(), "POST", "/stories/999/votes", Some(r#"{"direction":"up"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Unable to vote for stories.");
    assert_eq!(state.store.count_votes().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn non_numeric_story_id_is_rejected() {
    let state = make_state().await;
    let (status, json) =
      call(state, "POST", "/stories/abc/votes", Some(r#"{"direction":"up"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Unable to vote for stories.");
  }

  // ── GET /search ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn search_returns_title_url_tag_rows() {
    let state = make_state().await;
    seed(
      &state,
      &[
        ("Vote", "http://x/v", "politics"),
        ("Goal", "http://x/g", "sport"),
        ("Vote", "http://x/v", "sport"),
      ],
    )
    .await;

    let (status, body) = call(state, "GET", "/search?tags=sport,POLITICS", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body,
      json!([
        ["Vote", "http://x/v", "Sport"],
        ["Goal", "http://x/g", "Sport"],
        ["Vote", "http://x/v", "Politics"],
      ])
    );
  }

  #[tokio::test]
  async fn search_is_case_insensitive_on_input() {
    let state = make_state().await;
    seed(&state, &[("Vote", "http://x/v", "Politics")]).await;

    let (_, lower) = call(state.clone(), "GET", "/search?tags=politics", None).await;
    let (_, title) = call(state, "GET", "/search?tags=Politics", None).await;
    assert_eq!(lower, title);
    assert_eq!(lower.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn unmatched_tag_is_skipped_by_default() {
    let state = make_state().await;
    seed(&state, &[("Goal", "http://x/g", "sport")]).await;

    let (status, body) = call(state, "GET", "/search?tags=weather,sport", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([["Goal", "http://x/g", "Sport"]]));
  }

  #[tokio::test]
  async fn unmatched_tag_is_rejected_under_strict_policy() {
    let state = make_state()
      .await
      .with_search_policy(SearchPolicy::RejectEmpty);
    seed(&state, &[("Goal", "http://x/g", "sport")]).await;

    let (status, body) = call(state, "GET", "/search?tags=sport,weather", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(["Invalid tag."]));
  }

  #[tokio::test]
  async fn search_without_tags_param_is_malformed() {
    let state = make_state().await;
    let (status, body) = call(state, "GET", "/search", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": true, "message": "Malformed request." }));
  }

  // ── Storage failures ─────────────────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("disk on fire at /var/lib/headline.db")]
  struct Broken;

  /// A store whose every operation fails.
  #[derive(Clone)]
  struct BrokenStore;

  impl NewsStore for BrokenStore {
    type Error = Broken;

    async fn list_stories(&self) -> Result<Vec<RankedStory>, Broken> { Err(Broken) }

    async fn search_by_tags(&self, _tags: &[TagName]) -> Result<Vec<TagHits>, Broken> {
      Err(Broken)
    }

    async fn count_votes(&self) -> Result<u64, Broken> { Err(Broken) }

    async fn record_vote(&self, _id: i64, _d: Direction) -> Result<Option<Vote>, Broken> {
      Err(Broken)
    }

    async fn ingest(&self, _stories: Vec<NewStory>) -> Result<IngestReport, Broken> {
      Err(Broken)
    }
  }

  fn broken() -> ApiState<BrokenStore> { ApiState::new(Arc::new(BrokenStore)) }

  #[tokio::test]
  async fn storage_failure_on_list_is_500_without_internals() {
    let (status, body) = call(broken(), "GET", "/stories", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": true, "message": "Unable to retrieve stories." }));
    assert!(!body.to_string().contains("disk on fire"));
  }

  #[tokio::test]
  async fn storage_failure_on_vote_is_500() {
    let (status, body) =
      call(broken(), "POST", "/stories/1/votes", Some(r#"{"direction":"up"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Unable to vote for stories.");
  }

  #[tokio::test]
  async fn storage_failure_on_search_is_500() {
    let (status, body) = call(broken(), "GET", "/search?tags=sport", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Unable to search stories.");
  }

  #[test]
  fn timestamps_in_votes_serialise_as_rfc3339() {
    let at = chrono::DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
      .unwrap()
      .with_timezone(&chrono::Utc);
    let vote = Vote { id: 1, direction: Direction::Up, story_id: 3, created_at: at, updated_at: at };
    let json = serde_json::to_value(&vote).unwrap();
    assert_eq!(json["created_at"], "2024-05-01T10:00:00Z");
  }
}
