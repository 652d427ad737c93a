//! JSON REST API for Recall.
//!
//! Exposes an axum [`Router`] backed by any [`recall_core::store::NoteStore`]
//! and guarded by an injected [`IdentityVerifier`]. TLS, CORS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = recall_api::ApiState::new(Arc::new(store), Arc::new(verifier));
//! axum::serve(listener, recall_api::api_router(state)).await?;
//! ```

pub mod auth;
pub mod error;
pub mod extract;
pub mod questions;
pub mod topics;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post, put},
};
use recall_core::{identity::IdentityVerifier, store::NoteStore};
use serde::Serialize;
use serde_json::{Value, json};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub verifier: Arc<dyn IdentityVerifier>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, verifier: Arc<dyn IdentityVerifier>) -> Self {
    Self { store, verifier }
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      verifier: Arc::clone(&self.verifier),
    }
  }
}

/// Acknowledgement body for deletions.
#[derive(Debug, Serialize)]
pub struct Ack {
  pub message: &'static str,
}

impl Ack {
  pub fn new(message: &'static str) -> Self { Self { message } }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: NoteStore + 'static,
{
  Router::new()
    .route("/", get(health))
    // Topics
    .route("/topics", get(topics::list::<S>).post(topics::create::<S>))
    .route("/topics/{id}", put(topics::update::<S>).delete(topics::delete_one::<S>))
    // Questions
    .route(
      "/topics/{id}/questions",
      get(questions::list::<S>).post(questions::create::<S>),
    )
    .route(
      "/questions/{id}",
      get(questions::get_one::<S>)
        .put(questions::update::<S>)
        .delete(questions::delete_one::<S>),
    )
    .route("/questions/{id}/revise", post(questions::revise::<S>))
    .with_state(state)
}

/// `GET /`: liveness probe; no credential required.
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use recall_core::identity::{UserId, VerifyError};
  use recall_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  /// Maps fixed tokens to identities.
  struct StaticVerifier(HashMap<&'static str, &'static str>);

  impl IdentityVerifier for StaticVerifier {
    fn verify(&self, token: &str) -> Result<UserId, VerifyError> {
      self
        .0
        .get(token)
        .map(|uid| UserId::new(*uid))
        .ok_or_else(|| VerifyError::Rejected("unknown token".into()))
    }
  }

  const U1: &str = "token-u1";
  const U2: &str = "token-u2";

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let verifier = StaticVerifier(HashMap::from([(U1, "u1"), (U2, "u2")]));
    api_router(ApiState::new(Arc::new(store), Arc::new(verifier)))
  }

  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    token:  Option<&str>,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  async fn create_topic(app: &Router, token: &str, name: &str) -> String {
    let (status, body) =
      send(app, "POST", "/topics", Some(token), Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_owned()
  }

  async fn create_question(app: &Router, token: &str, topic: &str) -> String {
    let (status, body) = send(
      app,
      "POST",
      &format!("/topics/{topic}/questions"),
      Some(token),
      Some(json!({ "question_text": "What is a trie?", "answer_text": "A *prefix* tree." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_owned()
  }

  // ── Health / auth ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_needs_no_auth() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
  }

  #[tokio::test]
  async fn missing_credential_is_401_with_challenge() {
    let app = app().await;
    let req = Request::builder().uri("/topics").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let challenge = resp.headers().get(header::WWW_AUTHENTICATE).unwrap();
    assert_eq!(challenge, "Bearer");
  }

  #[tokio::test]
  async fn wrong_scheme_is_401() {
    let app = app().await;
    let req = Request::builder()
      .uri("/topics")
      .header(header::AUTHORIZATION, format!("Basic {U1}"))
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn rejected_token_is_401_before_any_work() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/topics", Some("forged"), Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("invalid"));

    let (_, topics) = send(&app, "GET", "/topics", Some(U1), None).await;
    assert_eq!(topics, json!([]));
  }

  #[tokio::test]
  async fn auth_is_checked_before_path_validation() {
    let app = app().await;
    let (status, _) = send(&app, "GET", "/questions/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Topics ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn topic_representation_hides_owner() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/topics", Some(U1), Some(json!({ "name": "Algorithms" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Algorithms");
    assert!(body.get("owner_id").is_none());
    assert!(!body.to_string().contains("\"u1\""));
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    let created = body["created_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
    assert!(created.ends_with('Z'));
  }

  #[tokio::test]
  async fn users_only_list_their_own_topics() {
    let app = app().await;
    let mine = create_topic(&app, U1, "Mine").await;
    create_topic(&app, U2, "Theirs").await;

    let (status, body) = send(&app, "GET", "/topics", Some(U1), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], mine);
  }

  #[tokio::test]
  async fn rename_topic() {
    let app = app().await;
    let id = create_topic(&app, U1, "Algos").await;

    let (status, body) = send(
      &app,
      "PUT",
      &format!("/topics/{id}"),
      Some(U1),
      Some(json!({ "name": "Algorithms" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Algorithms");
    assert_eq!(body["id"], id);
  }

  #[tokio::test]
  async fn foreign_and_missing_topics_look_the_same() {
    let app = app().await;
    let id = create_topic(&app, U1, "Private").await;
    let missing = Uuid::new_v4();

    let (foreign_status, foreign_body) = send(
      &app,
      "PUT",
      &format!("/topics/{id}"),
      Some(U2),
      Some(json!({ "name": "pwned" })),
    )
    .await;
    let (missing_status, missing_body) = send(
      &app,
      "PUT",
      &format!("/topics/{missing}"),
      Some(U2),
      Some(json!({ "name": "pwned" })),
    )
    .await;
    assert_eq!(foreign_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_status, missing_status);
    assert_eq!(foreign_body, missing_body);

    let (status, _) = send(&app, "DELETE", &format!("/topics/{id}"), Some(U2), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
      send(&app, "GET", &format!("/topics/{id}/questions"), Some(U2), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_topic_removes_questions() {
    let app = app().await;
    let topic = create_topic(&app, U1, "Doomed").await;
    let q1 = create_question(&app, U1, &topic).await;
    let q2 = create_question(&app, U1, &topic).await;

    let (status, body) = send(&app, "DELETE", &format!("/topics/{topic}"), Some(U1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    for q in [q1, q2] {
      let (status, _) = send(&app, "GET", &format!("/questions/{q}"), Some(U1), None).await;
      assert_eq!(status, StatusCode::NOT_FOUND);
    }
  }

  // ── Validation ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_field_is_422_with_detail() {
    let app = app().await;
    let (status, body) = send(&app, "POST", "/topics", Some(U1), Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("name"), "{body}");

    let topic = create_topic(&app, U1, "T").await;
    let (status, body) = send(
      &app,
      "POST",
      &format!("/topics/{topic}/questions"),
      Some(U1),
      Some(json!({ "question_text": "q" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("answer_text"), "{body}");
  }

  #[tokio::test]
  async fn malformed_id_is_422() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/questions/not-a-uuid", Some(U1), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
  }

  // ── Questions ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_and_list_questions() {
    let app = app().await;
    let topic = create_topic(&app, U1, "Data structures").await;
    let q = create_question(&app, U1, &topic).await;

    let (status, body) =
      send(&app, "GET", &format!("/topics/{topic}/questions"), Some(U1), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], q);
    assert_eq!(list[0]["topic_id"], topic);
    assert_eq!(list[0]["revision_count"], 0);
    assert!(list[0]["last_revised_at"].is_null());
    assert_eq!(list[0]["answer_text"], "A *prefix* tree.");
  }

  #[tokio::test]
  async fn create_question_in_foreign_topic_is_404() {
    let app = app().await;
    let topic = create_topic(&app, U1, "Mine").await;
    let (status, _) = send(
      &app,
      "POST",
      &format!("/topics/{topic}/questions"),
      Some(U2),
      Some(json!({ "question_text": "q", "answer_text": "a" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn get_question_distinguishes_missing_from_foreign() {
    let app = app().await;
    let topic = create_topic(&app, U1, "Mine").await;
    let q = create_question(&app, U1, &topic).await;

    let (status, body) = send(&app, "GET", &format!("/questions/{q}"), Some(U1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], q);

    let (status, body) = send(&app, "GET", &format!("/questions/{q}"), Some(U2), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.get("question_text").is_none());

    let missing = Uuid::new_v4();
    let (status, _) = send(&app, "GET", &format!("/questions/{missing}"), Some(U1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn update_question_partially() {
    let app = app().await;
    let topic = create_topic(&app, U1, "T").await;
    let q = create_question(&app, U1, &topic).await;

    let (status, body) = send(
      &app,
      "PUT",
      &format!("/questions/{q}"),
      Some(U1),
      Some(json!({ "question_text": "Define a trie." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question_text"], "Define a trie.");
    assert_eq!(body["answer_text"], "A *prefix* tree.");

    let (status, body) = send(
      &app,
      "PUT",
      &format!("/questions/{q}"),
      Some(U1),
      Some(json!({ "answer_text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question_text"], "Define a trie.");
    assert_eq!(body["answer_text"], "");
  }

  #[tokio::test]
  async fn update_or_delete_foreign_question_is_404() {
    let app = app().await;
    let topic = create_topic(&app, U1, "T").await;
    let q = create_question(&app, U1, &topic).await;

    let (status, _) = send(
      &app,
      "PUT",
      &format!("/questions/{q}"),
      Some(U2),
      Some(json!({ "question_text": "mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/questions/{q}"), Some(U2), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", &format!("/questions/{q}"), Some(U1), None).await;
    assert_eq!(body["question_text"], "What is a trie?");
  }

  #[tokio::test]
  async fn delete_question() {
    let app = app().await;
    let topic = create_topic(&app, U1, "T").await;
    let q = create_question(&app, U1, &topic).await;

    let (status, body) = send(&app, "DELETE", &format!("/questions/{q}"), Some(U1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Question deleted");

    let (status, _) = send(&app, "DELETE", &format!("/questions/{q}"), Some(U1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", &format!("/topics/{topic}/questions"), Some(U1), None).await;
    assert_eq!(body, json!([]));
  }

  // ── Revision scenario ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn revision_scenario_end_to_end() {
    let app = app().await;
    let t1 = create_topic(&app, U1, "Algorithms").await;
    let q1 = create_question(&app, U1, &t1).await;

    let (status, body) =
      send(&app, "POST", &format!("/questions/{q1}/revise"), Some(U1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revision_count"], 1);
    assert!(body["last_revised_at"].is_string());

    let (status, _) =
      send(&app, "POST", &format!("/questions/{q1}/revise"), Some(U2), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", &format!("/questions/{q1}"), Some(U1), None).await;
    assert_eq!(body["revision_count"], 1);

    let (status, _) = send(&app, "DELETE", &format!("/topics/{t1}"), Some(U1), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/questions/{q1}"), Some(U1), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn repeated_revisions_accumulate() {
    let app = app().await;
    let topic = create_topic(&app, U1, "T").await;
    let q = create_question(&app, U1, &topic).await;

    let mut last = String::new();
    for k in 1..=3 {
      let (_, body) =
        send(&app, "POST", &format!("/questions/{q}/revise"), Some(U1), None).await;
      assert_eq!(body["revision_count"], k);
      last = body["last_revised_at"].as_str().unwrap().to_owned();
    }

    let (_, body) = send(&app, "GET", &format!("/questions/{q}"), Some(U1), None).await;
    assert_eq!(body["revision_count"], 3);
    assert_eq!(body["last_revised_at"], last);
  }
}
