//! Handlers for `/topics` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/topics` | Body: `{"name":"..."}`; returns 201 + topic |
//! | `GET`    | `/topics` | Only the caller's topics |
//! | `PUT`    | `/topics/{id}` | Body: `{"name":"..."}` |
//! | `DELETE` | `/topics/{id}` | Also deletes every question in the topic |
//!
//! A topic that does not exist and a topic owned by someone else both yield
//! 404, so callers cannot probe for other users' ids.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use recall_core::{store::NoteStore, topic::Topic};
use serde::Deserialize;

use crate::{
  Ack, ApiState,
  auth::AuthUser,
  error::ApiError,
  extract::{Payload, ResourceId},
};

/// JSON body accepted by `POST /topics` and `PUT /topics/{id}`.
#[derive(Debug, Deserialize)]
pub struct TopicBody {
  pub name: String,
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /topics`: returns 201 + the stored [`Topic`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  AuthUser(uid): AuthUser,
  Payload(body): Payload<TopicBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NoteStore + 'static,
{
  let topic = state
    .store
    .create_topic(&uid, body.name)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(topic_id = %topic.topic_id, owner = %uid, "created topic");
  Ok((StatusCode::CREATED, Json(topic)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /topics`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  AuthUser(uid): AuthUser,
) -> Result<Json<Vec<Topic>>, ApiError>
where
  S: NoteStore + 'static,
{
  let topics = state.store.list_topics(&uid).await.map_err(ApiError::store)?;
  Ok(Json(topics))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /topics/{id}`: replaces the name.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  AuthUser(uid): AuthUser,
  ResourceId(id): ResourceId,
  Payload(body): Payload<TopicBody>,
) -> Result<Json<Topic>, ApiError>
where
  S: NoteStore + 'static,
{
  let topic = state
    .store
    .rename_topic(&uid, id, body.name)
    .await
    .map_err(ApiError::store)?
    .ok_or(recall_core::Error::TopicNotFoundOrForbidden(id))?;
  tracing::info!(topic_id = %id, owner = %uid, "renamed topic");
  Ok(Json(topic))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /topics/{id}`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  AuthUser(uid): AuthUser,
  ResourceId(id): ResourceId,
) -> Result<Json<Ack>, ApiError>
where
  S: NoteStore + 'static,
{
  let removed = state
    .store
    .delete_topic(&uid, id)
    .await
    .map_err(ApiError::store)?
    .ok_or(recall_core::Error::TopicNotFoundOrForbidden(id))?;
  tracing::info!(topic_id = %id, owner = %uid, questions = removed, "deleted topic");
  Ok(Json(Ack::new("Topic and related questions deleted")))
}
