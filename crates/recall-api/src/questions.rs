//! Handlers for question endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/topics/{id}/questions` | Body: [`NewQuestion`]; returns 201 |
//! | `GET`    | `/topics/{id}/questions` | All questions of the topic |
//! | `GET`    | `/questions/{id}` | 404 if absent, 403 if owned by another user |
//! | `PUT`    | `/questions/{id}` | Body: [`QuestionPatch`]; omitted fields kept |
//! | `DELETE` | `/questions/{id}` | |
//! | `POST`   | `/questions/{id}/revise` | Bumps the revision counter |
//!
//! Ownership is always that of the parent topic. Apart from the single-get
//! route, a foreign question is indistinguishable from a missing one.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use recall_core::{
  Error,
  question::{NewQuestion, Question, QuestionPatch},
  store::NoteStore,
};

use crate::{
  Ack, ApiState,
  auth::AuthUser,
  error::ApiError,
  extract::{Payload, ResourceId},
};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /topics/{id}/questions`: returns 201 + the stored [`Question`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  AuthUser(uid): AuthUser,
  ResourceId(topic_id): ResourceId,
  Payload(body): Payload<NewQuestion>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NoteStore + 'static,
{
  let question = state
    .store
    .create_question(&uid, topic_id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::TopicNotFoundOrForbidden(topic_id))?;
  tracing::info!(
    question_id = %question.question_id,
    topic_id = %topic_id,
    owner = %uid,
    "created question"
  );
  Ok((StatusCode::CREATED, Json(question)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /topics/{id}/questions`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  AuthUser(uid): AuthUser,
  ResourceId(topic_id): ResourceId,
) -> Result<Json<Vec<Question>>, ApiError>
where
  S: NoteStore + 'static,
{
  let questions = state
    .store
    .list_questions(&uid, topic_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::TopicNotFoundOrForbidden(topic_id))?;
  Ok(Json(questions))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /questions/{id}`
///
/// Unlike every other route this one tells "absent" (404) apart from
/// "not yours" (403).
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  AuthUser(uid): AuthUser,
  ResourceId(id): ResourceId,
) -> Result<Json<Question>, ApiError>
where
  S: NoteStore + 'static,
{
  let found = state
    .store
    .find_question(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::QuestionNotFound(id))?;

  if found.owner_id != uid {
    tracing::warn!(question_id = %id, caller = %uid, "question access denied");
    return Err(Error::QuestionForbidden(id).into());
  }
  Ok(Json(found.question))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /questions/{id}`: partial update of the text fields.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  AuthUser(uid): AuthUser,
  ResourceId(id): ResourceId,
  Payload(patch): Payload<QuestionPatch>,
) -> Result<Json<Question>, ApiError>
where
  S: NoteStore + 'static,
{
  let question = state
    .store
    .update_question(&uid, id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::QuestionNotFoundOrForbidden(id))?;
  tracing::info!(question_id = %id, owner = %uid, "updated question");
  Ok(Json(question))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /questions/{id}`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  AuthUser(uid): AuthUser,
  ResourceId(id): ResourceId,
) -> Result<Json<Ack>, ApiError>
where
  S: NoteStore + 'static,
{
  let deleted = state
    .store
    .delete_question(&uid, id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(Error::QuestionNotFoundOrForbidden(id).into());
  }
  tracing::info!(question_id = %id, owner = %uid, "deleted question");
  Ok(Json(Ack::new("Question deleted")))
}

// ─── Revise ───────────────────────────────────────────────────────────────────

/// `POST /questions/{id}/revise`: one call, one increment.
pub async fn revise<S>(
  State(state): State<ApiState<S>>,
  AuthUser(uid): AuthUser,
  ResourceId(id): ResourceId,
) -> Result<Json<Question>, ApiError>
where
  S: NoteStore + 'static,
{
  let question = state
    .store
    .revise_question(&uid, id)
    .await
    .map_err(ApiError::store)?
    .ok_or(Error::QuestionNotFoundOrForbidden(id))?;
  tracing::info!(
    question_id = %id,
    owner = %uid,
    revision_count = question.revision_count,
    "revised question"
  );
  Ok(Json(question))
}
