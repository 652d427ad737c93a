//! The `NoteStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `recall-store-sqlite`).
//! Higher layers (`recall-api`, `recall-server`) depend on this abstraction,
//! not on any concrete backend.
//!
//! Ownership is part of the storage contract. Operations that act on behalf
//! of a caller take the caller's [`UserId`] and report "missing" and "owned
//! by someone else" the same way (`None` or `false`), so that the access
//! check and the write it guards commit in one transaction.

use std::future::Future;

use uuid::Uuid;

use crate::{
  identity::UserId,
  question::{NewQuestion, Question, QuestionPatch},
  topic::Topic,
};

/// A question together with the owner of its parent topic.
#[derive(Debug, Clone)]
pub struct OwnedQuestion {
  pub question: Question,
  pub owner_id: UserId,
}

/// Abstraction over a Recall storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait NoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Topics ────────────────────────────────────────────────────────────

  /// Create a topic owned by `owner`. Names need not be unique.
  fn create_topic<'a>(
    &'a self,
    owner: &'a UserId,
    name: String,
  ) -> impl Future<Output = Result<Topic, Self::Error>> + Send + 'a;

  /// All topics owned by `owner`, oldest first.
  fn list_topics<'a>(
    &'a self,
    owner: &'a UserId,
  ) -> impl Future<Output = Result<Vec<Topic>, Self::Error>> + Send + 'a;

  /// Replace the name of a topic. `None` if missing or not owned.
  fn rename_topic<'a>(
    &'a self,
    owner: &'a UserId,
    topic_id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Option<Topic>, Self::Error>> + Send + 'a;

  /// Delete a topic and every question under it, atomically.
  ///
  /// Returns the number of questions removed with it, or `None` if the topic
  /// is missing or not owned.
  fn delete_topic<'a>(
    &'a self,
    owner: &'a UserId,
    topic_id: Uuid,
  ) -> impl Future<Output = Result<Option<usize>, Self::Error>> + Send + 'a;

  // ── Questions ─────────────────────────────────────────────────────────

  /// Add a question to a topic owned by `owner`. `None` if the topic is
  /// missing or not owned.
  fn create_question<'a>(
    &'a self,
    owner: &'a UserId,
    topic_id: Uuid,
    input: NewQuestion,
  ) -> impl Future<Output = Result<Option<Question>, Self::Error>> + Send + 'a;

  /// All questions of a topic owned by `owner`, oldest first. `None` if the
  /// topic is missing or not owned.
  fn list_questions<'a>(
    &'a self,
    owner: &'a UserId,
    topic_id: Uuid,
  ) -> impl Future<Output = Result<Option<Vec<Question>>, Self::Error>> + Send + 'a;

  /// Look up a question by id regardless of owner, resolving the owner of
  /// its parent topic. Callers decide what a foreign owner means.
  fn find_question(
    &self,
    question_id: Uuid,
  ) -> impl Future<Output = Result<Option<OwnedQuestion>, Self::Error>> + Send + '_;

  /// Apply a partial update. `None` if missing or not owned.
  fn update_question<'a>(
    &'a self,
    owner: &'a UserId,
    question_id: Uuid,
    patch: QuestionPatch,
  ) -> impl Future<Output = Result<Option<Question>, Self::Error>> + Send + 'a;

  /// Delete a single question. `false` if missing or not owned.
  fn delete_question<'a>(
    &'a self,
    owner: &'a UserId,
    question_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Increment `revision_count` by exactly one and stamp `last_revised_at`.
  ///
  /// The increment is applied by the storage engine, so concurrent calls
  /// never lose updates. `None` if missing or not owned.
  fn revise_question<'a>(
    &'a self,
    owner: &'a UserId,
    question_id: Uuid,
  ) -> impl Future<Output = Result<Option<Question>, Self::Error>> + Send + 'a;
}
