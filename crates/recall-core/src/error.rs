//! Error types for `recall-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The topic does not exist or belongs to another identity. The two cases
  /// are reported identically.
  #[error("topic {0} not found or access denied")]
  TopicNotFoundOrForbidden(Uuid),

  /// The question does not exist or its topic belongs to another identity.
  #[error("question {0} not found or access denied")]
  QuestionNotFoundOrForbidden(Uuid),

  #[error("question not found: {0}")]
  QuestionNotFound(Uuid),

  #[error("access to question {0} denied")]
  QuestionForbidden(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
