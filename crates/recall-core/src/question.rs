//! Question: a question/answer pair with a revision counter.
//!
//! A question has no owner of its own. Its effective owner is the owner of
//! the topic it belongs to, resolved at access time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored question.
///
/// `answer_text` may hold markup; it is stored and returned verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
  #[serde(rename = "id")]
  pub question_id:     Uuid,
  pub topic_id:        Uuid,
  pub question_text:   String,
  pub answer_text:     String,
  /// Number of explicit revisions. Only ever incremented, one at a time.
  pub revision_count:  u32,
  pub created_at:      DateTime<Utc>,
  /// Set by each revision; `None` until the first one.
  pub last_revised_at: Option<DateTime<Utc>>,
}

/// Input for creating a question under a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
  pub question_text: String,
  pub answer_text:   String,
}

/// A partial update to a question's text fields.
///
/// An omitted field (or explicit `null`) leaves the stored value as it is;
/// an empty string overwrites it with the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub question_text: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub answer_text:   Option<String>,
}

impl QuestionPatch {
  /// `true` when applying the patch would change nothing.
  pub fn is_empty(&self) -> bool {
    self.question_text.is_none() && self.answer_text.is_none()
  }

  /// Apply the present fields to `question` in place.
  pub fn apply(self, question: &mut Question) {
    if let Some(text) = self.question_text {
      question.question_text = text;
    }
    if let Some(text) = self.answer_text {
      question.answer_text = text;
    }
  }
}
