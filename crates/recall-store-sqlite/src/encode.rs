//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that lexical order matches chronological order. UUIDs are
//! stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use recall_core::{identity::UserId, question::Question, store::OwnedQuestion, topic::Topic};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Current time truncated to the precision that survives a round trip
/// through [`encode_dt`].
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawTopic::from_row`].
pub const TOPIC_COLUMNS: &str = "topic_id, owner_id, name, created_at";

/// Raw strings read directly from a `topics` row.
pub struct RawTopic {
  pub topic_id:   String,
  pub owner_id:   String,
  pub name:       String,
  pub created_at: String,
}

impl RawTopic {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      topic_id:   row.get(0)?,
      owner_id:   row.get(1)?,
      name:       row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_topic(self) -> Result<Topic> {
    Ok(Topic {
      topic_id:   decode_uuid(&self.topic_id)?,
      owner_id:   UserId::from(self.owner_id),
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawQuestion::from_row`], qualified for joins
/// against `topics t`.
pub const QUESTION_COLUMNS: &str = "q.question_id, q.topic_id, q.question_text, \
   q.answer_text, q.revision_count, q.created_at, q.last_revised_at, t.owner_id";

/// Raw values read from a `questions` row joined with its parent topic.
pub struct RawQuestion {
  pub question_id:     String,
  pub topic_id:        String,
  pub question_text:   String,
  pub answer_text:     String,
  pub revision_count:  i64,
  pub created_at:      String,
  pub last_revised_at: Option<String>,
  // topics join
  pub owner_id:        String,
}

impl RawQuestion {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      question_id:     row.get(0)?,
      topic_id:        row.get(1)?,
      question_text:   row.get(2)?,
      answer_text:     row.get(3)?,
      revision_count:  row.get(4)?,
      created_at:      row.get(5)?,
      last_revised_at: row.get(6)?,
      owner_id:        row.get(7)?,
    })
  }

  pub fn into_owned(self) -> Result<OwnedQuestion> {
    let revision_count = u32::try_from(self.revision_count)
      .map_err(|_| Error::RevisionCount(self.revision_count))?;

    let question = Question {
      question_id: decode_uuid(&self.question_id)?,
      topic_id: decode_uuid(&self.topic_id)?,
      question_text: self.question_text,
      answer_text: self.answer_text,
      revision_count,
      created_at: decode_dt(&self.created_at)?,
      last_revised_at: self
        .last_revised_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
    };

    Ok(OwnedQuestion { question, owner_id: UserId::from(self.owner_id) })
  }

  pub fn into_question(self) -> Result<Question> {
    Ok(self.into_owned()?.question)
  }
}
