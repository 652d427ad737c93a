//! [`SqliteStore`]: the SQLite implementation of [`NoteStore`].

use std::path::Path;

use recall_core::{
  identity::UserId,
  question::{NewQuestion, Question, QuestionPatch},
  store::{NoteStore, OwnedQuestion},
  topic::Topic,
};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use crate::{
  encode::{
    QUESTION_COLUMNS, RawQuestion, RawTopic, TOPIC_COLUMNS, encode_dt, encode_uuid,
    now,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Recall note store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All clones
/// share one connection thread, so every transaction below runs to
/// completion before the next one starts.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  #[cfg(test)]
  pub(crate) fn conn_for_tests(&self) -> &tokio_rusqlite::Connection { &self.conn }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Load a question joined with its topic, optionally restricted to topics
/// owned by `owner`.
fn select_question(
  conn: &rusqlite::Connection,
  question_id: &str,
  owner: Option<&str>,
) -> rusqlite::Result<Option<RawQuestion>> {
  conn
    .query_row(
      &format!(
        "SELECT {QUESTION_COLUMNS}
         FROM questions q
         JOIN topics t ON t.topic_id = q.topic_id
         WHERE q.question_id = ?1
           AND (?2 IS NULL OR t.owner_id = ?2)"
      ),
      rusqlite::params![question_id, owner],
      RawQuestion::from_row,
    )
    .optional()
}

/// `true` if the topic exists and belongs to `owner`.
fn owns_topic(
  conn: &rusqlite::Connection,
  topic_id: &str,
  owner: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM topics WHERE topic_id = ?1 AND owner_id = ?2",
        rusqlite::params![topic_id, owner],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

// ─── NoteStore impl ──────────────────────────────────────────────────────────

impl NoteStore for SqliteStore {
  type Error = crate::Error;

  // ── Topics ────────────────────────────────────────────────────────────────

  async fn create_topic(&self, owner: &UserId, name: String) -> Result<Topic> {
    let topic = Topic {
      topic_id:   Uuid::new_v4(),
      owner_id:   owner.clone(),
      name,
      created_at: now(),
    };

    let id_str    = encode_uuid(topic.topic_id);
    let owner_str = owner.as_str().to_owned();
    let name      = topic.name.clone();
    let at_str    = encode_dt(topic.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO topics (topic_id, owner_id, name, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, owner_str, name, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(topic)
  }

  async fn list_topics(&self, owner: &UserId) -> Result<Vec<Topic>> {
    let owner_str = owner.as_str().to_owned();

    let raws: Vec<RawTopic> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TOPIC_COLUMNS} FROM topics
           WHERE owner_id = ?1
           ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawTopic::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTopic::into_topic).collect()
  }

  async fn rename_topic(
    &self,
    owner:    &UserId,
    topic_id: Uuid,
    name:     String,
  ) -> Result<Option<Topic>> {
    let id_str    = encode_uuid(topic_id);
    let owner_str = owner.as_str().to_owned();

    let raw: Option<RawTopic> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let updated = tx.execute(
          "UPDATE topics SET name = ?3 WHERE topic_id = ?1 AND owner_id = ?2",
          rusqlite::params![id_str, owner_str, name],
        )?;
        if updated == 0 {
          return Ok(None);
        }
        let raw = tx.query_row(
          &format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE topic_id = ?1"),
          rusqlite::params![id_str],
          RawTopic::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawTopic::into_topic).transpose()
  }

  async fn delete_topic(&self, owner: &UserId, topic_id: Uuid) -> Result<Option<usize>> {
    let id_str    = encode_uuid(topic_id);
    let owner_str = owner.as_str().to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !owns_topic(&tx, &id_str, &owner_str)? {
          return Ok(None);
        }
        // Children first; the FK cascade would catch anything missed here.
        let removed = tx.execute(
          "DELETE FROM questions WHERE topic_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute("DELETE FROM topics WHERE topic_id = ?1", rusqlite::params![id_str])?;
        tx.commit()?;
        Ok(Some(removed))
      })
      .await?;

    Ok(removed)
  }

  // ── Questions ─────────────────────────────────────────────────────────────

  async fn create_question(
    &self,
    owner:    &UserId,
    topic_id: Uuid,
    input:    NewQuestion,
  ) -> Result<Option<Question>> {
    let question = Question {
      question_id:     Uuid::new_v4(),
      topic_id,
      question_text:   input.question_text,
      answer_text:     input.answer_text,
      revision_count:  0,
      created_at:      now(),
      last_revised_at: None,
    };

    let id_str        = encode_uuid(question.question_id);
    let topic_str     = encode_uuid(topic_id);
    let owner_str     = owner.as_str().to_owned();
    let question_text = question.question_text.clone();
    let answer_text   = question.answer_text.clone();
    let at_str        = encode_dt(question.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !owns_topic(&tx, &topic_str, &owner_str)? {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO questions (
             question_id, topic_id, question_text, answer_text,
             revision_count, created_at, last_revised_at
           ) VALUES (?1, ?2, ?3, ?4, 0, ?5, NULL)",
          rusqlite::params![id_str, topic_str, question_text, answer_text, at_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some(question))
  }

  async fn list_questions(
    &self,
    owner:    &UserId,
    topic_id: Uuid,
  ) -> Result<Option<Vec<Question>>> {
    let topic_str = encode_uuid(topic_id);
    let owner_str = owner.as_str().to_owned();

    let raws: Option<Vec<RawQuestion>> = self
      .conn
      .call(move |conn| {
        // Deferred: a read snapshot covering the check and the listing.
        let tx = conn.transaction()?;
        if !owns_topic(&tx, &topic_str, &owner_str)? {
          return Ok(None);
        }
        let rows = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {QUESTION_COLUMNS}
             FROM questions q
             JOIN topics t ON t.topic_id = q.topic_id
             WHERE q.topic_id = ?1
             ORDER BY q.created_at, q.rowid"
          ))?;
          stmt
            .query_map(rusqlite::params![topic_str], RawQuestion::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;
        Ok(Some(rows))
      })
      .await?;

    raws
      .map(|rows| rows.into_iter().map(RawQuestion::into_question).collect())
      .transpose()
  }

  async fn find_question(&self, question_id: Uuid) -> Result<Option<OwnedQuestion>> {
    let id_str = encode_uuid(question_id);

    let raw = self
      .conn
      .call(move |conn| Ok(select_question(conn, &id_str, None)?))
      .await?;

    raw.map(RawQuestion::into_owned).transpose()
  }

  async fn update_question(
    &self,
    owner:       &UserId,
    question_id: Uuid,
    patch:       QuestionPatch,
  ) -> Result<Option<Question>> {
    let id_str    = encode_uuid(question_id);
    let owner_str = owner.as_str().to_owned();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if select_question(&tx, &id_str, Some(&owner_str))?.is_none() {
          return Ok(None);
        }
        // NULL parameters leave the column as it is; '' overwrites it.
        tx.execute(
          "UPDATE questions
           SET question_text = COALESCE(?2, question_text),
               answer_text   = COALESCE(?3, answer_text)
           WHERE question_id = ?1",
          rusqlite::params![id_str, patch.question_text, patch.answer_text],
        )?;
        let raw = select_question(&tx, &id_str, None)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawQuestion::into_question).transpose()
  }

  async fn delete_question(&self, owner: &UserId, question_id: Uuid) -> Result<bool> {
    let id_str    = encode_uuid(question_id);
    let owner_str = owner.as_str().to_owned();

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM questions
           WHERE question_id = ?1
             AND topic_id IN (SELECT topic_id FROM topics WHERE owner_id = ?2)",
          rusqlite::params![id_str, owner_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn revise_question(
    &self,
    owner:       &UserId,
    question_id: Uuid,
  ) -> Result<Option<Question>> {
    let id_str    = encode_uuid(question_id);
    let owner_str = owner.as_str().to_owned();
    let at_str    = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        // The increment happens inside SQLite; no read-modify-write here.
        let updated = tx.execute(
          "UPDATE questions
           SET revision_count  = revision_count + 1,
               last_revised_at = ?3
           WHERE question_id = ?1
             AND topic_id IN (SELECT topic_id FROM topics WHERE owner_id = ?2)",
          rusqlite::params![id_str, owner_str, at_str],
        )?;
        if updated == 0 {
          return Ok(None);
        }
        let raw = select_question(&tx, &id_str, None)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawQuestion::into_question).transpose()
  }
}
