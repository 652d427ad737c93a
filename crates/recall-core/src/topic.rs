//! Topic: a user-owned grouping of questions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::UserId;

/// A named folder of questions belonging to exactly one identity.
///
/// `owner_id` is carried for access checks but never serialized, so it does
/// not leak to API callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
  #[serde(rename = "id")]
  pub topic_id:   Uuid,
  #[serde(skip_serializing, default)]
  pub owner_id:   UserId,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}
