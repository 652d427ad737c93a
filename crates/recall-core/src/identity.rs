//! Caller identity and the verifier contract.
//!
//! The verifier itself lives outside this crate (see `recall-server`); this
//! module only fixes the shape of what it returns.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The stable identifier of a verified caller.
///
/// Used verbatim as the owner key of every topic. No other claims from the
/// credential are consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for UserId {
  fn from(s: &str) -> Self { Self::new(s) }
}

impl From<String> for UserId {
  fn from(s: String) -> Self { Self(s) }
}

/// Why a bearer token was refused.
#[derive(Debug, Error)]
pub enum VerifyError {
  #[error("token is malformed")]
  Malformed,

  #[error("token has expired")]
  Expired,

  #[error("token rejected: {0}")]
  Rejected(String),

  #[error("token carries no subject")]
  MissingSubject,
}

/// Turns a bearer token into a [`UserId`].
///
/// Implementations are constructed once at startup and shared by handle with
/// every request handler. The method is synchronous so the trait stays object
/// safe and can be stored as `Arc<dyn IdentityVerifier>`.
pub trait IdentityVerifier: Send + Sync {
  fn verify(&self, token: &str) -> Result<UserId, VerifyError>;
}
