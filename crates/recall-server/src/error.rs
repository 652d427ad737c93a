//! Startup error type for `recall-server`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("unsupported token algorithm: {0:?}")]
  UnsupportedAlgorithm(String),

  #[error("no verification key configured for {0}")]
  MissingKey(String),

  #[error("invalid verification key: {0}")]
  InvalidKey(#[from] jsonwebtoken::errors::Error),

  #[error("public_key_base64 is not valid base64: {0}")]
  KeyEncoding(#[from] base64::DecodeError),

  #[error("invalid CORS origin: {0:?}")]
  InvalidOrigin(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
