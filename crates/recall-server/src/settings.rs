//! Runtime configuration.
//!
//! Read from an optional TOML file, then overridden by `RECALL_`-prefixed
//! environment variables. Nested keys use a double underscore, e.g.
//! `RECALL_AUTH__SECRET`; `RECALL_CORS_ORIGINS` takes a comma-separated list.

use std::{collections::HashMap, path::{Path, PathBuf}};

use serde::Deserialize;

use crate::Result;

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  /// SQLite database file; a leading `~/` is expanded at startup.
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
  /// Browser origins allowed to call the API with credentials.
  #[serde(default = "default_cors_origins")]
  pub cors_origins:  Vec<String>,
  #[serde(default)]
  pub auth:          AuthSettings,
}

/// How bearer tokens are verified.
///
/// Exactly one key source is used, checked in this order: `keys`,
/// `public_key_pem`, `public_key_base64`, `secret`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
  /// JWS algorithm name, e.g. `RS256` or `HS256`.
  #[serde(default = "default_algorithm")]
  pub algorithm:         String,
  /// Shared secret for the HMAC algorithms.
  pub secret:            Option<String>,
  pub public_key_pem:    Option<String>,
  /// The PEM above, base64-encoded so it fits in a single env var.
  pub public_key_base64: Option<String>,
  /// Key id (`kid` header) → PEM, for issuers that rotate keys.
  #[serde(default)]
  pub keys:              HashMap<String, String>,
  /// Required `iss` claim, if set.
  pub issuer:            Option<String>,
  /// Required `aud` claim, if set.
  pub audience:          Option<String>,
  /// Clock skew tolerated on `exp`, in seconds.
  #[serde(default = "default_leeway")]
  pub leeway_secs:       u64,
}

impl Default for AuthSettings {
  fn default() -> Self {
    Self {
      algorithm:         default_algorithm(),
      secret:            None,
      public_key_pem:    None,
      public_key_base64: None,
      keys:              HashMap::new(),
      issuer:            None,
      audience:          None,
      leeway_secs:       default_leeway(),
    }
  }
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 8000 }

fn default_database_path() -> PathBuf { PathBuf::from("recall.db") }

fn default_cors_origins() -> Vec<String> {
  vec!["http://localhost:5173".to_owned(), "http://127.0.0.1:5173".to_owned()]
}

fn default_algorithm() -> String { "RS256".to_owned() }

fn default_leeway() -> u64 { 60 }

impl ServerConfig {
  /// Load from `path` (if it exists) layered under the environment.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("RECALL")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("cors_origins"),
      )
      .build()?;

    Ok(settings.try_deserialize()?)
  }
}
