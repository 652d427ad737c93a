//! HTTP server wiring for Recall.
//!
//! Wraps the [`recall_api`] router with the layers a deployed instance
//! needs (request tracing, CORS) and builds the token verifier from
//! configuration.

pub mod settings;
pub mod error;
pub mod jwt;

pub use settings::{AuthSettings, ServerConfig};
pub use error::{Error, Result};
pub use jwt::JwtVerifier;

use axum::{Router, http::HeaderValue};
use recall_api::ApiState;
use recall_core::store::NoteStore;
use tower_http::{
  cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

/// CORS for a browser front-end sending credentials.
///
/// Credentials rule out wildcards, so methods and headers are mirrored from
/// the preflight request instead.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
  let origins = origins
    .iter()
    .map(|o| HeaderValue::from_str(o).map_err(|_| Error::InvalidOrigin(o.clone())))
    .collect::<Result<Vec<_>>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods(AllowMethods::mirror_request())
      .allow_headers(AllowHeaders::mirror_request())
      .allow_credentials(true),
  )
}

/// Build the complete application router.
pub fn app<S>(state: ApiState<S>, config: &ServerConfig) -> Result<Router>
where
  S: NoteStore + 'static,
{
  Ok(
    recall_api::api_router(state)
      .layer(cors_layer(&config.cors_origins)?)
      .layer(TraceLayer::new_for_http()),
  )
}

// ─── Integration tests ────────────────────────────────────────────────────────
