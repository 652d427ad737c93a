//! Bearer-token extractor.
//!
//! The token itself is checked by whatever [`IdentityVerifier`] the
//! [`ApiState`] was built with; this module only handles the header.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use recall_core::{
  identity::{IdentityVerifier as _, UserId},
  store::NoteStore,
};

use crate::{ApiState, error::ApiError};

/// The verified identity of the caller. Present in a handler means the
/// request was authenticated.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserId);

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  let value = headers
    .get(header::AUTHORIZATION)
    .ok_or_else(|| ApiError::Unauthenticated("missing Authorization header".into()))?
    .to_str()
    .map_err(|_| ApiError::Unauthenticated("malformed Authorization header".into()))?;

  let token = value
    .strip_prefix("Bearer ")
    .ok_or_else(|| ApiError::Unauthenticated("invalid authentication scheme".into()))?
    .trim();

  if token.is_empty() {
    return Err(ApiError::Unauthenticated("empty bearer token".into()));
  }
  Ok(token)
}

impl<S> FromRequestParts<ApiState<S>> for AuthUser
where
  S: NoteStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?;

    match state.verifier.verify(token) {
      Ok(uid) => Ok(AuthUser(uid)),
      Err(e) => {
        tracing::warn!(error = %e, "rejected bearer token");
        Err(ApiError::Unauthenticated("invalid or expired token".into()))
      }
    }
  }
}
