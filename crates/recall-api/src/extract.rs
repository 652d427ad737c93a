//! Request extractors that report failures as [`ApiError::Validation`]
//! instead of axum's plain-text rejections.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Path, Request},
  http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ApiError;

/// A JSON request body.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    Ok(Payload(value))
  }
}

/// The single `{id}` segment of a resource path.
pub struct ResourceId(pub Uuid);

impl<S> FromRequestParts<S> for ResourceId
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
      .await
      .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    Ok(ResourceId(id))
  }
}
