//! JWT bearer-token verification.
//!
//! Tokens are checked for signature, expiry and, when configured, issuer and
//! audience. The `sub` claim becomes the caller's [`UserId`]; nothing else in
//! the token is consumed.

use std::{collections::HashMap, str::FromStr};

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use jsonwebtoken::{
  Algorithm, DecodingKey, Validation, decode, decode_header, errors::ErrorKind,
};
use recall_core::identity::{IdentityVerifier, UserId, VerifyError};
use serde::Deserialize;

use crate::{Error, Result, settings::AuthSettings};

/// The only claim we read. Everything else in the payload is ignored.
#[derive(Debug, Deserialize)]
struct Claims {
  #[serde(default)]
  sub: String,
}

enum Keys {
  Single(DecodingKey),
  /// Selected by the `kid` header of each token.
  ByKid(HashMap<String, DecodingKey>),
}

/// Verifies JWTs against a fixed key or key set.
///
/// Built once at startup from [`AuthSettings`] and shared across requests.
pub struct JwtVerifier {
  keys:       Keys,
  validation: Validation,
}

impl JwtVerifier {
  pub fn from_settings(settings: &AuthSettings) -> Result<Self> {
    let algorithm = Algorithm::from_str(&settings.algorithm)
      .map_err(|_| Error::UnsupportedAlgorithm(settings.algorithm.clone()))?;

    let keys = if !settings.keys.is_empty() {
      let by_kid = settings
        .keys
        .iter()
        .map(|(kid, pem)| Ok((kid.to_lowercase(), public_key(algorithm, pem.as_bytes())?)))
        .collect::<Result<HashMap<_, _>>>()?;
      Keys::ByKid(by_kid)
    } else if let Some(pem) = &settings.public_key_pem {
      Keys::Single(public_key(algorithm, pem.as_bytes())?)
    } else if let Some(encoded) = &settings.public_key_base64 {
      let pem = B64.decode(encoded.trim())?;
      Keys::Single(public_key(algorithm, &pem)?)
    } else if let Some(secret) = &settings.secret {
      if !is_hmac(algorithm) {
        return Err(Error::MissingKey(settings.algorithm.clone()));
      }
      Keys::Single(DecodingKey::from_secret(secret.as_bytes()))
    } else {
      return Err(Error::MissingKey(settings.algorithm.clone()));
    };

    let mut validation = Validation::new(algorithm);
    validation.leeway = settings.leeway_secs;
    let mut required = vec!["exp"];
    if let Some(issuer) = &settings.issuer {
      validation.set_issuer(&[issuer]);
      required.push("iss");
    }
    match &settings.audience {
      Some(audience) => {
        validation.set_audience(&[audience]);
        required.push("aud");
      }
      None => validation.validate_aud = false,
    }
    validation.set_required_spec_claims(&required);

    Ok(Self { keys, validation })
  }

  fn key_for(&self, token: &str) -> Result<&DecodingKey, VerifyError> {
    match &self.keys {
      Keys::Single(key) => Ok(key),
      Keys::ByKid(keys) => {
        let header = decode_header(token).map_err(|_| VerifyError::Malformed)?;
        let kid = header
          .kid
          .ok_or_else(|| VerifyError::Rejected("token has no kid".into()))?;
        // Config table keys arrive lowercased.
        keys
          .get(&kid.to_lowercase())
          .ok_or_else(|| VerifyError::Rejected(format!("unknown kid {kid:?}")))
      }
    }
  }
}

impl IdentityVerifier for JwtVerifier {
  fn verify(&self, token: &str) -> Result<UserId, VerifyError> {
    let key = self.key_for(token)?;
    let data = decode::<Claims>(token, key, &self.validation).map_err(|e| match e.kind() {
      ErrorKind::ExpiredSignature => VerifyError::Expired,
      ErrorKind::InvalidToken
      | ErrorKind::Base64(_)
      | ErrorKind::Json(_)
      | ErrorKind::Utf8(_) => VerifyError::Malformed,
      _ => VerifyError::Rejected(e.to_string()),
    })?;

    if data.claims.sub.is_empty() {
      return Err(VerifyError::MissingSubject);
    }
    Ok(UserId::from(data.claims.sub))
  }
}

fn is_hmac(algorithm: Algorithm) -> bool {
  matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

fn public_key(algorithm: Algorithm, pem: &[u8]) -> Result<DecodingKey> {
  let key = match algorithm {
    Algorithm::RS256
    | Algorithm::RS384
    | Algorithm::RS512
    | Algorithm::PS256
    | Algorithm::PS384
    | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem)?,
    Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem)?,
    Algorithm::EdDSA => DecodingKey::from_ed_pem(pem)?,
    Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
      DecodingKey::from_secret(pem)
    }
  };
  Ok(key)
}
