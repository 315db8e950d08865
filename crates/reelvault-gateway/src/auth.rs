//! Bearer-token verification.
//!
//! Tokens are minted by the external credential service; the gateway
//! validates the signature and expiry and trusts the claims. Handlers
//! that need a caller take [`AuthUser`] as an extractor.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use reelvault_core::{EntryOwner, UserId};
use serde::{Deserialize, Serialize};

/// JWT claims payload shared with the credential service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id, as a decimal string.
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Validates HS256 bearer tokens against the shared secret.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl AuthUser {
    pub fn owner(&self) -> EntryOwner {
        EntryOwner {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Authentication("missing authorization token".to_string()))?;

        let claims = state
            .jwt()
            .verify(token)
            .map_err(|e| ApiError::Authentication(format!("invalid token: {e}")))?;

        let id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| ApiError::Authentication("invalid token subject".to_string()))?;

        Ok(AuthUser {
            id,
            name: claims.name,
            email: claims.email,
        })
    }
}
