use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

/// Verification material for tokens minted by the identity platform.
#[derive(Clone)]
pub struct JwtKeys {
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
        } = state.config.jwt.clone();
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
        }
    }
}

impl JwtKeys {
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

fn bearer_claims(parts: &Parts, keys: &JwtKeys) -> Result<Claims, (StatusCode, String)> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".to_string(),
        ))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header".to_string(),
        ))?;

    keys.verify(token).map_err(|_| {
        warn!("invalid or expired token");
        (
            StatusCode::UNAUTHORIZED,
            "Invalid or expired token".to_string(),
        )
    })
}

/// Any authenticated user.
pub struct AuthUser(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let claims = bearer_claims(parts, &keys)?;
        Ok(AuthUser(claims.sub))
    }
}

/// Authenticated user whose email address has been confirmed.
pub struct VerifiedUser(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for VerifiedUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let claims = bearer_claims(parts, &keys)?;
        if !claims.email_verified {
            warn!(user_id = %claims.sub, "email not verified");
            return Err((
                StatusCode::FORBIDDEN,
                "Email address not verified".to_string(),
            ));
        }
        Ok(VerifiedUser(claims.sub))
    }
}
