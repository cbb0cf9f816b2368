use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload issued by the identity platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,              // user ID
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub iat: usize,             // issued at (unix timestamp)
    pub exp: usize,             // expires at (unix timestamp)
    pub iss: String,            // issuer
    pub aud: String,            // audience
}
