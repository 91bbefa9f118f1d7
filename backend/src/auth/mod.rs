use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::config::stage::Stage;

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub email: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct AuthError(pub anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::UNAUTHORIZED,
            format!("Unauthorized: {}", self.0),
        )
            .into_response()
    }
}

/// Bearer-token authentication. The fixture variant is an explicit provider
/// selected only in the local stage; the production path always validates the
/// identity provider's JWT.
pub enum Authenticator {
    Jwt { secret: String },
    Fixture { user_id: Uuid },
}

impl Authenticator {
    pub fn from_config(stage: Stage, jwt_secret: String) -> Self {
        match stage {
            Stage::Local => {
                let user_id = Uuid::nil();
                warn!(
                    %user_id,
                    "fixture authenticator enabled; every request authenticates as the fixture user"
                );
                Authenticator::Fixture { user_id }
            }
            Stage::Production => Authenticator::Jwt { secret: jwt_secret },
        }
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        match self {
            Authenticator::Fixture { user_id } => Ok(AuthUser {
                user_id: *user_id,
                email: None,
            }),
            Authenticator::Jwt { secret } => {
                let auth_header = headers
                    .get(AUTHORIZATION)
                    .ok_or_else(|| anyhow::anyhow!("Missing Authorization header"))?;

                let auth_str = auth_header
                    .to_str()
                    .map_err(|_| anyhow::anyhow!("Invalid Authorization header"))?;

                let token = auth_str
                    .strip_prefix("Bearer ")
                    .ok_or_else(|| anyhow::anyhow!("Invalid Authorization header format"))?;

                let claims = validate_identity_jwt(secret, token)?;

                let user_id = Uuid::parse_str(&claims.sub)
                    .map_err(|_| anyhow::anyhow!("Invalid user ID in token"))?;

                Ok(AuthUser {
                    user_id,
                    email: claims.email,
                })
            }
        }
    }
}

pub fn validate_identity_jwt(secret: &str, token: &str) -> Result<IdentityClaims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<IdentityClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests;
