use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AdminClaims {
    pub session_id: Uuid,
    pub username: String,
    pub exp: usize,
}

pub struct ClaimsSpec {
    pub session_id: Uuid,
    pub username: String,
}

/// Generates an admin session token for the given session row.
pub fn generate_jwt(spec: ClaimsSpec, config: &JwtConfig) -> Res<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.expiration_hours))
        .ok_or_else(|| AppError::Internal("Session expiry out of range".to_string()))?
        .timestamp();

    let claims = AdminClaims {
        session_id: spec.session_id,
        username: spec.username,
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Extracts claims object from JWT token.
/// Signature and expiry are both checked.
pub fn validate_jwt(token: &str, secret: &str) -> Res<AdminClaims> {
    let token_data = jsonwebtoken::decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired session".to_string()))?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "an-admin-session-secret-of-32-bytes!".to_string(),
            expiration_hours: 1,
        }
    }

    #[test]
    fn issued_token_carries_the_session() {
        let session_id = Uuid::new_v4();
        let token = generate_jwt(
            ClaimsSpec {
                session_id,
                username: "admin".to_string(),
            },
            &config(),
        )
        .unwrap();

        let claims = validate_jwt(&token, &config().secret).unwrap();
        assert_eq!(claims.session_id, session_id);
        assert_eq!(claims.username, "admin");
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = generate_jwt(
            ClaimsSpec {
                session_id: Uuid::new_v4(),
                username: "admin".to_string(),
            },
            &config(),
        )
        .unwrap();

        let err = validate_jwt(&token, "some-other-secret-that-is-long-enough").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = JwtConfig {
            expiration_hours: -2,
            ..config()
        };
        let token = generate_jwt(
            ClaimsSpec {
                session_id: Uuid::new_v4(),
                username: "admin".to_string(),
            },
            &expired,
        )
        .unwrap();

        assert!(validate_jwt(&token, &expired.secret).is_err());
    }
}
