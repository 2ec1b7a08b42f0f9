use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use common::{
    error::{AppError, Res},
    jwt::{self, AdminClaims, ClaimsSpec},
};
use db::dtos::admin::SessionCreateRequest;

use crate::{dtos::admin::LoginRequest, state::AdminState, store::AdminStore};

/// A freshly opened admin session.
#[derive(Debug)]
pub struct IssuedSession {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

/// Hashes a password into an Argon2 PHC string with a random salt.
pub fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verifies `password` against a stored PHC string.
///
/// Without a stored hash the password is still run through Argon2 so an
/// unknown username costs as much as a wrong password.
fn password_matches(stored_hash: Option<&str>, password: &str) -> Res<bool> {
    let Some(stored_hash) = stored_hash else {
        hash_password(password)?;
        return Ok(false);
    };

    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is malformed: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Authenticates an admin and opens a session.
///
/// An unknown username and a wrong password produce the same error.
/// Sessions that already ran out are deleted on the way.
pub async fn login(
    state: &AdminState,
    login_data: &LoginRequest,
    now: DateTime<Utc>,
) -> Res<IssuedSession> {
    match state.store.purge_expired_sessions(now).await {
        Ok(0) => {}
        Ok(purged) => log::debug!("Purged {} expired admin sessions", purged),
        Err(e) => log::warn!("Failed to purge expired admin sessions: {}", e),
    }

    let profile = state.store.find_profile(&login_data.username).await?;
    let stored_hash = profile.as_ref().map(|p| p.password_hash.as_str());
    if !password_matches(stored_hash, &login_data.password)? {
        return Err(invalid_credentials());
    }
    let profile = profile.ok_or_else(invalid_credentials)?;

    let expires_at = now
        .checked_add_signed(Duration::hours(state.jwt_config.expiration_hours))
        .ok_or_else(|| AppError::Internal("Session expiry out of range".to_string()))?;

    let session = state
        .store
        .create_session(SessionCreateRequest {
            username: profile.username.clone(),
            expires_at,
        })
        .await?;

    let token = jwt::generate_jwt(
        ClaimsSpec {
            session_id: session.id,
            username: session.username.clone(),
        },
        &state.jwt_config,
    )?;

    log::info!("Admin {} logged in", session.username);
    Ok(IssuedSession {
        token,
        username: session.username,
        expires_at: session.expires_at,
    })
}

/// Checks a validated token against the session table.
pub async fn authorize(state: &AdminState, claims: &AdminClaims, now: DateTime<Utc>) -> Res<()> {
    match state.store.active_session(claims.session_id, now).await? {
        Some(session) if session.username == claims.username => Ok(()),
        _ => Err(AppError::Unauthorized(
            "Invalid or expired session".to_string(),
        )),
    }
}

pub async fn logout(state: &AdminState, claims: &AdminClaims) -> Res<()> {
    if state.store.end_session(claims.session_id).await? {
        log::info!("Admin {} logged out", claims.username);
    }
    Ok(())
}

/// Creates the admin profile, or resets its password when it exists.
pub async fn ensure_admin(store: &dyn AdminStore, username: &str, password: &str) -> Res<()> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Admin username and password must not be empty".to_string(),
        ));
    }
    let password_hash = hash_password(password)?;
    store.save_profile(username, &password_hash).await?;
    log::info!("Admin profile {} is ready", username);
    Ok(())
}
