use std::sync::Arc;

use actix_session::Session;
use actix_web::{Responder, get, post, web};
use chrono::Utc;
use common::{
    error::{AppError, Res},
    http::Success,
    jwt::AdminClaims,
};

use crate::{
    dtos::admin::{LoginRequest, LoginResponse, SessionResponse},
    services,
    state::AdminState,
};

/// Authenticates an admin with username and password.
///
/// # Input
/// - `login_data`: JSON payload containing username and password
///
/// # Output
/// - Success: `{ "token", "username", "expires_at" }`. The token is also
///   kept in the cookie session, so browsers need not send it themselves
/// - Error: 401 Unauthorized with `Invalid credentials`
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/admin/auth/login', {
///   method: 'POST',
///   credentials: 'include',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({ username: 'admin', password: 'secret' })
/// });
///
/// if (response.status === 401) {
///   // show "Invalid credentials"
/// }
/// ```
#[post("/auth/login")]
pub async fn post_login(
    login_data: web::Json<LoginRequest>,
    state: web::Data<Arc<AdminState>>,
    session: Session,
) -> Res<impl Responder> {
    let issued = services::auth::login(&state, &login_data, Utc::now()).await?;

    session.renew();
    session
        .insert("token", &issued.token)
        .map_err(|e| AppError::Internal(format!("Failed to store session token: {}", e)))?;

    Success::ok(LoginResponse {
        token: issued.token,
        username: issued.username,
        expires_at: issued.expires_at,
    })
}

/// Ends the current admin session, server side and in the cookie.
#[post("/auth/logout")]
pub async fn post_logout(
    claims: web::ReqData<AdminClaims>,
    state: web::Data<Arc<AdminState>>,
    session: Session,
) -> Res<impl Responder> {
    services::auth::logout(&state, &claims).await?;
    session.purge();
    Success::no_content()
}

/// Returns the admin behind the current session.
///
/// # Output
/// - Success: `{ "session_id", "username" }`
/// - Error: 401 Unauthorized when the session is missing, expired or revoked
#[get("/auth/session")]
pub async fn get_session(claims: web::ReqData<AdminClaims>) -> Res<impl Responder> {
    let claims = claims.into_inner();
    Success::ok(SessionResponse {
        session_id: claims.session_id,
        username: claims.username,
    })
}
