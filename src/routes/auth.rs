use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth::extractor::AuthUser;
use crate::auth::{password, sanitize, token};
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn session_cookie(token: &str) -> CookieJar {
    let cookie = Cookie::build(("auth_token", token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(token::SESSION_TTL_HOURS))
        .build();

    CookieJar::new().add(cookie)
}

fn clear_session_cookie() -> CookieJar {
    let cookie = Cookie::build(("auth_token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(cookie)
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    if state.login_limiter.check(&req.email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let user = db::users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;

    if !valid {
        state.login_limiter.record_failure(&req.email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let session = token::issue_session(&user.email, &state.config.session_secret)
        .map_err(|e| AppError::Internal(format!("Failed to issue session token: {e}")))?;

    let jar = session_cookie(&session);
    Ok((jar, Json(SessionResponse { token: session })))
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        clear_session_cookie(),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

/// Request step of the reset flow: sanitize, look up, issue a signed token
/// and mail the link. The send happens inline so a transport failure
/// surfaces to the caller as a 500 instead of vanishing in a background
/// task; the user retries by submitting the form again.
pub async fn request_password_reset(
    State(state): State<SharedState>,
    Json(req): Json<RequestResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = sanitize::strip_markup(&req.email);
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    if state.reset_limiter.check(&email).is_err() {
        return Err(AppError::RateLimited(
            "Too many reset requests. Please try again later.".to_string(),
        ));
    }

    let Some(user) = db::users::find_by_email(&state.pool, &email).await? else {
        if state.config.reveal_unknown_email {
            return Err(AppError::Unauthorized("Email not recognized".to_string()));
        }
        // Hardened mode: indistinguishable from the hit case.
        return Ok(Json(MessageResponse {
            message: "If that email is registered, a reset link has been sent.".to_string(),
        }));
    };

    let reset = token::issue_reset(&user.email, &state.config.reset_secret)
        .map_err(|e| AppError::Internal(format!("Failed to issue reset token: {e}")))?;
    let reset_url = format!("{}/reset-password?token={reset}", state.config.frontend_url);

    match &state.system_mailer {
        Some(mailer) => mailer
            .send_password_reset(&user.email, &reset_url)
            .await
            .map_err(AppError::Internal)?,
        None => tracing::warn!("System SMTP not configured. Password reset link: {reset_url}"),
    }

    Ok(Json(MessageResponse {
        message: "A reset link has been sent to your email.".to_string(),
    }))
}

/// Confirm step: policy check, token verification, then a single UPDATE of
/// hash + updated_at keyed by email. Any verification failure answers with
/// one generic message so callers cannot tell expired from tampered.
pub async fn reset_password(
    State(state): State<SharedState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    // Passwords are never rendered, but the same markup strip runs anyway.
    let new_password = sanitize::strip_markup(&req.password);
    if new_password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let email = token::verify_reset(&req.token, &state.config.reset_secret)
        .map_err(|_| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

    // The account could have been deleted between issue and confirm.
    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Email not recognized".to_string()))?;

    let pw_hash = password::hash(&new_password).map_err(AppError::Internal)?;
    db::users::update_password(&state.pool, &user.email, &pw_hash).await?;

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}

pub async fn protected(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let user = db::users::find_by_email(&state.pool, &auth.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Email not recognized".to_string()))?;

    Ok(Json(json!({
        "message": "You have access to this protected resource",
        "user": { "email": user.email, "name": user.name },
    })))
}
