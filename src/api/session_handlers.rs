//! Account and session handlers

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::models::{
    required_text, ApiJson, Landing, LoginRequest, RedirectResponse, SignupRequest,
    UpdateUserRequest,
};
use crate::auth::{CurrentSession, SessionIdentity};
use crate::error::AppError;
use crate::storage::{groups, users};
use crate::AppState;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Verify credentials and start a session
#[utoipa::path(
    post,
    path = "/user/login",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; sets the session cookie", body = Landing),
        (status = 401, description = "Unknown email or wrong password"),
        (status = 429, description = "Too many attempts"),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&request.email);
    let user = users::find_by_email(&state.db, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !state
        .passwords
        .verify_blocking(request.password, user.password.clone())
        .await?
    {
        warn!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let identity = SessionIdentity::from(&user);
    let landing = if identity.group_id.is_some() {
        Landing::Home
    } else {
        Landing::GroupJoin
    };
    let session_id = state.sessions.create(identity);

    info!(user_id = user.id, landing = ?landing, "User logged in");

    Ok((
        [(SET_COOKIE, state.sessions.session_cookie(session_id))],
        Json(landing),
    ))
}

/// Create an account, then send the client on to the login route
///
/// The 307 makes the client replay the same body against `/user/login`.
#[utoipa::path(
    post,
    path = "/new-user/signup",
    tag = "Session",
    request_body = SignupRequest,
    responses(
        (status = 307, description = "Account created; re-post to /user/login"),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<Redirect, AppError> {
    let email = normalize_email(&request.email);
    if !email.contains('@') {
        return Err(AppError::InvalidRequest(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    let name = required_text("name", &request.name)?;
    if request.password.is_empty() {
        return Err(AppError::InvalidRequest("password cannot be empty".to_string()));
    }

    let already_registered =
        || AppError::Conflict(format!("Email '{}' is already registered", email));
    if users::email_exists(&state.db, &email).await? {
        return Err(already_registered());
    }

    let password_hash = state.passwords.hash_blocking(request.password).await?;
    // A concurrent signup can still win the race for the unique index
    let user = users::create(
        &state.db,
        users::NewUser {
            email: email.clone(),
            password_hash,
            name,
        },
        state.clock.now(),
    )
    .await
    .map_err(|err| {
        if users::is_duplicate_email(&err) {
            already_registered()
        } else {
            AppError::from(err)
        }
    })?;

    info!(user_id = user.id, "Account created");
    Ok(Redirect::temporary("/user/login"))
}

/// Identity attached to the caller's session
#[utoipa::path(
    get,
    path = "/user",
    tag = "Session",
    responses(
        (status = 200, description = "Current identity", body = SessionIdentity),
        (status = 401, description = "No session"),
    )
)]
pub async fn current_user(session: CurrentSession) -> Json<SessionIdentity> {
    Json(session.identity)
}

/// Patch the session user's row and refresh their sessions
#[utoipa::path(
    put,
    path = "/user",
    tag = "Session",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = RedirectResponse),
        (status = 404, description = "Target group does not exist"),
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<RedirectResponse>, AppError> {
    let name = match request.name.as_deref() {
        Some(name) => Some(required_text("name", name)?),
        None => None,
    };

    if let Some(Some(group_id)) = request.group_id {
        groups::find_by_id(&state.db, group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {}", group_id)))?;
    }

    let user_id = session.identity.user_id;
    let user = users::update(
        &state.db,
        user_id,
        users::UserChanges {
            name,
            group_id: request.group_id,
        },
        state.clock.now(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;

    let refreshed = state.sessions.refresh_user(&user);
    info!(user_id, group_id = ?user.group_id, refreshed, "User updated");

    Ok(Json(RedirectResponse::home()))
}

/// Drop the session and expire the cookie
#[utoipa::path(
    get,
    path = "/logout",
    tag = "Session",
    responses((status = 303, description = "Logged out; redirect to /"))
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: Option<CurrentSession>,
) -> impl IntoResponse {
    if let Some(session) = session {
        state.sessions.remove(&session.id);
        info!(user_id = session.identity.user_id, "User logged out");
    }

    (
        [(SET_COOKIE, state.sessions.expired_cookie())],
        Redirect::to("/"),
    )
}
