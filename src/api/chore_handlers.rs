//! Chore handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Weekday;
use std::sync::Arc;
use tracing::info;

use crate::api::models::{required_text, AddChoreRequest, ApiJson, ApiPath, EditChoreRequest};
use crate::auth::CurrentSession;
use crate::authz;
use crate::error::AppError;
use crate::rollover;
use crate::storage::chores;
use crate::AppState;

/// Store weekdays as the same three-letter form the rollover compares against
pub fn normalize_weekday(raw: &str) -> Result<String, AppError> {
    raw.trim()
        .parse::<Weekday>()
        .map(|day| day.to_string())
        .map_err(|_| AppError::InvalidRequest(format!("'{}' is not a weekday", raw)))
}

#[utoipa::path(
    post,
    path = "/chore/add",
    tag = "Chores",
    request_body = AddChoreRequest,
    responses(
        (status = 200, description = "Added"),
        (status = 400, description = "Invalid fields or caller has no group"),
    )
)]
pub async fn add_chore(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiJson(request): ApiJson<AddChoreRequest>,
) -> Result<StatusCode, AppError> {
    let group_id = authz::require_group(&session.identity)?;

    let chore = chores::create(
        &state.db,
        chores::NewChore {
            chore: required_text("chore", &request.chore)?,
            recur_date: normalize_weekday(&request.recur_date)?,
            user_id: session.identity.user_id,
            group_id,
        },
        state.clock.now(),
    )
    .await?;

    info!(chore_id = chore.id, group_id, recur_date = %chore.recur_date, "Chore added");
    Ok(StatusCode::OK)
}

/// Edit a chore the caller created, then run the recurrence sweep
///
/// The sweep covers every group, not only the caller's.
#[utoipa::path(
    put,
    path = "/chore/edit/{creator_id}/{chore_id}",
    tag = "Chores",
    request_body = EditChoreRequest,
    params(
        ("creator_id" = i32, Path, description = "Ignored; ownership comes from the stored chore"),
        ("chore_id" = i32, Path, description = "Chore id"),
    ),
    responses(
        (status = 200, description = "The chore as stored after the sweep"),
        (status = 403, description = "Caller did not create the chore"),
        (status = 404, description = "No such chore"),
    )
)]
pub async fn edit_chore(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiPath((_creator_id, chore_id)): ApiPath<(i32, i32)>,
    ApiJson(request): ApiJson<EditChoreRequest>,
) -> Result<Json<chores::Model>, AppError> {
    let not_found = || AppError::NotFound(format!("Chore {}", chore_id));

    let chore = chores::find_by_id(&state.db, chore_id)
        .await?
        .ok_or_else(not_found)?;
    authz::ensure_owner(&chore, &session.identity)?;

    let changes = chores::ChoreChanges {
        chore: match request.chore.as_deref() {
            Some(text) => Some(required_text("chore", text)?),
            None => None,
        },
        recur_date: match request.recur_date.as_deref() {
            Some(day) => Some(normalize_weekday(day)?),
            None => None,
        },
        complete: request.complete,
    };

    chores::update(&state.db, chore, changes, state.clock.now()).await?;
    info!(chore_id, user_id = session.identity.user_id, "Chore updated");

    rollover::reset_stale_chores(&state).await?;

    let swept = chores::find_by_id(&state.db, chore_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(swept))
}

#[utoipa::path(
    delete,
    path = "/chore/delete/{chore_id}",
    tag = "Chores",
    params(("chore_id" = i32, Path, description = "Chore id")),
    responses(
        (status = 200, description = "Deleted, or already gone"),
        (status = 403, description = "Caller did not create the chore"),
    )
)]
pub async fn delete_chore(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiPath(chore_id): ApiPath<i32>,
) -> Result<StatusCode, AppError> {
    if let Some(chore) = chores::find_by_id(&state.db, chore_id).await? {
        authz::ensure_owner(&chore, &session.identity)?;
        chores::delete(&state.db, chore_id).await?;
        info!(chore_id, user_id = session.identity.user_id, "Chore deleted");
    }
    Ok(StatusCode::OK)
}

/// Chores of the caller's group
#[utoipa::path(
    get,
    path = "/chores",
    tag = "Chores",
    responses((status = 200, description = "The group's chores"))
)]
pub async fn list_chores(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
) -> Result<Json<Vec<chores::Model>>, AppError> {
    let group_id = authz::require_group(&session.identity)?;
    Ok(Json(chores::find_for_group(&state.db, group_id).await?))
}
