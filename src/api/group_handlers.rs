//! Group, message and join-request handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::models::{
    required_text, AcceptJoinRequest, ApiJson, ApiPath, CreateGroupRequest, SendMessageRequest,
};
use crate::auth::CurrentSession;
use crate::authz;
use crate::error::AppError;
use crate::storage::{groups, messages, users};
use crate::views::MessagesPage;
use crate::AppState;

/// Groups whose name contains the path segment
#[utoipa::path(
    get,
    path = "/groups/{group_name}",
    tag = "Groups",
    params(("group_name" = String, Path, description = "Substring to look for")),
    responses((status = 200, description = "Matching groups"))
)]
pub async fn find_groups(
    State(state): State<Arc<AppState>>,
    _session: CurrentSession,
    ApiPath(group_name): ApiPath<String>,
) -> Result<Json<Vec<groups::Model>>, AppError> {
    let found = groups::find_by_name_pattern(&state.db, &group_name).await?;
    Ok(Json(found))
}

#[utoipa::path(
    get,
    path = "/groups",
    tag = "Groups",
    responses((status = 200, description = "All groups"))
)]
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    _session: CurrentSession,
) -> Result<Json<Vec<groups::Model>>, AppError> {
    Ok(Json(groups::find_all(&state.db).await?))
}

/// Create a group owned by the caller
///
/// The creator does not join automatically; that takes a `PUT /user`.
#[utoipa::path(
    post,
    path = "/groups/create",
    tag = "Groups",
    request_body = CreateGroupRequest,
    responses((status = 200, description = "The created group"))
)]
pub async fn create_group(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiJson(request): ApiJson<CreateGroupRequest>,
) -> Result<Json<groups::Model>, AppError> {
    let group_name = required_text("groupName", &request.group_name)?;
    let group = groups::create(
        &state.db,
        group_name,
        session.identity.user_id,
        state.clock.now(),
    )
    .await?;

    info!(group_id = group.id, creator_id = group.creator_id, "Group created");
    Ok(Json(group))
}

/// Inbox page for the caller
#[utoipa::path(
    get,
    path = "/messages",
    tag = "Messages",
    responses((status = 200, description = "Rendered inbox", body = String, content_type = "text/html"))
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
) -> Result<Html<String>, AppError> {
    let inbox = messages::find_for_recipient(&state.db, session.identity.user_id).await?;
    let user_names = users::list_names(&state.db).await?;

    let page = MessagesPage {
        viewer: &session.identity,
        messages: &inbox,
        user_names: &user_names,
    };
    Ok(Html(page.render()))
}

#[utoipa::path(
    post,
    path = "/messages",
    tag = "Messages",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Sent"),
        (status = 404, description = "Recipient does not exist"),
    )
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> Result<StatusCode, AppError> {
    users::find_by_id(&state.db, request.recipient_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", request.recipient_id)))?;

    let message = messages::create(
        &state.db,
        messages::NewMessage {
            subject: request.subject,
            body: request.body,
            kind: request.kind,
            sender_id: session.identity.user_id,
            sender_name: session.identity.name.clone(),
            recipient_id: request.recipient_id,
        },
        state.clock.now(),
    )
    .await?;

    info!(
        message_id = message.id,
        kind = %message.kind,
        sender_id = message.sender_id,
        recipient_id = message.recipient_id,
        "Message sent"
    );
    Ok(StatusCode::OK)
}

/// Delete a message the caller sent or received
#[utoipa::path(
    delete,
    path = "/message/delete/{id}",
    tag = "Messages",
    params(("id" = i32, Path, description = "Message id")),
    responses(
        (status = 200, description = "Deleted, or already gone"),
        (status = 403, description = "Caller is neither sender nor recipient"),
    )
)]
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, AppError> {
    let Some(message) = messages::find_by_id(&state.db, id).await? else {
        return Ok(StatusCode::OK);
    };

    authz::ensure_participant(&message, &session.identity)?;

    messages::delete(&state.db, id).await?;
    info!(message_id = id, user_id = session.identity.user_id, "Message deleted");
    Ok(StatusCode::OK)
}

/// Move the sender of a join request into the caller's group
#[utoipa::path(
    put,
    path = "/request/join/accept",
    tag = "Messages",
    request_body = AcceptJoinRequest,
    responses(
        (status = 200, description = "Sender joined the caller's group"),
        (status = 400, description = "Not a join request, or caller has no group"),
        (status = 403, description = "Caller is not the recipient"),
        (status = 404, description = "No such message"),
    )
)]
pub async fn accept_join_request(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiJson(request): ApiJson<AcceptJoinRequest>,
) -> Result<StatusCode, AppError> {
    let message = messages::find_by_id(&state.db, request.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Message {}", request.id)))?;

    authz::ensure_recipient(&message, &session.identity)?;
    if message.kind != messages::JOIN_REQUEST {
        warn!(
            message_id = message.id,
            kind = %message.kind,
            "Join request declined: message is not a join request"
        );
        return Err(AppError::InvalidRequest(format!(
            "Message {} is not a join request",
            message.id
        )));
    }

    let group_id = authz::require_group(&session.identity)?;
    let sender = users::update(
        &state.db,
        message.sender_id,
        users::UserChanges {
            name: None,
            group_id: Some(Some(group_id)),
        },
        state.clock.now(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {}", message.sender_id)))?;

    let refreshed = state.sessions.refresh_user(&sender);
    info!(
        message_id = message.id,
        sender_id = sender.id,
        group_id,
        refreshed,
        "Join request accepted"
    );
    Ok(StatusCode::OK)
}
