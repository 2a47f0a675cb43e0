//! Grocery handlers
//!
//! The grocery list is shared: any member of the row's group may edit or
//! delete an item.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::models::{
    required_text, AddGroceryRequest, ApiJson, ApiPath, EditGroceryRequest,
};
use crate::auth::CurrentSession;
use crate::authz;
use crate::error::AppError;
use crate::storage::groceries;
use crate::AppState;

fn check_quantity(quantity: i32) -> Result<i32, AppError> {
    if quantity < 1 {
        return Err(AppError::InvalidRequest(format!(
            "quantity must be at least 1, got {}",
            quantity
        )));
    }
    Ok(quantity)
}

#[utoipa::path(
    post,
    path = "/grocery/add",
    tag = "Groceries",
    request_body = AddGroceryRequest,
    responses(
        (status = 200, description = "Added"),
        (status = 400, description = "Invalid fields or caller has no group"),
    )
)]
pub async fn add_grocery(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiJson(request): ApiJson<AddGroceryRequest>,
) -> Result<StatusCode, AppError> {
    let group_id = authz::require_group(&session.identity)?;

    let grocery = groceries::create(
        &state.db,
        groceries::NewGrocery {
            grocery_name: required_text("groceryName", &request.grocery_name)?,
            quantity: check_quantity(request.quantity)?,
            user_id: session.identity.user_id,
            group_id,
        },
        state.clock.now(),
    )
    .await?;

    info!(grocery_id = grocery.id, group_id, "Grocery added");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    put,
    path = "/grocery/edit/{creator_id}/{grocery_id}",
    tag = "Groceries",
    request_body = EditGroceryRequest,
    params(
        ("creator_id" = i32, Path, description = "Unused"),
        ("grocery_id" = i32, Path, description = "Grocery id"),
    ),
    responses(
        (status = 200, description = "The updated grocery"),
        (status = 403, description = "Grocery belongs to another group"),
        (status = 404, description = "No such grocery"),
    )
)]
pub async fn edit_grocery(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiPath((_creator_id, grocery_id)): ApiPath<(i32, i32)>,
    ApiJson(request): ApiJson<EditGroceryRequest>,
) -> Result<Json<groceries::Model>, AppError> {
    let grocery = groceries::find_by_id(&state.db, grocery_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Grocery {}", grocery_id)))?;
    authz::ensure_group_member(&grocery, &session.identity)?;

    let changes = groceries::GroceryChanges {
        grocery_name: match request.grocery_name.as_deref() {
            Some(name) => Some(required_text("groceryName", name)?),
            None => None,
        },
        quantity: request.quantity.map(check_quantity).transpose()?,
        complete: request.complete,
    };

    let updated = groceries::update(&state.db, grocery, changes, state.clock.now()).await?;
    info!(grocery_id, user_id = session.identity.user_id, "Grocery updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/grocery/delete/{grocery_id}",
    tag = "Groceries",
    params(("grocery_id" = i32, Path, description = "Grocery id")),
    responses(
        (status = 200, description = "Deleted, or already gone"),
        (status = 403, description = "Grocery belongs to another group"),
    )
)]
pub async fn delete_grocery(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiPath(grocery_id): ApiPath<i32>,
) -> Result<StatusCode, AppError> {
    if let Some(grocery) = groceries::find_by_id(&state.db, grocery_id).await? {
        authz::ensure_group_member(&grocery, &session.identity)?;
        groceries::delete(&state.db, grocery_id).await?;
        info!(grocery_id, user_id = session.identity.user_id, "Grocery deleted");
    }
    Ok(StatusCode::OK)
}

/// Groceries of the caller's group
#[utoipa::path(
    get,
    path = "/groceries",
    tag = "Groceries",
    responses((status = 200, description = "The group's groceries"))
)]
pub async fn list_groceries(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
) -> Result<Json<Vec<groceries::Model>>, AppError> {
    let group_id = authz::require_group(&session.identity)?;
    Ok(Json(groceries::find_for_group(&state.db, group_id).await?))
}
