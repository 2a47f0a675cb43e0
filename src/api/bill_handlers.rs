//! Bill handlers

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::models::{required_text, ApiJson, ApiPath, BillListQuery, EditBillRequest};
use crate::auth::CurrentSession;
use crate::authz;
use crate::error::AppError;
use crate::storage::bills;
use crate::upload::{self, url::thumbnail_url, UploadedFile};
use crate::AppState;

fn parse_amount(raw: &str) -> Result<f64, AppError> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidRequest(format!("'{}' is not a valid amount", raw)))?;
    check_amount(amount)
}

fn check_amount(amount: f64) -> Result<f64, AppError> {
    if !amount.is_finite() {
        return Err(AppError::InvalidRequest("amount must be a finite number".to_string()));
    }
    Ok(amount)
}

/// Fields collected from the `/bill/add` form
#[derive(Default)]
struct BillForm {
    bill_name: Option<String>,
    amount: Option<String>,
    month: Option<String>,
    image: Option<UploadedFile>,
}

impl BillForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = BillForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await?;
                    // browsers send an empty part when no file is picked
                    if !file_name.is_empty() && !data.is_empty() {
                        form.image = Some(UploadedFile {
                            file_name,
                            content_type,
                            data,
                        });
                    }
                }
                "billName" => form.bill_name = Some(field.text().await?),
                "amount" => form.amount = Some(field.text().await?),
                "month" => form.month = Some(field.text().await?),
                other => debug!(field = other, "Ignoring bill form field"),
            }
        }

        Ok(form)
    }
}

/// Record a bill for the caller's group, with an optional attachment
#[utoipa::path(
    post,
    path = "/bill/add",
    tag = "Bills",
    request_body(content = AddBillForm, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Created; redirect to /home"),
        (status = 400, description = "Missing fields, no group, or attachment refused"),
        (status = 502, description = "Asset host failed"),
    )
)]
pub async fn add_bill(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let group_id = authz::require_group(&session.identity)?;
    let form = BillForm::read(multipart).await?;

    let bill_name = required_text("billName", form.bill_name.as_deref().unwrap_or_default())?;
    let amount = parse_amount(form.amount.as_deref().unwrap_or_default())?;
    let month = required_text("month", form.month.as_deref().unwrap_or_default())?;

    let (file_url, thumb_url) = match form.image {
        Some(file) => {
            upload::check_constraints(&state.settings.upload, &file)?;
            let asset = state.uploader.upload(file).await?;
            let thumb = thumbnail_url(&asset.url);
            (asset.url, thumb)
        }
        None => (String::new(), String::new()),
    };

    let bill = bills::create(
        &state.db,
        bills::NewBill {
            bill_name,
            amount,
            user_id: session.identity.user_id,
            group_id,
            file_url,
            thumb_url,
            month,
            year: state.clock.current_year(),
        },
        state.clock.now(),
    )
    .await?;

    info!(
        bill_id = bill.id,
        group_id,
        attachment = !bill.file_url.is_empty(),
        "Bill added"
    );
    Ok(Redirect::to("/home"))
}

/// Edit a bill the caller created
#[utoipa::path(
    put,
    path = "/bill/edit/{creator_id}/{bill_id}",
    tag = "Bills",
    request_body = EditBillRequest,
    params(
        ("creator_id" = i32, Path, description = "Ignored; ownership comes from the stored bill"),
        ("bill_id" = i32, Path, description = "Bill id"),
    ),
    responses(
        (status = 200, description = "The updated bill"),
        (status = 403, description = "Caller did not create the bill"),
        (status = 404, description = "No such bill"),
    )
)]
pub async fn edit_bill(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiPath((creator_id, bill_id)): ApiPath<(i32, i32)>,
    ApiJson(request): ApiJson<EditBillRequest>,
) -> Result<Json<bills::Model>, AppError> {
    let bill = bills::find_by_id(&state.db, bill_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Bill {}", bill_id)))?;
    authz::ensure_owner(&bill, &session.identity)?;
    if creator_id != bill.user_id {
        debug!(bill_id, creator_id, owner_id = bill.user_id, "Path creator id does not match owner");
    }

    let changes = bills::BillChanges {
        bill_name: match request.bill_name.as_deref() {
            Some(name) => Some(required_text("billName", name)?),
            None => None,
        },
        amount: request.amount.map(check_amount).transpose()?,
        month: match request.month.as_deref() {
            Some(month) => Some(required_text("month", month)?),
            None => None,
        },
        complete: request.complete,
    };

    let updated = bills::update(&state.db, bill, changes, state.clock.now()).await?;
    info!(bill_id, user_id = session.identity.user_id, "Bill updated");
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/bill/delete/{bill_id}",
    tag = "Bills",
    params(("bill_id" = i32, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Deleted, or already gone"),
        (status = 403, description = "Caller did not create the bill"),
    )
)]
pub async fn delete_bill(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    ApiPath(bill_id): ApiPath<i32>,
) -> Result<StatusCode, AppError> {
    if let Some(bill) = bills::find_by_id(&state.db, bill_id).await? {
        authz::ensure_owner(&bill, &session.identity)?;
        bills::delete(&state.db, bill_id).await?;
        info!(bill_id, user_id = session.identity.user_id, "Bill deleted");
    }
    Ok(StatusCode::OK)
}

/// Bills of the caller's group
#[utoipa::path(
    get,
    path = "/bills",
    tag = "Bills",
    params(BillListQuery),
    responses((status = 200, description = "The group's bills"))
)]
pub async fn list_bills(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Query(query): Query<BillListQuery>,
) -> Result<Json<Vec<bills::Model>>, AppError> {
    let group_id = authz::require_group(&session.identity)?;
    let found =
        bills::find_for_group(&state.db, group_id, query.month.as_deref(), query.year).await?;
    Ok(Json(found))
}
