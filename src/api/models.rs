//! API request and response models

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    FromRequest, FromRequestParts,
};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;

/// JSON body extractor whose rejection is an [`AppError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Path extractor whose rejection is an [`AppError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Distinguishes an explicit `null` from a missing field
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Credentials posted to the login route
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// New account; the same body is replayed to the login route
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Where the client should go after logging in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Landing {
    /// The user already belongs to a group
    Home,
    /// The user must create or join a group first
    GroupJoin,
}

/// Patch applied to the session user's row
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// `null` leaves the current group
    #[serde(rename = "GroupId", default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub group_id: Option<Option<i32>>,
}

/// Client-side redirect instruction
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RedirectResponse {
    pub result: String,
    pub url: String,
}

impl RedirectResponse {
    pub fn home() -> Self {
        Self {
            result: "redirect".to_string(),
            url: "/home".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub group_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    /// `"join"` marks a group-join request
    #[serde(rename = "type", default = "default_message_type")]
    pub kind: String,
    #[serde(rename = "recepientId", alias = "recipientId")]
    pub recipient_id: i32,
}

fn default_message_type() -> String {
    "message".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AcceptJoinRequest {
    /// Id of the join-request message
    pub id: i32,
}

/// Multipart form posted to `/bill/add` (documentation only)
#[derive(Debug, Clone, ToSchema)]
pub struct AddBillForm {
    #[schema(rename = "billName")]
    pub bill_name: String,
    pub amount: f64,
    pub month: String,
    /// Optional scan or photo of the bill (jpg, png or pdf)
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditBillRequest {
    #[serde(default)]
    pub bill_name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub complete: Option<bool>,
}

/// Optional filters for the group's bill list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BillListQuery {
    /// Only bills for this month
    pub month: Option<String>,
    /// Only bills for this year
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddGroceryRequest {
    pub grocery_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditGroceryRequest {
    #[serde(default)]
    pub grocery_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub complete: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddChoreRequest {
    pub chore: String,
    /// Any weekday spelling ("Mon", "monday", ...)
    pub recur_date: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditChoreRequest {
    #[serde(default)]
    pub chore: Option<String>,
    #[serde(default)]
    pub recur_date: Option<String>,
    #[serde(default)]
    pub complete: Option<bool>,
}

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
}

/// Trimmed, non-empty text field
pub fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidRequest(format!("{} cannot be empty", field)));
    }
    Ok(value.to_string())
}
