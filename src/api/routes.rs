//! HTTP route definitions

use crate::api::models::*;
use crate::api::{
    bill_handlers, chore_handlers, grocery_handlers, group_handlers, handlers, session_handlers,
};
use crate::auth::SessionIdentity;
use crate::middleware::rate_limit::{limit_requests, AuthRateLimiter};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Household API",
        description = "Shared bills, groceries and chores for a household group.",
    ),
    paths(
        handlers::health_check,
        session_handlers::login,
        session_handlers::signup,
        session_handlers::current_user,
        session_handlers::update_user,
        session_handlers::logout,
        group_handlers::find_groups,
        group_handlers::list_groups,
        group_handlers::create_group,
        group_handlers::list_messages,
        group_handlers::send_message,
        group_handlers::delete_message,
        group_handlers::accept_join_request,
        bill_handlers::add_bill,
        bill_handlers::edit_bill,
        bill_handlers::delete_bill,
        bill_handlers::list_bills,
        grocery_handlers::add_grocery,
        grocery_handlers::edit_grocery,
        grocery_handlers::delete_grocery,
        grocery_handlers::list_groceries,
        chore_handlers::add_chore,
        chore_handlers::edit_chore,
        chore_handlers::delete_chore,
        chore_handlers::list_chores,
    ),
    components(schemas(
        LoginRequest,
        SignupRequest,
        Landing,
        UpdateUserRequest,
        RedirectResponse,
        SessionIdentity,
        CreateGroupRequest,
        SendMessageRequest,
        AcceptJoinRequest,
        AddBillForm,
        EditBillRequest,
        AddGroceryRequest,
        EditGroceryRequest,
        AddChoreRequest,
        EditChoreRequest,
        HealthResponse,
    )),
    tags(
        (name = "Session", description = "Accounts, login and logout"),
        (name = "Groups", description = "Household groups"),
        (name = "Messages", description = "Inbox and join requests"),
        (name = "Bills", description = "Shared bills"),
        (name = "Groceries", description = "Shared grocery list"),
        (name = "Chores", description = "Recurring chores"),
        (name = "Health", description = "Health and monitoring endpoints"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let settings = state.settings.clone();

    // Credential routes are the only ones rate limited
    let credential_routes = Router::new()
        .route("/user/login", post(session_handlers::login))
        .route("/new-user/signup", post(session_handlers::signup));

    let credential_routes = match AuthRateLimiter::from_config(&settings.rate_limit) {
        Some(limiter) => {
            credential_routes.route_layer(from_fn_with_state(Arc::new(limiter), limit_requests))
        }
        None => credential_routes,
    };

    Router::new()
        .merge(credential_routes)
        // Session
        .route(
            "/user",
            get(session_handlers::current_user).put(session_handlers::update_user),
        )
        .route("/logout", get(session_handlers::logout))
        // Messages and join requests
        .route(
            "/messages",
            get(group_handlers::list_messages).post(group_handlers::send_message),
        )
        .route("/message/delete/:id", delete(group_handlers::delete_message))
        .route("/request/join/accept", put(group_handlers::accept_join_request))
        // Groups
        .route("/groups", get(group_handlers::list_groups))
        .route("/groups/", get(group_handlers::list_groups))
        .route("/groups/create", post(group_handlers::create_group))
        .route("/groups/:group_name", get(group_handlers::find_groups))
        // Bills
        .route("/bills", get(bill_handlers::list_bills))
        .route("/bill/add", post(bill_handlers::add_bill))
        .route("/bill/edit/:creator_id/:bill_id", put(bill_handlers::edit_bill))
        .route("/bill/delete/:bill_id", delete(bill_handlers::delete_bill))
        // Groceries
        .route("/groceries", get(grocery_handlers::list_groceries))
        .route("/grocery/add", post(grocery_handlers::add_grocery))
        .route(
            "/grocery/edit/:creator_id/:grocery_id",
            put(grocery_handlers::edit_grocery),
        )
        .route(
            "/grocery/delete/:grocery_id",
            delete(grocery_handlers::delete_grocery),
        )
        // Chores
        .route("/chores", get(chore_handlers::list_chores))
        .route("/chore/add", post(chore_handlers::add_chore))
        .route(
            "/chore/edit/:creator_id/:chore_id",
            put(chore_handlers::edit_chore),
        )
        .route("/chore/delete/:chore_id", delete(chore_handlers::delete_chore))
        // Health check endpoint (no session required)
        .route("/health", get(handlers::health_check))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Front-end assets
        .fallback_service(ServeDir::new(&settings.server.static_dir))
        .layer(DefaultBodyLimit::max(settings.server.max_body_bytes))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
