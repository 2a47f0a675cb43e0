//! API module - HTTP routes, handlers, and models

pub mod bill_handlers;
pub mod chore_handlers;
pub mod grocery_handlers;
pub mod group_handlers;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session_handlers;
