//! Household API
//!
//! Route layer of a household-management application: accounts and sessions,
//! groups and join requests, messages, and shared bills, groceries and chores.

pub mod api;
pub mod auth;
pub mod authz;
pub mod clock;
pub mod config;
pub mod error;
pub mod middleware;
pub mod rollover;
pub mod storage;
pub mod upload;
pub mod views;

pub use error::{AppError, Result};

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use auth::{PasswordService, SessionStore};
use clock::Clock;
use upload::AssetUploader;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<crate::config::Settings>,
    pub db: DatabaseConnection,
    pub sessions: Arc<SessionStore>,
    pub passwords: PasswordService,
    pub uploader: Arc<dyn AssetUploader>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Assemble state from settings and already-built collaborators
    pub fn new(
        settings: crate::config::Settings,
        db: DatabaseConnection,
        uploader: Arc<dyn AssetUploader>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let sessions = Arc::new(SessionStore::new(&settings.session));
        let passwords = PasswordService::new(&settings.auth)?;

        Ok(Self {
            settings: Arc::new(settings),
            db,
            sessions,
            passwords,
            uploader,
            clock,
        })
    }
}
