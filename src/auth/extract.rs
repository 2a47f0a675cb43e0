//! Extractor that requires an authenticated session

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::SessionIdentity;
use crate::error::AppError;
use crate::AppState;

/// The caller's live session; rejects with 401 when absent or expired
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub id: Uuid,
    pub identity: SessionIdentity,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let id = state
            .sessions
            .session_id(&parts.headers)
            .ok_or(AppError::Unauthenticated)?;
        let identity = state.sessions.get(&id).ok_or(AppError::Unauthenticated)?;

        Ok(Self { id, identity })
    }
}
