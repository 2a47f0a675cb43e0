//! Chore recurrence reset
//!
//! The same sweep runs after every chore edit and, when configured, on a
//! fixed interval independent of any request.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::Result;
use crate::storage::chores;
use crate::AppState;

/// Mark incomplete every chore whose `recurDate` is not today; returns rows touched
pub async fn reset_stale_chores(state: &AppState) -> Result<u64> {
    let today = state.clock.weekday_abbrev();
    let reset = chores::reset_stale(&state.db, &today).await?;
    info!(today = %today, reset, "Chore recurrence sweep finished");
    Ok(reset)
}

/// Spawn the scheduled sweep; `None` when the interval is 0
pub fn spawn(state: Arc<AppState>, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        return None;
    }

    info!(interval_secs, "Starting scheduled chore rollover");
    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            if let Err(e) = reset_stale_chores(&state).await {
                error!(error = %e, "Scheduled chore rollover failed");
            }
        }
    }))
}
