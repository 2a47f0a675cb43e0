//! Authorization checks shared by the mutation handlers
//!
//! Ownership always comes from the stored row, never from identifiers the
//! client puts in the path or body.

use tracing::warn;

use crate::auth::SessionIdentity;
use crate::error::{AppError, Result};
use crate::storage::messages;

/// A row created by one user inside one group
pub trait Owned {
    /// Resource name used in error messages and logs
    const RESOURCE: &'static str;

    fn id(&self) -> i32;
    fn owner_id(&self) -> i32;
    fn group_id(&self) -> i32;
}

/// Allow only the user who created `row`
pub fn ensure_owner<T: Owned>(row: &T, identity: &SessionIdentity) -> Result<()> {
    if row.owner_id() == identity.user_id {
        return Ok(());
    }

    warn!(
        resource = T::RESOURCE,
        id = row.id(),
        owner_id = row.owner_id(),
        user_id = identity.user_id,
        "Rejected mutation by non-owner"
    );
    Err(AppError::Forbidden(format!(
        "Only the creator may modify this {}",
        T::RESOURCE.to_lowercase()
    )))
}

/// Allow any member of the group `row` belongs to
pub fn ensure_group_member<T: Owned>(row: &T, identity: &SessionIdentity) -> Result<()> {
    if identity.group_id == Some(row.group_id()) {
        return Ok(());
    }

    warn!(
        resource = T::RESOURCE,
        id = row.id(),
        group_id = row.group_id(),
        user_id = identity.user_id,
        "Rejected mutation from outside the group"
    );
    Err(AppError::Forbidden(format!(
        "This {} belongs to another group",
        T::RESOURCE.to_lowercase()
    )))
}

/// Allow the sender or the recipient of `message`
pub fn ensure_participant(message: &messages::Model, identity: &SessionIdentity) -> Result<()> {
    let user_id = identity.user_id;
    if message.sender_id == user_id || message.recipient_id == user_id {
        return Ok(());
    }

    warn!(message_id = message.id, user_id, "Rejected message access by outsider");
    Err(AppError::Forbidden(
        "Only the sender or recipient may modify this message".to_string(),
    ))
}

/// Allow only the recipient of `message`
pub fn ensure_recipient(message: &messages::Model, identity: &SessionIdentity) -> Result<()> {
    if message.recipient_id == identity.user_id {
        return Ok(());
    }

    warn!(
        message_id = message.id,
        recipient_id = message.recipient_id,
        user_id = identity.user_id,
        "Rejected action by someone other than the recipient"
    );
    Err(AppError::Forbidden(
        "Only the recipient may act on this message".to_string(),
    ))
}

/// Group the acting user must belong to before creating group rows
pub fn require_group(identity: &SessionIdentity) -> Result<i32> {
    identity
        .group_id
        .ok_or_else(|| AppError::InvalidRequest("Join or create a group first".to_string()))
}
