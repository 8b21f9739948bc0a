//! Resource ownership checks

use crate::error::AppError;
use uuid::Uuid;

/// Mutation being attempted on an owned article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedAction {
    Update,
    Delete,
}

impl OwnedAction {
    fn verb(self) -> &'static str {
        match self {
            OwnedAction::Update => "update",
            OwnedAction::Delete => "delete",
        }
    }
}

/// Reject with `Forbidden` unless the acting user owns the resource
pub fn assert_owner(
    resource_owner_id: Uuid,
    acting_user_id: Uuid,
    action: OwnedAction,
) -> Result<(), AppError> {
    if resource_owner_id != acting_user_id {
        tracing::warn!(
            owner = %resource_owner_id,
            actor = %acting_user_id,
            action = action.verb(),
            "Ownership check failed"
        );
        return Err(AppError::Forbidden(format!(
            "You can only {} your own articles",
            action.verb()
        )));
    }
    Ok(())
}
