//! Ownership rules for events and everything hanging off them.
//!
//! Ownership is defined at the event level only. An authorization is
//! accessible exactly when its parent event is.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The authenticated caller, as decoded from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Admins see everything; everyone else sees what they own.
    pub fn can_access_event(&self, event_owner_id: DbId) -> bool {
        self.role.is_admin() || self.user_id == event_owner_id
    }

    /// Owner filter to apply when listing events: `None` means unrestricted.
    pub fn event_owner_filter(&self) -> Option<DbId> {
        if self.role.is_admin() {
            None
        } else {
            Some(self.user_id)
        }
    }
}

/// Fail with [`CoreError::Forbidden`] unless `principal` may act on an event
/// owned by `event_owner_id`.
pub fn ensure_event_access(principal: &Principal, event_owner_id: DbId) -> Result<(), CoreError> {
    if principal.can_access_event(event_owner_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Action not allowed".into()))
    }
}
