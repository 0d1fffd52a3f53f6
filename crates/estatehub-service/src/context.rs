//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use estatehub_core::{AppError, AppResult};
use estatehub_entity::user::{UserRole, UserSummary};

/// Context for the current authenticated request.
///
/// Extracted by the API layer and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role as resolved at authentication time.
    pub role: UserRole,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Build a context for an authenticated identity.
    pub fn new(identity: UserSummary) -> Self {
        Self {
            user_id: identity.id,
            role: identity.role,
            name: identity.name,
            email: identity.email,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail unless the current user is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization("Not authorized as admin"))
        }
    }

    /// Fail unless the current user is `owner_id` or an admin.
    pub fn require_owner_or_admin(&self, owner_id: Uuid, message: &str) -> AppResult<()> {
        if self.user_id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization(message))
        }
    }
}
