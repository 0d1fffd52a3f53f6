//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account types. Owners and realtors publish listings; admins manage
/// the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Private property owner.
    Owner,
    /// Licensed agent.
    Realtor,
    /// Marketplace administrator.
    Admin,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether a user may pick this role at self-registration.
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, Self::Owner | Self::Realtor)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Realtor => "realtor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = estatehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "realtor" => Ok(Self::Realtor),
            "admin" => Ok(Self::Admin),
            _ => Err(estatehub_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: owner, realtor, admin"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("owner".parse::<UserRole>().unwrap(), UserRole::Owner);
        assert_eq!("REALTOR".parse::<UserRole>().unwrap(), UserRole::Realtor);
        assert!("landlord".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_self_assignable() {
        assert!(UserRole::Owner.is_self_assignable());
        assert!(UserRole::Realtor.is_self_assignable());
        assert!(!UserRole::Admin.is_self_assignable());
    }
}
