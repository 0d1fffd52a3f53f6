//! Listing type and status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use estatehub_core::AppError;

/// Whether a property is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "listing_type")]
pub enum ListingType {
    /// For sale.
    Sale,
    /// For rent.
    Rent,
}

impl ListingType {
    /// Return the type as stored (`Sale` or `Rent`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "Sale",
            Self::Rent => "Rent",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sale" => Ok(Self::Sale),
            "rent" => Ok(Self::Rent),
            _ => Err(AppError::validation(format!(
                "Invalid listing type: '{s}'. Expected one of: Sale, Rent"
            ))),
        }
    }
}

/// Visibility of a listing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "listing_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Visible.
    #[default]
    Active,
    /// Hidden.
    Inactive,
}

impl ListingStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::validation(format!(
                "Invalid status: '{s}'. Expected one of: active, inactive"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_type_parse() {
        assert_eq!("sale".parse::<ListingType>().unwrap(), ListingType::Sale);
        assert_eq!(" RENT ".parse::<ListingType>().unwrap(), ListingType::Rent);
        assert!("lease".parse::<ListingType>().is_err());
    }

    #[test]
    fn test_listing_type_wire_form() {
        assert_eq!(serde_json::to_string(&ListingType::Rent).unwrap(), "\"Rent\"");
        assert_eq!(serde_json::to_string(&ListingStatus::Inactive).unwrap(), "\"inactive\"");
    }
}
