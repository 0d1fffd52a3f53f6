//! Composable listing filter.
//!
//! The same [`ListingQuery`] drives both the SQL builder in the database
//! crate and the in-memory store through [`ListingQuery::matches`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use estatehub_core::types::PageRequest;

use super::model::Listing;

/// Inclusive bounds on a numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    /// Whether either bound is set.
    pub fn is_bounded(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// A missing value only passes an unbounded range.
    pub fn contains(&self, value: Option<f64>) -> bool {
        if !self.is_bounded() {
            return true;
        }
        let Some(v) = value else {
            return false;
        };
        self.min.is_none_or(|min| v >= min) && self.max.is_none_or(|max| v <= max)
    }
}

/// Filter on a room count: an exact value, or a range. The exact value
/// wins when both are supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountFilter {
    pub exact: Option<i32>,
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl CountFilter {
    /// The bounds actually enforced, as `(min, max)`.
    pub fn bounds(&self) -> (Option<i32>, Option<i32>) {
        match self.exact {
            Some(n) => (Some(n), Some(n)),
            None => (self.min, self.max),
        }
    }

    /// Whether the filter constrains anything.
    pub fn is_active(&self) -> bool {
        self.exact.is_some() || self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, value: Option<i32>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(v) = value else {
            return false;
        };
        let (min, max) = self.bounds();
        min.is_none_or(|min| v >= min) && max.is_none_or(|max| v <= max)
    }
}

/// All listing predicates; every field is optional and they are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub user_id: Option<Uuid>,
    pub status: Option<String>,
    pub listing_type: Option<String>,
    pub seller_type: Option<String>,
    pub property_type: Option<String>,
    pub city: Option<String>,
    pub price: NumericRange,
    pub bedrooms: CountFilter,
    pub bathrooms: CountFilter,
    /// Tags the listing must all carry.
    pub features: Vec<String>,
    pub page: PageRequest,
}

impl ListingQuery {
    /// Evaluate every predicate against one listing.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.user_id.is_none_or(|id| listing.user_id == id)
            && self
                .status
                .as_deref()
                .is_none_or(|s| listing.status.as_str() == s)
            && eq_ignore_case(
                self.listing_type.as_deref(),
                listing.listing_type.map(|t| t.as_str()),
            )
            && eq_ignore_case(self.seller_type.as_deref(), listing.seller_type.as_deref())
            && eq_ignore_case(
                self.property_type.as_deref(),
                listing.property_type.as_deref(),
            )
            && eq_ignore_case(self.city.as_deref(), listing.city.as_deref())
            && self.price.contains(listing.price)
            && self.bedrooms.contains(listing.bedrooms)
            && self.bathrooms.contains(listing.bathrooms)
            && self
                .features
                .iter()
                .all(|wanted| listing.features.iter().any(|f| f == wanted))
    }
}

fn eq_ignore_case(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match (wanted, actual) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(w), Some(a)) => w.to_lowercase() == a.to_lowercase(),
    }
}

/// Split a comma-separated tag list, trimming and dropping empty entries.
pub fn parse_feature_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
