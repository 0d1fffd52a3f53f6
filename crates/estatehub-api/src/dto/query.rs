//! `GET /listings` query parameters.

use serde::Deserialize;
use uuid::Uuid;

use estatehub_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};
use estatehub_core::{AppError, AppResult};
use estatehub_entity::listing::{CountFilter, ListingQuery, NumericRange, parse_feature_list};

/// Raw filter parameters. Numbers arrive as text and are coerced here;
/// values that do not parse are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQueryParams {
    pub user_id: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "listingType")]
    pub listing_type: Option<String>,
    #[serde(alias = "sellerType")]
    pub seller_type: Option<String>,
    #[serde(rename = "propertyType", alias = "property_type")]
    pub property_type: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    pub bedrooms: Option<String>,
    #[serde(rename = "minBedrooms")]
    pub min_bedrooms: Option<String>,
    #[serde(rename = "maxBedrooms")]
    pub max_bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    #[serde(rename = "minBathrooms")]
    pub min_bathrooms: Option<String>,
    #[serde(rename = "maxBathrooms")]
    pub max_bathrooms: Option<String>,
    pub features: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn number(value: &Option<String>) -> Option<f64> {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|f| f.is_finite())
}

fn count(value: &Option<String>) -> Option<i32> {
    number(value).map(|f| f.trunc() as i32)
}

fn positive(value: &Option<String>, default: u64) -> u64 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

impl ListingQueryParams {
    /// Build the store query.
    pub fn into_query(self) -> AppResult<ListingQuery> {
        let user_id = match non_blank(self.user_id.clone()) {
            Some(raw) => Some(
                Uuid::parse_str(&raw)
                    .map_err(|_| AppError::validation(format!("Invalid user_id: {raw}")))?,
            ),
            None => None,
        };

        Ok(ListingQuery {
            user_id,
            price: NumericRange {
                min: number(&self.min_price),
                max: number(&self.max_price),
            },
            bedrooms: CountFilter {
                exact: count(&self.bedrooms),
                min: count(&self.min_bedrooms),
                max: count(&self.max_bedrooms),
            },
            bathrooms: CountFilter {
                exact: count(&self.bathrooms),
                min: count(&self.min_bathrooms),
                max: count(&self.max_bathrooms),
            },
            page: PageRequest::new(
                positive(&self.page, 1),
                positive(&self.limit, DEFAULT_PAGE_SIZE),
            ),
            features: self
                .features
                .as_deref()
                .map(parse_feature_list)
                .unwrap_or_default(),
            status: non_blank(self.status),
            listing_type: non_blank(self.listing_type),
            seller_type: non_blank(self.seller_type),
            property_type: non_blank(self.property_type),
            city: non_blank(self.city),
        })
    }
}
