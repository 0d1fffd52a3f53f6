//! The payload handed from the create path to the worker.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use estatehub_entity::listing::Listing;

/// The listing fields an announcement needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListingEvent {
    pub listing_id: Uuid,
    pub title: String,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub price: Option<f64>,
}

impl From<&Listing> for NewListingEvent {
    fn from(listing: &Listing) -> Self {
        Self {
            listing_id: listing.id,
            title: listing.title.clone(),
            city: listing.city.clone(),
            property_type: listing.property_type.clone(),
            listing_type: listing.listing_type.map(|t| t.to_string()),
            price: listing.price,
        }
    }
}
