//! Listing domain entities.

pub mod kind;
pub mod model;
pub mod query;

pub use kind::{ListingStatus, ListingType};
pub use model::{Listing, ListingPatch, NewListing};
pub use query::{CountFilter, ListingQuery, NumericRange, parse_feature_list};
