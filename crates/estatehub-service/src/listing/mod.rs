//! Listing lifecycle.

pub mod service;

pub use service::ListingService;
