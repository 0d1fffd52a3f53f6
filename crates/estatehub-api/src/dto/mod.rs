//! Request and response shapes.

pub mod coerce;
pub mod form;
pub mod listing;
pub mod query;
pub mod request;
pub mod response;
