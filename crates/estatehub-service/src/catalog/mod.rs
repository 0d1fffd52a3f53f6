//! The marketing plan catalog.

pub mod service;

pub use service::PlanCatalogService;
