//! Turning uploads and inline images into hosted URLs.

pub mod ingest;
pub mod inline;

pub use ingest::ImageIngestor;
