//! Image host implementations.

#[cfg(feature = "imgbb")]
pub mod imgbb;

#[cfg(feature = "imgbb")]
pub use imgbb::ImgbbClient;
