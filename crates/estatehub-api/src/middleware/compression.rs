//! Response compression layer.

use tower_http::compression::CompressionLayer;

/// Gzip for every response large enough to benefit.
pub fn build_compression_layer() -> CompressionLayer {
    CompressionLayer::new().gzip(true)
}
