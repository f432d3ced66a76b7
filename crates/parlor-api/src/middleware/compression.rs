//! Response compression layer.

use tower_http::compression::CompressionLayer;

/// Builds a gzip compression layer. The default predicate skips image
/// bodies, so served profile images pass through untouched.
pub fn build_compression_layer() -> CompressionLayer {
    CompressionLayer::new()
}
