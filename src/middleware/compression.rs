//! Response compression middleware.
//!
//! Thin wrapper over `tower-http`'s gzip support; the codec itself lives
//! there. Declare this unit last so it sits innermost: every other unit
//! then observes headers and status before the body is encoded.

use tower_http::compression::CompressionLayer;

/// The gzip layer backing [`Middleware::compression`](super::Middleware::compression).
pub(crate) fn layer() -> CompressionLayer {
    CompressionLayer::new()
}
