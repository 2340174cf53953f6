//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Creates the rate limiter for the login endpoint.
///
/// # Limits
///
/// - **Rate**: one request replenished every 6 seconds
/// - **Burst**: 5 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Limits are applied per client IP taken from the socket peer address, so
/// the server must be started with connect info.
pub fn login_layer()
-> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(6)
            .burst_size(5)
            .finish()
            .expect("login rate limit quota is non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
