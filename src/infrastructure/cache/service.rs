//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value cache for serialized response DTOs.
///
/// Implementations must be thread-safe and must not disrupt requests: a cache
/// failure degrades to a database lookup.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached value for `key`.
    ///
    /// `Ok(None)` on miss and on backend errors (fail-open).
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`. `ttl_seconds = None` uses the configured default.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes one key.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Removes every key starting with `prefix`.
    ///
    /// Used to drop all cached pages of a list at once.
    async fn invalidate_prefix(&self, prefix: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
