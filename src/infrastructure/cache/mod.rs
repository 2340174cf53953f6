//! Caching layer for entity responses and revoked tokens.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - No-op implementation for disabled caching
//!
//! and a [`TokenBlacklist`] trait:
//! - [`RedisTokenBlacklist`] - Shared, survives restarts
//! - [`InMemoryTokenBlacklist`] - Process-local fallback

mod blacklist;
mod null_cache;
mod redis_cache;
mod service;

pub use blacklist::{InMemoryTokenBlacklist, RedisTokenBlacklist, TokenBlacklist, token_fingerprint};
#[cfg(test)]
pub use blacklist::MockTokenBlacklist;
pub use null_cache::NullCache;
pub use redis_cache::{RedisCache, connect_manager};
#[cfg(test)]
pub use service::MockCacheService;
pub use service::{CacheError, CacheResult, CacheService};
