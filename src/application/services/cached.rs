//! Read-through helpers over [`CacheService`].
//!
//! Entries are JSON documents. Cache failures never fail a request: a broken
//! entry or an unreachable cache is logged and treated as a miss.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::infrastructure::cache::CacheService;

pub const PROJECT_BY_ID: &str = "projectById";
pub const PROJECT_BY_SLUG: &str = "projectBySlug";
pub const PROJECTS: &str = "projects";
pub const TEAM_MEMBER_BY_ID: &str = "teamMemberById";
pub const TEAM_MEMBERS: &str = "teamMembers";

/// `{cache}::{suffix}`
pub fn key(cache: &str, suffix: impl std::fmt::Display) -> String {
    format!("{cache}::{suffix}")
}

/// Prefix matching every entry of `cache`.
pub fn prefix(cache: &str) -> String {
    format!("{cache}::")
}

pub async fn load<T: DeserializeOwned>(cache: &dyn CacheService, key: &str) -> Option<T> {
    let raw = match cache.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Cache read failed");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => {
            debug!(key, "Serving from cache");
            Some(value)
        }
        Err(e) => {
            warn!(key, error = %e, "Dropping undecodable cache entry");
            if let Err(e) = cache.invalidate(key).await {
                warn!(key, error = %e, "Cache invalidation failed");
            }
            None
        }
    }
}

pub async fn store<T: Serialize>(cache: &dyn CacheService, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "Failed to encode cache entry");
            return;
        }
    };

    if let Err(e) = cache.set(key, &raw, None).await {
        warn!(key, error = %e, "Cache write failed");
    }
}

pub async fn evict(cache: &dyn CacheService, keys: &[String]) {
    for key in keys {
        if let Err(e) = cache.invalidate(key).await {
            warn!(key = %key, error = %e, "Cache invalidation failed");
        }
    }
}

pub async fn evict_all(cache: &dyn CacheService, name: &str) {
    let prefix = prefix(name);
    if let Err(e) = cache.invalidate_prefix(&prefix).await {
        warn!(prefix = %prefix, error = %e, "Cache invalidation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::{CacheError, MockCacheService};

    #[test]
    fn test_key_format() {
        assert_eq!(key(PROJECT_BY_ID, 7), "projectById::7");
        assert_eq!(key(PROJECTS, "0:10:id:ASC"), "projects::0:10:id:ASC");
        assert_eq!(prefix(TEAM_MEMBERS), "teamMembers::");
    }

    #[tokio::test]
    async fn test_load_hit() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some("[1,2,3]".to_string())));

        let value: Option<Vec<i32>> = load(&cache, "k").await;
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_load_treats_errors_as_miss() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Err(CacheError::OperationError("down".to_string())));

        let value: Option<Vec<i32>> = load(&cache, "k").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_load_drops_corrupt_entry() {
        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some("{not json".to_string())));
        cache
            .expect_invalidate()
            .withf(|key| key == "k")
            .times(1)
            .returning(|_| Ok(()));

        let value: Option<Vec<i32>> = load(&cache, "k").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_store_swallows_write_errors() {
        let mut cache = MockCacheService::new();
        cache
            .expect_set()
            .withf(|key, value, ttl| key == "k" && value == "\"v\"" && ttl.is_none())
            .times(1)
            .returning(|_, _, _| Err(CacheError::ConnectionError("down".to_string())));

        store(&cache, "k", &"v").await;
    }
}
