//! Revoked-token store.
//!
//! Tokens are never stored verbatim: keys are the hex SHA-256 digest of the
//! token. Entries live exactly as long as the token would have been valid.

use super::service::{CacheError, CacheResult};
use async_trait::async_trait;
use dashmap::DashMap;
use redis::{AsyncCommands, aio::ConnectionManager};
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};
use tracing::debug;

const KEY_PREFIX: &str = "blacklist:";

/// Hex SHA-256 digest of a raw token.
pub fn token_fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Store of revoked JWTs.
///
/// Unlike [`super::CacheService`], implementations are fail-closed: a backend
/// error is returned to the caller instead of being treated as "not revoked".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Marks `token` as revoked for `ttl`. A zero TTL is a no-op.
    async fn revoke(&self, token: &str, ttl: Duration) -> CacheResult<()>;

    async fn is_revoked(&self, token: &str) -> CacheResult<bool>;
}

/// Redis-backed blacklist using `SET EX` per token.
pub struct RedisTokenBlacklist {
    conn: ConnectionManager,
}

impl RedisTokenBlacklist {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn build_key(token: &str) -> String {
        format!("{KEY_PREFIX}{}", token_fingerprint(token))
    }
}

#[async_trait]
impl TokenBlacklist for RedisTokenBlacklist {
    async fn revoke(&self, token: &str, ttl: Duration) -> CacheResult<()> {
        let seconds = ttl.as_secs();
        if seconds == 0 {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::build_key(token), "revoked", seconds)
            .await
            .map_err(|e| CacheError::OperationError(format!("Failed to blacklist token: {e}")))?;

        debug!(ttl_seconds = seconds, "Token blacklisted");
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(Self::build_key(token))
            .await
            .map_err(|e| CacheError::OperationError(format!("Failed to check blacklist: {e}")))
    }
}

/// Process-local blacklist used when Redis is not configured.
///
/// Revocations are lost on restart and are not shared between instances.
#[derive(Default)]
pub struct InMemoryTokenBlacklist {
    entries: DashMap<String, Instant>,
}

impl InMemoryTokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, expires_at| *expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl TokenBlacklist for InMemoryTokenBlacklist {
    async fn revoke(&self, token: &str, ttl: Duration) -> CacheResult<()> {
        if ttl.is_zero() {
            return Ok(());
        }
        self.purge_expired();
        self.entries
            .insert(token_fingerprint(token), Instant::now() + ttl);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> CacheResult<bool> {
        let key = token_fingerprint(token);
        let revoked = self
            .entries
            .get(&key)
            .is_some_and(|expires_at| *expires_at > Instant::now());
        Ok(revoked)
    }
}
