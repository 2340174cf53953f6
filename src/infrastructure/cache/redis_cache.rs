//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::telemetry;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "cair:";
const SCAN_BATCH: usize = 200;

/// Redis cache for serialized project and team member responses.
///
/// Uses `ConnectionManager` for connection reuse and automatic reconnects.
/// All operations are fail-open: errors are logged but don't propagate to callers.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// `default_ttl_seconds` applies when [`CacheService::set`] is called
    /// without an explicit TTL (`CACHE_TTL_SECONDS`).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let conn = connect_manager(redis_url).await?;
        Ok(Self {
            conn,
            default_ttl: default_ttl_seconds,
        })
    }

    /// Shared connection handle, reused by the token blacklist.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    fn build_key(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }

    async fn scan_keys(&self, pattern: &str) -> redis::RedisResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(keys)
    }
}

/// Opens a `ConnectionManager` and checks it with PING.
pub async fn connect_manager(redis_url: &str) -> CacheResult<ConnectionManager> {
    info!(
        "Connecting to Redis at {}",
        crate::config::mask_connection_string(redis_url)
    );

    let client = Client::open(redis_url)
        .map_err(|e| CacheError::ConnectionError(format!("Failed to create Redis client: {e}")))?;

    let manager = ConnectionManager::new(client)
        .await
        .map_err(|e| CacheError::ConnectionError(format!("Failed to connect to Redis: {e}")))?;

    let mut test_conn = manager.clone();
    test_conn
        .ping::<()>()
        .await
        .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {e}")))?;

    info!("✓ Connected to Redis");
    Ok(manager)
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let cache = telemetry::cache_name(key);

        match conn.get::<_, Option<String>>(Self::build_key(key)).await {
            Ok(Some(value)) => {
                debug!(key, "Cache HIT");
                telemetry::record_cache_hit(cache);
                Ok(Some(value))
            }
            Ok(None) => {
                debug!(key, "Cache MISS");
                telemetry::record_cache_miss(cache);
                Ok(None)
            }
            Err(e) => {
                warn!(key, error = %e, "Redis GET failed, treating as miss");
                telemetry::record_cache_miss(cache);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        if let Err(e) = conn
            .set_ex::<_, _, ()>(Self::build_key(key), value, ttl)
            .await
        {
            warn!(key, error = %e, "Redis SET failed");
        } else {
            debug!(key, ttl, "Cache SET");
        }
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();

        match conn.del::<_, i64>(Self::build_key(key)).await {
            Ok(deleted) if deleted > 0 => debug!(key, "Cache INVALIDATE"),
            Ok(_) => {}
            Err(e) => warn!(key, error = %e, "Redis DEL failed"),
        }
        Ok(())
    }

    async fn invalidate_prefix(&self, prefix: &str) -> CacheResult<()> {
        let pattern = format!("{}*", Self::build_key(prefix));

        let keys = match self.scan_keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(prefix, error = %e, "Redis SCAN failed");
                return Ok(());
            }
        };

        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        match conn.del::<_, i64>(&keys).await {
            Ok(deleted) => debug!(prefix, deleted, "Cache INVALIDATE prefix"),
            Err(e) => warn!(prefix, error = %e, "Redis DEL failed"),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
