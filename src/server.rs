//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, account bootstrap and the Axum
//! server lifecycle.

use crate::application::services::UserService;
use crate::config::Config;
use crate::infrastructure::cache::{
    CacheService, InMemoryTokenBlacklist, NullCache, RedisCache, RedisTokenBlacklist,
    TokenBlacklist,
};
use crate::infrastructure::security::JwtService;
use crate::routes::app_router;
use crate::state::{AppState, Repositories};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

const DB_CONNECT_ATTEMPTS: usize = 5;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (retried with backoff)
/// - Apply migrations
/// - Redis cache and token blacklist (or in-process fallbacks)
/// - Default roles and the bootstrap admin
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - RSA keys cannot be loaded
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Migrations applied");

    let (cache, blacklist) = connect_cache(&config).await;

    let jwt = JwtService::from_config(&config.jwt, config.profile)
        .context("Failed to initialize JWT signing keys")?;

    let repositories = Repositories::postgres(Arc::new(pool));
    bootstrap_accounts(&config, UserService::new(repositories.users.clone())).await?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;

    let state = AppState::new(
        repositories,
        cache,
        blacklist,
        Arc::new(jwt),
        Arc::new(config),
    );
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(2)
        .factor(250)
        .max_delay(Duration::from_secs(10))
        .map(jitter)
        .take(DB_CONNECT_ATTEMPTS - 1);

    Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options.connect(&config.database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to database")
}

/// Redis when configured and reachable; otherwise caching is disabled and
/// revoked tokens live in process memory.
async fn connect_cache(config: &Config) -> (Arc<dyn CacheService>, Arc<dyn TokenBlacklist>) {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache), token blacklist in memory");
        return (
            Arc::new(NullCache::new()),
            Arc::new(InMemoryTokenBlacklist::new()),
        );
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            let blacklist = RedisTokenBlacklist::new(redis.connection());
            (Arc::new(redis), Arc::new(blacklist))
        }
        Err(e) => {
            tracing::warn!(
                "Failed to connect to Redis: {}. Using NullCache and in-memory blacklist.",
                e
            );
            (
                Arc::new(NullCache::new()),
                Arc::new(InMemoryTokenBlacklist::new()),
            )
        }
    }
}

async fn bootstrap_accounts(config: &Config, users: UserService) -> Result<()> {
    users
        .ensure_default_roles()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to provision roles: {}", e))?;

    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        users
            .ensure_admin(username, password)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create admin user: {}", e))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
