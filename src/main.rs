//! resource-booking server entry point.
//!
//! Wires PostgreSQL and Redis (or the in-memory fallbacks) into the
//! booking service and starts the Axum HTTP server.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use resource_booking::app_state::AppState;
use resource_booking::auth::{Authenticator, StaticTokenAuthenticator};
use resource_booking::build_app;
use resource_booking::config::BookingConfig;
use resource_booking::lock::{LockService, RedisLockService};
use resource_booking::persistence::{BookingRepository, PostgresBookingRepository};
use resource_booking::service::BookingService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = BookingConfig::from_env().context("loading configuration")?;
    tracing::info!(
        addr = %config.listen_addr,
        persistence = config.persistence_enabled,
        lock_ttl_ms = config.lock.ttl.as_millis() as u64,
        "starting resource-booking"
    );

    let authenticator = StaticTokenAuthenticator::new(config.auth_tokens.clone());
    if authenticator.is_empty() {
        tracing::warn!("AUTH_TOKENS is empty; every booking request will be rejected");
    }
    let authenticator: Arc<dyn Authenticator> = Arc::new(authenticator);

    let app_state = if config.persistence_enabled {
        let repository = PostgresBookingRepository::connect(
            &config.database_url,
            config.database_max_connections,
            config.database_min_connections,
            config.connect_timeout(),
        )
        .await
        .context("connecting to PostgreSQL")?;
        tracing::info!("connected to PostgreSQL");

        if config.database_run_migrations {
            repository.migrate().await.context("running migrations")?;
        }

        let locks = RedisLockService::connect(
            &config.redis_url,
            config.redis_max_connections,
            config.connect_timeout(),
        )
        .context("configuring Redis")?;

        let repository: Arc<dyn BookingRepository> = Arc::new(repository);
        let locks: Arc<dyn LockService> = Arc::new(locks);
        AppState {
            booking_service: Arc::new(BookingService::new(repository, locks, config.lock.clone())),
            authenticator,
        }
    } else {
        tracing::warn!(
            "persistence disabled; using in-memory store and lock (single instance only)"
        );
        resource_booking::in_memory_state(config.lock.clone(), authenticator)
    };

    let app = build_app(app_state, &config.cors_allowed_origins);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// `RUST_LOG` controls the filter (default `info`); `LOG_FORMAT=json`
/// switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
