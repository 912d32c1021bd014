//! # Rollcall API Server
//!
//! Loads configuration, connects to PostgreSQL, applies migrations,
//! optionally creates the principal account, and serves the HTTP API until
//! Ctrl-C.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/rollcall \
//! JWT_SECRET=change-me-to-a-long-random-string-please \
//! cargo run -p rollcall-api
//! ```

use anyhow::Context;
use rollcall_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use rollcall_shared::{
    auth::password::Argon2Hasher,
    db::{migrations::run_migrations, pool},
    services::SchoolService,
    store::PgStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "rollcall_api=debug,rollcall_shared=info,tower_http=debug";

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);

    tracing::info!(
        "Rollcall API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let db_pool = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        acquire_timeout_seconds: config.database.acquire_timeout_secs,
        ..Default::default()
    })
    .await
    .context("Failed to connect to database")?;

    run_migrations(&db_pool)
        .await
        .context("Failed to run migrations")?;

    let school = SchoolService::new(
        Arc::new(PgStore::new(db_pool.clone())),
        Arc::new(Argon2Hasher::new(config.hasher.into())),
    );

    if let Some(principal) = &config.principal {
        match school
            .bootstrap_principal(&principal.email, &principal.password)
            .await
            .context("Failed to bootstrap principal account")?
        {
            Some(account) => tracing::info!(account_id = %account.id, "Created principal account"),
            None => tracing::debug!("Principal account already present"),
        }
    }

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(school, config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool::close_pool(db_pool).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
