//! Worklog Server — application entry point.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use worklog_db::repository::{SurrealActivityRepository, SurrealUserRepository};
use worklog_db::{DbManager, run_migrations};
use worklog_server::{AppState, ServerConfig, router, telemetry};
use worklog_tracker::{ActivityService, HttpIdentityResolver, UserService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("loading configuration")?;
    telemetry::init(config.is_production());

    info!(
        port = config.port,
        env = %config.env,
        db_url = %config.db.url,
        passport_api = %config.tracker.passport_api_host,
        "Starting Worklog server"
    );

    let db = DbManager::connect(&config.db)
        .await
        .context("connecting to SurrealDB")?;
    run_migrations(&db.client())
        .await
        .context("applying migrations")?;

    let state = AppState::new(
        ActivityService::new(SurrealActivityRepository::new(db.client())),
        UserService::new(
            SurrealUserRepository::new(db.client()),
            HttpIdentityResolver::new(&config.tracker)?,
        ),
    );

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("binding port {}", config.port))?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
