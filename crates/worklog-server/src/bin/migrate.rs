//! Applies pending schema migrations and exits.

use anyhow::Context;
use tracing::info;
use worklog_db::{DbManager, latest_version, run_migrations};
use worklog_server::{config, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let production = std::env::var("APP_ENV").is_ok_and(|v| v.eq_ignore_ascii_case("prod"));
    telemetry::init(production);

    let db_config = config::db_config_from_env();
    let db = DbManager::connect(&db_config)
        .await
        .context("connecting to SurrealDB")?;
    run_migrations(&db.client())
        .await
        .context("applying migrations")?;

    info!(version = latest_version(), "Schema up to date");
    Ok(())
}
