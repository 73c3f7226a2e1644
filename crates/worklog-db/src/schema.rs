//! Schema definitions and migration runner for SurrealDB.
//!
//! Tables are SCHEMAFULL. UUIDs are stored as strings. Integrity
//! rules that must hold across concurrent writers (passport
//! uniqueness, one open session per user) are UNIQUE indexes, so the
//! store rejects violating writes no matter how callers interleave.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_users",
        sql: USERS_V1,
    },
    Migration {
        version: 2,
        name: "create_activity",
        sql: ACTIVITY_V2,
    },
];

// -----------------------------------------------------------------------
// v1 — users
// -----------------------------------------------------------------------

const USERS_V1: &str = "\
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD surname ON TABLE user TYPE string;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD patronymic ON TABLE user TYPE string;
DEFINE FIELD address ON TABLE user TYPE string;
DEFINE FIELD passport_serie ON TABLE user TYPE int \
    ASSERT $value >= 0 AND $value <= 9999;
DEFINE FIELD passport_number ON TABLE user TYPE int \
    ASSERT $value >= 0 AND $value <= 999999;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_passport ON TABLE user \
    COLUMNS passport_serie, passport_number UNIQUE;
";

// -----------------------------------------------------------------------
// v2 — activity sessions
// -----------------------------------------------------------------------

// `open_slot` is 'open' while a session runs and the session's own
// record key once it is closed, so the (user_id, open_slot) UNIQUE
// index admits any number of closed sessions but one open session.
const ACTIVITY_V2: &str = "\
DEFINE TABLE activity SCHEMAFULL;
DEFINE FIELD user_id ON TABLE activity TYPE string;
DEFINE FIELD start_time ON TABLE activity TYPE datetime;
DEFINE FIELD end_time ON TABLE activity TYPE option<datetime>;
DEFINE FIELD open_slot ON TABLE activity TYPE string;
DEFINE INDEX idx_activity_open_slot ON TABLE activity \
    COLUMNS user_id, open_slot UNIQUE;
DEFINE INDEX idx_activity_user_start ON TABLE activity \
    COLUMNS user_id, start_time;
";

/// Marker stored in `activity.open_slot` while a session is open.
pub(crate) const OPEN_SLOT: &str = "open";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the recorded maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);
    debug!(current_version, "Schema version");

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;
    }

    Ok(())
}

/// Highest schema version this build knows how to apply.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}
