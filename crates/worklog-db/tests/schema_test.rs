//! Integration tests for schema migrations using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use surrealdb_types::SurrealValue;

#[derive(Debug, SurrealValue)]
struct VersionRow {
    version: u32,
}

#[tokio::test]
async fn migrations_create_tables_and_indexes() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    worklog_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info_str = format!("{:?}", info.expect("INFO FOR DB should return a value"));
    assert!(info_str.contains("user"), "missing user table");
    assert!(info_str.contains("activity"), "missing activity table");

    let mut result = db.query("INFO FOR TABLE activity").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info_str = format!("{:?}", info.unwrap());
    assert!(
        info_str.contains("idx_activity_open_slot"),
        "missing open-slot index"
    );

    let mut result = db.query("INFO FOR TABLE user").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info_str = format!("{:?}", info.unwrap());
    assert!(info_str.contains("idx_user_passport"), "missing passport index");
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    worklog_db::run_migrations(&db).await.unwrap();
    worklog_db::run_migrations(&db).await.unwrap();

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version ASC")
        .await
        .unwrap();
    let rows: Vec<VersionRow> = result.take(0).unwrap();
    let versions: Vec<u32> = rows.into_iter().map(|r| r.version).collect();
    assert_eq!(versions, (1..=worklog_db::latest_version()).collect::<Vec<_>>());
}
