//! Database migrations and initialization.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info};

/// Tables the lookups read from; every one must exist after migration.
pub const REQUIRED_TABLES: &[&str] = &[
    "contracts",
    "contract_years",
    "moves",
    "addresses",
    "mto_shipments",
    "reweighs",
    "sit_extensions",
    "port_locations",
    "mto_service_items",
    "mto_service_item_dimensions",
    "re_domestic_service_areas",
    "re_zip3s",
    "re_rate_areas",
    "re_zip5_rate_areas",
    "re_intl_accessorial_prices",
    "ghc_diesel_fuel_prices",
    "re_services",
    "service_item_param_keys",
    "service_params",
    "payment_requests",
    "payment_service_items",
    "payment_service_item_params",
];

/// Open (creating if needed) the SQLite database, apply pragmas and schema.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    run_migrations(&pool).await?;

    info!(path = %db_path, "Service params database ready");
    Ok(pool)
}

/// Apply the embedded schema. Every statement is `IF NOT EXISTS`, so this is
/// safe to run on every start.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let schema_sql = include_str!("schema.sql");

    let mut applied = 0usize;
    for statement in schema_sql.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
            applied += 1;
        }
    }

    debug!(statements = applied, "Schema applied");
    Ok(())
}

async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Row;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;

    // journal_mode returns the mode actually applied
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    debug!(journal_mode = %journal_mode, "SQLite journal mode");

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;

    Ok(())
}
