//! Table definition derived from the feature schema.

use crate::error::{PredictError, Result};
use crate::features::FEATURE_COLUMNS;
use rusqlite::Connection;
use std::collections::HashSet;
use tracing::{debug, info};

/// Table holding the prediction history.
pub const TABLE_NAME: &str = "predictions";

/// Metadata columns preceding the feature columns.
pub const METADATA_COLUMNS: [&str; 4] = ["id", "username", "timestamp", "prediction"];

/// SQL expression for the write-time timestamp (UTC, millisecond precision).
const NOW_EXPR: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

/// `CREATE TABLE IF NOT EXISTS` statement for the predictions table.
pub fn create_table_sql() -> String {
    let feature_columns: Vec<String> = FEATURE_COLUMNS
        .iter()
        .map(|column| format!("  {} REAL NOT NULL", column))
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n  \
         id INTEGER PRIMARY KEY AUTOINCREMENT,\n  \
         username TEXT NOT NULL,\n  \
         timestamp TEXT NOT NULL DEFAULT ({now}),\n  \
         prediction INTEGER NOT NULL,\n\
         {features}\n)",
        table = TABLE_NAME,
        now = NOW_EXPR,
        features = feature_columns.join(",\n"),
    )
}

/// Creates the table if absent and checks an existing one carries every
/// feature column. Safe to call any number of times.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(&create_table_sql())?;
    conn.execute_batch(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{table}_timestamp ON {table} (timestamp)",
        table = TABLE_NAME
    ))?;

    let existing = table_columns(conn)?;
    let missing: Vec<String> = METADATA_COLUMNS
        .iter()
        .chain(FEATURE_COLUMNS.iter())
        .filter(|column| !existing.contains(**column))
        .map(|column| column.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(PredictError::SchemaMismatch {
            table: TABLE_NAME.to_string(),
            missing,
        });
    }

    debug!(columns = existing.len(), "Schema verified");
    Ok(())
}

/// Switches the database to WAL journaling (persistent per file).
pub fn enable_wal(conn: &Connection) -> Result<()> {
    let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    info!(journal_mode = %mode, "Journal mode configured");
    Ok(())
}

fn table_columns(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", TABLE_NAME))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<HashSet<_>>>()?;
    Ok(columns)
}
