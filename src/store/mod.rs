//! Record store: the append-only prediction history in SQLite.
//!
//! Every operation opens its own connection and drops it before returning,
//! on success and error paths alike. SQLite serializes concurrent writers;
//! the busy timeout makes them wait for the lock instead of failing.

pub mod schema;

pub use schema::{ensure_schema, TABLE_NAME};

use crate::config::StorageConfig;
use crate::error::{PredictError, Result};
use crate::features::{FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT};
use crate::types::{Label, NewPrediction, PredictionRecord, RecordId};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params_from_iter, Connection, Row, ToSql};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Format written by the timestamp column default.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Handle to the prediction table. Cheap to clone; holds no open connection.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl RecordStore {
    /// Create a store for the database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Create a store from storage configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.database_path).with_busy_timeout(config.busy_timeout)
    }

    /// Set how long a connection waits on a locked database.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path).map_err(|e| {
            PredictError::Storage(format!("cannot open {}: {}", self.path.display(), e))
        })?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    /// Create the table if needed and verify its columns.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        schema::enable_wal(&conn)?;
        schema::ensure_schema(&conn)
    }

    /// Insert one prediction, returning its id.
    ///
    /// The column list and the parameter list are both produced from
    /// [`FeatureVector::columns`], so they cannot fall out of step.
    pub fn append(&self, prediction: &NewPrediction) -> Result<RecordId> {
        let features: Vec<(&'static str, f64)> = prediction.features.columns().collect();
        let label = prediction.label.as_i64();

        let mut columns: Vec<&str> = vec!["username", "prediction"];
        let mut values: Vec<&dyn ToSql> = vec![&prediction.username, &label];
        for (column, value) in &features {
            columns.push(column);
            values.push(value);
        }

        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            TABLE_NAME,
            columns.join(", "),
            placeholders.join(", ")
        );

        let conn = self.connect()?;
        conn.execute(&sql, params_from_iter(values))?;
        let id = conn.last_insert_rowid();
        debug!(id, label, "Prediction row inserted");
        Ok(id)
    }

    /// All rows, newest first.
    pub fn list_all(&self) -> Result<Vec<PredictionRecord>> {
        let sql = format!(
            "SELECT id, username, timestamp, prediction, {} FROM {} \
             ORDER BY timestamp DESC, id DESC",
            FEATURE_COLUMNS.join(", "),
            TABLE_NAME
        );

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let raw_rows = stmt
            .query_map([], RawRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raw_rows.into_iter().map(RawRow::into_record).collect()
    }

    /// Number of stored rows.
    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", TABLE_NAME),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Round-trip a trivial query.
    pub fn ping(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

/// Row as read from SQLite, before domain validation.
struct RawRow {
    id: i64,
    username: String,
    timestamp: String,
    prediction: i64,
    features: [f64; FEATURE_COUNT],
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mut features = [0.0; FEATURE_COUNT];
        for (i, slot) in features.iter_mut().enumerate() {
            *slot = row.get(4 + i)?;
        }
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            timestamp: row.get(2)?,
            prediction: row.get(3)?,
            features,
        })
    }

    fn into_record(self) -> Result<PredictionRecord> {
        let label = Label::try_from(self.prediction).map_err(|e| PredictError::CorruptRecord {
            id: self.id,
            reason: e.to_string(),
        })?;
        let timestamp = parse_timestamp(&self.timestamp).map_err(|reason| {
            PredictError::CorruptRecord {
                id: self.id,
                reason,
            }
        })?;
        Ok(PredictionRecord {
            id: self.id,
            username: self.username,
            timestamp,
            label,
            features: FeatureVector::from_array(self.features),
        })
    }
}

fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("bad timestamp {:?}: {}", raw, e))
}
