//! DuckDB connection wrapper with query execution methods.
//!
//! The connection is created on first use and reused for every
//! subsequent call; the toolkit never closes it.

use std::sync::Mutex;

use arrow_array::RecordBatch;
use duckdb::Connection;
use tracing::{debug, instrument, warn};

use crate::config::ToolkitConfig;
use crate::engine::render;
use crate::error::ToolError;

/// Path marker for an in-memory database.
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Placeholder returned for statements that produce no result set.
pub const NO_OUTPUT: &str = "No output";

/// Outcome of a query submission.
///
/// Both variants carry text, and registered tools surface both the same
/// way; the tag exists so internal code paths stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryReply {
    /// Flattened tabular output, or [`NO_OUTPUT`] for statements
    /// without a result set.
    Output(String),
    /// Message text of an engine or materialization failure.
    Failure(String),
}

impl QueryReply {
    pub fn as_str(&self) -> &str {
        match self {
            QueryReply::Output(text) | QueryReply::Failure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            QueryReply::Output(text) | QueryReply::Failure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, QueryReply::Failure(_))
    }
}

/// Wrapper around duckdb::Connection with lazy initialization.
///
/// The Connection is wrapped in a Mutex because duckdb::Connection contains
/// RefCell internally and is not Sync. This allows the engine to be shared
/// behind an Arc; no queuing or isolation beyond that is provided.
pub struct Engine {
    db_path: String,
    s3_region: String,
    conn: Mutex<Option<Connection>>,
}

impl Engine {
    /// Create an engine that will connect on first use.
    pub fn new(config: &ToolkitConfig) -> Self {
        Self {
            db_path: config.db_path.clone(),
            s3_region: config.s3_region.clone(),
            conn: Mutex::new(None),
        }
    }

    /// Wrap an externally created connection.
    ///
    /// The httpfs setup is skipped; session configuration is the
    /// caller's responsibility.
    pub fn from_connection(conn: Connection) -> Self {
        let config = ToolkitConfig::default();
        Self {
            db_path: config.db_path,
            s3_region: config.s3_region,
            conn: Mutex::new(Some(conn)),
        }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, ToolError>,
    ) -> Result<T, ToolError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| ToolError::Internal("connection mutex poisoned".to_string()))?;
        if guard.is_none() {
            *guard = Some(self.open_connection()?);
        }
        let conn = guard
            .as_ref()
            .ok_or_else(|| ToolError::Internal("connection slot empty".to_string()))?;
        f(conn)
    }

    fn open_connection(&self) -> Result<Connection, ToolError> {
        let conn = if self.db_path == MEMORY_DB_PATH {
            Connection::open_in_memory()?
        } else {
            Connection::open(&self.db_path)?
        };
        debug!(db_path = %self.db_path, "duckdb connection created");

        // INSTALL may reach the network; remote object storage is optional.
        let setup = format!(
            "INSTALL httpfs; LOAD httpfs; SET s3_region='{}';",
            self.s3_region
        );
        if let Err(err) = conn.execute_batch(&setup) {
            warn!(%err, "failed to set up httpfs extension; only local files will be supported");
        }

        Ok(conn)
    }

    /// Submit one SQL statement and flatten its result.
    ///
    /// Never returns an error: engine faults, render faults, and
    /// connection-open faults all come back as [`QueryReply::Failure`]
    /// carrying the message text.
    #[instrument(skip(self), fields(sql = %sql))]
    pub fn submit(&self, sql: &str) -> QueryReply {
        match self.run(sql) {
            Ok(text) => QueryReply::Output(text),
            // Engine faults travel as the engine's own message text.
            Err(ToolError::DuckDb(err)) => QueryReply::Failure(err.to_string()),
            Err(err) => QueryReply::Failure(err.to_string()),
        }
    }

    fn run(&self, sql: &str) -> Result<String, ToolError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let arrow = stmt.query_arrow([])?;
            let schema = arrow.get_schema();
            let batches: Vec<RecordBatch> = arrow.collect();

            // DDL and other no-result statements come back with an empty schema.
            if schema.fields().is_empty() {
                return Ok(NO_OUTPUT.to_string());
            }

            let text = render::flatten(&schema, &batches);
            debug!(
                batch_count = batches.len(),
                field_count = schema.fields().len(),
                "executed query"
            );
            Ok(text)
        })
    }
}
