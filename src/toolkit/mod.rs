//! DuckDB operations exposed as agent tools.
//!
//! `DuckDbToolkit` owns the engine and implements each operation as a
//! plain method returning text. `register_tools` builds the capability
//! table: it wires the invocable subset of those methods into a
//! [`ToolRegistry`] at composition time.
//!
//! SQL is assembled by string interpolation with no identifier or
//! literal escaping, matching the permissive contract callers rely on;
//! see DESIGN.md for the injection caveat.

pub mod load;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ToolkitConfig;
use crate::engine::{Engine, QueryReply};
use crate::error::ToolError;
use crate::registry::{ToolRegistry, ToolSpec};

/// DuckDB toolkit: one lazily connected engine plus the operations the
/// agent can call against it.
pub struct DuckDbToolkit {
    engine: Engine,
}

impl DuckDbToolkit {
    pub fn new(config: &ToolkitConfig) -> Self {
        Self {
            engine: Engine::new(config),
        }
    }

    /// Toolkit over a fresh in-memory database.
    pub fn in_memory() -> Self {
        Self::new(&ToolkitConfig::default())
    }

    /// Toolkit over an externally created connection.
    pub fn from_connection(conn: duckdb::Connection) -> Self {
        Self {
            engine: Engine::from_connection(conn),
        }
    }

    /// Run a SQL query and return the tagged outcome.
    ///
    /// The input is cleaned first: backticks are stripped, and anything
    /// after the first semicolon is dropped, so multi-statement input
    /// silently runs only its first statement. Failures are part of the
    /// reply, never an `Err`.
    pub fn run_query(&self, query: &str) -> QueryReply {
        let formatted = format_sql(query);
        debug!(sql = %formatted, "running query");
        let reply = self.engine.submit(&formatted);
        debug!(result = %reply.as_str(), failed = reply.is_failure(), "query result");
        reply
    }

    /// List the tables in the database.
    pub fn show_tables(&self) -> String {
        self.run_query("SHOW TABLES;").into_text()
    }

    /// Describe a table: the identifier on the first line, the flattened
    /// description below it.
    pub fn describe_table(&self, table: &str) -> String {
        let description = self.run_query(&format!("DESCRIBE {table};")).into_text();
        format!("{table}\n{description}")
    }

    /// Return the query plan for a query.
    pub fn inspect_query(&self, query: &str) -> String {
        self.run_query(&format!("explain {query};")).into_text()
    }

    /// Describe a table or view from the information schema.
    pub fn describe_table_or_view(&self, table: &str) -> String {
        let description = self
            .run_query(&format!(
                "select column_name, data_type from information_schema.columns where table_name='{table}';"
            ))
            .into_text();
        format!("{table}\n{description}")
    }
}

/// Strip backticks and truncate at the first statement separator.
fn format_sql(query: &str) -> String {
    let cleaned = query.replace('`', "");
    cleaned.split(';').next().unwrap_or_default().to_string()
}

#[derive(Deserialize)]
struct QueryArgs {
    query: String,
}

#[derive(Deserialize)]
struct TableArgs {
    table: String,
}

fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T, ToolError> {
    Ok(serde_json::from_value(args.clone())?)
}

/// Build the capability table: register the invocable operations against
/// `registry`. The file-loading helpers stay method-only by design.
pub fn register_tools(toolkit: &Arc<DuckDbToolkit>, registry: &mut ToolRegistry) {
    let query_parameters = json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "The SQL query to run"
            }
        },
        "required": ["query"],
        "additionalProperties": false
    });
    let table_parameters = json!({
        "type": "object",
        "properties": {
            "table": {
                "type": "string",
                "description": "The table to describe"
            }
        },
        "required": ["table"],
        "additionalProperties": false
    });
    let no_parameters = json!({
        "type": "object",
        "properties": {},
        "additionalProperties": false
    });

    let tk = Arc::clone(toolkit);
    registry.register(
        ToolSpec {
            name: "run_query".to_string(),
            description: "Run a SQL query against the DuckDB database and return the result as text."
                .to_string(),
            parameters: query_parameters.clone(),
        },
        Box::new(move |args| {
            let args: QueryArgs = parse_args(args)?;
            Ok(tk.run_query(&args.query).into_text())
        }),
    );

    let tk = Arc::clone(toolkit);
    registry.register(
        ToolSpec {
            name: "show_tables".to_string(),
            description: "List the tables in the database.".to_string(),
            parameters: no_parameters,
        },
        Box::new(move |_args| Ok(tk.show_tables())),
    );

    let tk = Arc::clone(toolkit);
    registry.register(
        ToolSpec {
            name: "describe_table".to_string(),
            description: "Describe a table: its columns, types, and constraints.".to_string(),
            parameters: table_parameters.clone(),
        },
        Box::new(move |args| {
            let args: TableArgs = parse_args(args)?;
            Ok(tk.describe_table(&args.table))
        }),
    );

    let tk = Arc::clone(toolkit);
    registry.register(
        ToolSpec {
            name: "inspect_query".to_string(),
            description: "Inspect a query and return its execution plan without running it."
                .to_string(),
            parameters: query_parameters,
        },
        Box::new(move |args| {
            let args: QueryArgs = parse_args(args)?;
            Ok(tk.inspect_query(&args.query))
        }),
    );

    let tk = Arc::clone(toolkit);
    registry.register(
        ToolSpec {
            name: "describe_table_or_view".to_string(),
            description: "Describe a table or view from the information schema.".to_string(),
            parameters: table_parameters,
        },
        Box::new(move |args| {
            let args: TableArgs = parse_args(args)?;
            Ok(tk.describe_table_or_view(&args.table))
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sql_strips_backticks() {
        assert_eq!(format_sql("SELECT `a` FROM `t`"), "SELECT a FROM t");
    }

    #[test]
    fn test_format_sql_keeps_only_first_statement() {
        assert_eq!(
            format_sql("SELECT 1; DROP TABLE users; SELECT 2"),
            "SELECT 1"
        );
    }

    #[test]
    fn test_format_sql_plain_input_unchanged() {
        assert_eq!(format_sql("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn test_format_sql_empty_statement() {
        assert_eq!(format_sql("; SELECT 1"), "");
    }
}
