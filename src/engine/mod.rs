//! DuckDB engine module - connection management and query execution.
//!
//! This module provides:
//! - `Engine`: lazily connected wrapper around duckdb::Connection
//! - `QueryReply`: tagged text outcome of a query submission
//! - `render`: flattening of materialized results to plain text

pub mod connection;
pub mod render;

pub use connection::{Engine, QueryReply, MEMORY_DB_PATH, NO_OUTPUT};
