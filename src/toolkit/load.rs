//! File-loading helpers.
//!
//! These build `CREATE OR REPLACE TABLE ... AS SELECT` statements over
//! local paths or `s3://` URIs (the latter requires the httpfs setup to
//! have succeeded) and submit them through the normal query path. They
//! are public helpers, not registered agent tools.

use tracing::debug;

use super::DuckDbToolkit;

impl DuckDbToolkit {
    /// Load a local file into a table. Returns the table name used and
    /// the exact statement that was submitted.
    pub fn load_local_path_to_table(
        &self,
        path: &str,
        table_name: Option<&str>,
    ) -> (String, String) {
        self.load_path(path, table_name)
    }

    /// Load a local CSV file into a table, optionally with an explicit
    /// field delimiter.
    pub fn load_local_csv_to_table(
        &self,
        path: &str,
        table_name: Option<&str>,
        delimiter: Option<&str>,
    ) -> (String, String) {
        self.load_csv(path, table_name, delimiter)
    }

    /// Load a file from S3 into a table. The read goes through the same
    /// path as local files; httpfs handles the URI.
    pub fn load_s3_path_to_table(
        &self,
        s3_path: &str,
        table_name: Option<&str>,
    ) -> (String, String) {
        self.load_path(s3_path, table_name)
    }

    /// Load a CSV file from S3 into a table.
    pub fn load_s3_csv_to_table(
        &self,
        s3_path: &str,
        table_name: Option<&str>,
        delimiter: Option<&str>,
    ) -> (String, String) {
        self.load_csv(s3_path, table_name, delimiter)
    }

    fn load_path(&self, path: &str, table_name: Option<&str>) -> (String, String) {
        let table = resolve_table_name(path, table_name);
        let statement = format!("CREATE OR REPLACE TABLE '{table}' AS SELECT * FROM '{path}';");
        debug!(%path, table = %table, "loading file into duckdb");
        self.run_query(&statement);
        (table, statement)
    }

    fn load_csv(
        &self,
        path: &str,
        table_name: Option<&str>,
        delimiter: Option<&str>,
    ) -> (String, String) {
        let table = resolve_table_name(path, table_name);
        let select = match delimiter {
            Some(delim) => format!("SELECT * FROM read_csv('{path}', delim='{delim}')"),
            None => format!("SELECT * FROM read_csv('{path}')"),
        };
        let statement = format!("CREATE OR REPLACE TABLE '{table}' AS {select};");
        debug!(%path, table = %table, "loading CSV into duckdb");
        self.run_query(&statement);
        (table, statement)
    }
}

fn resolve_table_name(path: &str, table_name: Option<&str>) -> String {
    match table_name {
        Some(name) => name.to_string(),
        None => derive_table_name(path),
    }
}

/// Derive a table name from the final path segment: extension removed,
/// then hyphens, periods, spaces, and slashes replaced with underscores.
/// No validation or uniqueness check beyond that.
fn derive_table_name(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    };
    stem.replace(['-', '.', ' ', '/'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_name_replaces_unsafe_characters() {
        assert_eq!(
            derive_table_name("s3://bucket/data/my-data file.csv"),
            "my_data_file"
        );
    }

    #[test]
    fn test_derived_name_strips_last_extension_only() {
        assert_eq!(derive_table_name("/tmp/archive.tar.gz"), "archive_tar");
    }

    #[test]
    fn test_derived_name_without_extension() {
        assert_eq!(derive_table_name("/data/events"), "events");
    }

    #[test]
    fn test_derived_name_keeps_leading_dot_segment() {
        assert_eq!(derive_table_name("/data/.hidden"), "_hidden");
    }

    #[test]
    fn test_explicit_name_wins() {
        assert_eq!(resolve_table_name("/data/events.parquet", Some("t")), "t");
    }
}
