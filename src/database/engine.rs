//! DuckDB-based query engine
//!
//! Reads local or S3 Parquet/CSV files through DuckDB's reader functions with
//! schema union by name, and writes query results straight to Parquet.

use crate::config::{InputSource, S3Settings};
use crate::error::{Error, Result};
use crate::schema::{ColumnInfo, MapColumn, TableSchema};
use crate::sql::{quote_ident, quote_literal};
use crate::types::{InputFormat, SOURCE_VIEW};
use duckdb::Connection;
use std::path::Path;

/// Query engine using DuckDB
pub struct DatabaseEngine {
    /// DuckDB connection
    conn: Connection,
}

impl DatabaseEngine {
    /// Create a new in-memory engine
    pub fn open() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::query(format!("Failed to create DuckDB connection: {e}")))?;

        Ok(Self { conn })
    }

    /// Underlying DuckDB connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Configure S3 access (httpfs extension + credentials)
    pub fn configure_s3(&self, s3: &S3Settings) -> Result<()> {
        self.conn
            .execute_batch("INSTALL httpfs; LOAD httpfs;")
            .map_err(|e| Error::query(format!("Failed to load httpfs extension: {e}")))?;

        self.conn
            .execute_batch(&format!(
                "SET s3_region = {}; SET s3_access_key_id = {}; SET s3_secret_access_key = {};",
                quote_literal(&s3.region),
                quote_literal(&s3.access_key_id),
                quote_literal(&s3.secret_access_key),
            ))
            .map_err(|e| Error::query(format!("Failed to configure S3: {e}")))?;

        // Custom endpoint (MinIO, R2, etc.)
        if let Some(endpoint) = &s3.endpoint {
            let use_ssl = !endpoint.starts_with("http://");
            let host = endpoint
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/');
            self.conn
                .execute_batch(&format!(
                    "SET s3_endpoint = {}; SET s3_url_style = 'path'; SET s3_use_ssl = {use_ssl};",
                    quote_literal(host)
                ))
                .map_err(|e| Error::query(format!("Failed to configure S3 endpoint: {e}")))?;
        }

        tracing::debug!(region = %s3.region, bucket = %s3.bucket, "Configured S3 access");
        Ok(())
    }

    /// Expose the input files as the `raw` view, unioning schemas by name
    ///
    /// Returns the URI the view reads from.
    pub fn register_source(&self, input: &InputSource, format: InputFormat) -> Result<String> {
        if let InputSource::S3(s3) = input {
            self.configure_s3(s3)?;
        }

        let uri = input.source_uri(format);
        let view_sql = format!(
            "CREATE OR REPLACE VIEW {} AS SELECT * FROM {}({}, union_by_name = true);",
            quote_ident(SOURCE_VIEW),
            format.reader_function(),
            quote_literal(&uri)
        );

        tracing::debug!("Creating source view: {}", view_sql);

        self.conn
            .execute_batch(&view_sql)
            .map_err(|e| Error::query(format!("Failed to open input files at {uri}: {e}")))?;

        Ok(uri)
    }

    /// Column names and declared types of the source view
    pub fn describe(&self) -> Result<TableSchema> {
        let query = format!("DESCRIBE SELECT * FROM {}", quote_ident(SOURCE_VIEW));

        let mut stmt = self
            .conn
            .prepare(&query)
            .map_err(|e| Error::query(format!("Failed to prepare DESCRIBE: {e}")))?;

        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnInfo::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            })
            .map_err(|e| Error::query(format!("Failed to describe source: {e}")))?
            .collect::<std::result::Result<TableSchema, _>>()
            .map_err(|e| Error::query(format!("Failed to read source schema: {e}")))?;

        Ok(columns)
    }

    /// Distinct keys of a map column over every row, sorted
    pub fn distinct_map_keys(&self, column: &str) -> Result<Vec<String>> {
        let ident = quote_ident(column);
        let query = format!(
            "SELECT DISTINCT CAST(k AS VARCHAR) AS key_str
               FROM (SELECT unnest(map_keys({ident})) AS k
                       FROM {}
                      WHERE {ident} IS NOT NULL) AS t
              ORDER BY key_str",
            quote_ident(SOURCE_VIEW)
        );

        let mut stmt = self
            .conn
            .prepare(&query)
            .map_err(|e| Error::query(format!("Failed to prepare key query for {column}: {e}")))?;

        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| Error::query(format!("Failed to enumerate keys of {column}: {e}")))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::query(format!("Failed to read keys of {column}: {e}")))?;

        Ok(keys)
    }

    /// Keys of every map-typed column in `schema`, in declaration order
    pub fn map_columns(&self, schema: &TableSchema) -> Result<Vec<MapColumn>> {
        schema
            .map_columns()
            .map(|column| -> Result<MapColumn> {
                let keys = self.distinct_map_keys(&column.name)?;
                tracing::debug!(column = %column.name, keys = keys.len(), "Enumerated map keys");
                Ok(MapColumn::new(column.name.clone(), keys))
            })
            .collect()
    }

    /// Number of rows in the source view
    pub fn count_rows(&self) -> Result<u64> {
        let query = format!("SELECT COUNT(*) FROM {}", quote_ident(SOURCE_VIEW));
        let count: i64 = self
            .conn
            .query_row(&query, [], |row| row.get(0))
            .map_err(|e| Error::query(format!("Failed to count rows: {e}")))?;

        Ok(count as u64)
    }

    /// Run `query` and write its result to a Parquet file
    pub fn copy_to_parquet(&self, query: &str, output_path: &Path) -> Result<()> {
        let path = output_path
            .to_str()
            .ok_or_else(|| Error::output(format!("Invalid output path: {}", output_path.display())))?;

        let copy_sql = format!(
            "COPY ({query}) TO {} (FORMAT PARQUET, COMPRESSION 'SNAPPY');",
            quote_literal(path)
        );

        tracing::debug!("Executing: {}", copy_sql);

        self.conn
            .execute_batch(&copy_sql)
            .map_err(|e| Error::query(format!("Failed to write Parquet: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_fixture(engine: &DatabaseEngine, path: &Path, select: &str) {
        engine
            .copy_to_parquet(select, path)
            .expect("fixture should be written");
    }

    fn local_source(dir: &Path) -> InputSource {
        InputSource::Local {
            dir: PathBuf::from(dir),
        }
    }

    #[test]
    fn test_describe_detects_map_columns() {
        let dir = tempfile::tempdir().unwrap();
        let engine = DatabaseEngine::open().unwrap();
        write_fixture(
            &engine,
            &dir.path().join("part-0.parquet"),
            "SELECT 1::INTEGER AS id, MAP {'a': 'x'} AS props, 'n'::VARCHAR AS name",
        );

        engine
            .register_source(&local_source(dir.path()), InputFormat::Parquet)
            .unwrap();
        let schema = engine.describe().unwrap();

        let names: Vec<&str> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "props", "name"]);

        let maps: Vec<&str> = schema.map_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(maps, vec!["props"]);
    }

    #[test]
    fn test_distinct_map_keys_are_sorted_and_skip_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let engine = DatabaseEngine::open().unwrap();
        write_fixture(
            &engine,
            &dir.path().join("part-0.parquet"),
            "SELECT * FROM (VALUES
                (1, MAP {'b': 'x', 'a': 'y'}),
                (2, NULL::MAP(VARCHAR, VARCHAR)),
                (3, MAP {'c': 'z', 'a': 'w'})
             ) AS t(id, props)",
        );

        engine
            .register_source(&local_source(dir.path()), InputFormat::Parquet)
            .unwrap();

        let keys = engine.distinct_map_keys("props").unwrap();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(engine.count_rows().unwrap(), 3);
    }

    #[test]
    fn test_union_by_name_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let engine = DatabaseEngine::open().unwrap();
        write_fixture(
            &engine,
            &dir.path().join("part-0.parquet"),
            "SELECT 1::INTEGER AS id, 'x'::VARCHAR AS only_first",
        );
        write_fixture(
            &engine,
            &dir.path().join("part-1.parquet"),
            "SELECT 'y'::VARCHAR AS only_second, 2::INTEGER AS id",
        );

        engine
            .register_source(&local_source(dir.path()), InputFormat::Parquet)
            .unwrap();

        let schema = engine.describe().unwrap();
        assert!(schema.contains("only_first"));
        assert!(schema.contains("only_second"));
        assert_eq!(schema.len(), 3);

        let nulls: i64 = engine
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM raw WHERE only_first IS NULL AND id = 2",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(nulls, 1);
    }

    #[test]
    fn test_register_source_without_files_fails() {
        let dir = tempfile::tempdir().unwrap();
        let engine = DatabaseEngine::open().unwrap();

        let err = engine
            .register_source(&local_source(dir.path()), InputFormat::Parquet)
            .unwrap_err();
        assert!(matches!(err, Error::Query { .. }));
    }
}
