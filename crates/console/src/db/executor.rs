//! Text-oriented SQL executor.
//!
//! Three call shapes, all over bound (`$n`) statements:
//!
//! - [`Executor::execute_update`] - run a non-query, return affected rows
//! - [`Executor::query_and_return`] - run a query, return rows of text values
//! - [`Executor::query_and_print`] - run a query, print a tab-separated table
//!
//! Typed access used by the console handlers goes through the repositories;
//! this executor serves operator subcommands and anything that wants plain
//! text rows.

use std::io::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Column, PgPool, Postgres, Row, TypeInfo};
use tracing::{debug, instrument};

use super::RepositoryError;

/// A result row; `None` marks SQL `NULL`.
pub type TextRow = Vec<Option<String>>;

/// A bound statement ready to run.
pub type Statement<'q> = Query<'q, Postgres, PgArguments>;

/// Rows plus the column names they were selected under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    /// Column names in select-list order (empty when no row came back).
    pub columns: Vec<String>,
    /// Rows in result order.
    pub rows: Vec<TextRow>,
}

impl TextTable {
    /// Rows as JSON objects keyed by column name; `NULL` becomes `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        self.rows
            .iter()
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(
                        row.iter()
                            .map(|value| value.clone().map_or(serde_json::Value::Null, serde_json::Value::String)),
                    )
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect()
    }
}

/// The narrow interface through which ad hoc SQL is issued.
#[derive(Debug, Clone)]
pub struct Executor {
    pool: PgPool,
}

impl Executor {
    /// Wrap a pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for repositories.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for the connection to be released.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Run a statement that returns no rows (DDL or DML).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    #[instrument(skip_all)]
    pub async fn execute_update(&self, statement: Statement<'_>) -> Result<u64, RepositoryError> {
        let result = statement.execute(&self.pool).await?;
        debug!(rows_affected = result.rows_affected(), "Statement executed");
        Ok(result.rows_affected())
    }

    /// Run a query and return every row as text values.
    ///
    /// An empty result set yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails and
    /// `RepositoryError::UnsupportedColumn` for columns that cannot be rendered.
    pub async fn query_and_return(
        &self,
        statement: Statement<'_>,
    ) -> Result<Vec<TextRow>, RepositoryError> {
        Ok(self.query_table(statement).await?.rows)
    }

    /// Run a query and return rows together with their column names.
    ///
    /// # Errors
    ///
    /// Same as [`Executor::query_and_return`].
    #[instrument(skip_all)]
    pub async fn query_table(&self, statement: Statement<'_>) -> Result<TextTable, RepositoryError> {
        let rows = statement.fetch_all(&self.pool).await?;
        debug!(rows = rows.len(), "Query returned");
        to_table(&rows)
    }

    /// Run a query and print it to `out`: a header of column names, then one
    /// tab-separated line per row. Nothing is printed for an empty result.
    ///
    /// Returns the number of rows printed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails and
    /// `RepositoryError::Output` if writing fails.
    pub async fn query_and_print(
        &self,
        statement: Statement<'_>,
        out: &mut impl Write,
    ) -> Result<usize, RepositoryError> {
        let table = self.query_table(statement).await?;
        write_table(&table, out)?;
        Ok(table.rows.len())
    }
}

/// Write a table as tab-separated text, `NULL` rendered as `null`.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_table(table: &TextTable, out: &mut impl Write) -> std::io::Result<()> {
    if table.rows.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", table.columns.join("\t"))?;
    for row in &table.rows {
        let line: Vec<&str> = row
            .iter()
            .map(|value| value.as_deref().unwrap_or("null"))
            .collect();
        writeln!(out, "{}", line.join("\t"))?;
    }
    Ok(())
}

fn to_table(rows: &[PgRow]) -> Result<TextTable, RepositoryError> {
    let columns = rows
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_owned()).collect())
        .unwrap_or_default();

    let rows = rows
        .iter()
        .map(|row| {
            (0..row.len())
                .map(|i| column_text(row, i))
                .collect::<Result<TextRow, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TextTable { columns, rows })
}

/// Render one column of `row` as text.
fn column_text(row: &PgRow, index: usize) -> Result<Option<String>, RepositoryError> {
    fn text<T: ToString>(value: Option<T>) -> Option<String> {
        value.map(|v| v.to_string())
    }

    let column = row.column(index);
    // Single-byte "char" (e.g. pg_class.relkind) only decodes as i8.
    if *column.type_info() == <i8 as sqlx::Type<Postgres>>::type_info() {
        let byte = row.try_get::<Option<i8>, _>(index)?;
        return Ok(byte.map(|b| char::from(u8::from_ne_bytes(b.to_ne_bytes())).to_string()));
    }
    let type_name = column.type_info().name();

    let value = match type_name {
        "BOOL" => text(row.try_get::<Option<bool>, _>(index)?),
        "INT2" => text(row.try_get::<Option<i16>, _>(index)?),
        "INT4" => text(row.try_get::<Option<i32>, _>(index)?),
        "INT8" => text(row.try_get::<Option<i64>, _>(index)?),
        "FLOAT4" => text(row.try_get::<Option<f32>, _>(index)?),
        "FLOAT8" => text(row.try_get::<Option<f64>, _>(index)?),
        "NUMERIC" => text(row.try_get::<Option<Decimal>, _>(index)?),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" | "UNKNOWN" => {
            row.try_get::<Option<String>, _>(index)?
        }
        "DATE" => text(row.try_get::<Option<NaiveDate>, _>(index)?),
        "TIMESTAMP" => text(row.try_get::<Option<NaiveDateTime>, _>(index)?),
        "TIMESTAMPTZ" => text(row.try_get::<Option<DateTime<Utc>>, _>(index)?),
        other => {
            return Err(RepositoryError::UnsupportedColumn {
                column: column.name().to_owned(),
                type_name: other.to_owned(),
            });
        }
    };

    Ok(value)
}
