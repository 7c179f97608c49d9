//! Column decoding for core types stored as text: record ids and enum codes.
//!
//! Used by the hand-written `FromRow` impls whose rows carry an optional
//! reference; the derive's `try_from` attribute covers the rest.

use bizdesk_core::error::CoreError;
use sqlx::postgres::PgRow;
use sqlx::Row;

/// Decode a `NOT NULL` text column into a core type.
pub(crate) fn text<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: TryFrom<String, Error = CoreError>,
{
    let raw: String = row.try_get(column)?;
    T::try_from(raw).map_err(|e| column_error(column, e))
}

/// Decode a nullable text column into an optional core type.
pub(crate) fn optional_text<T>(row: &PgRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: TryFrom<String, Error = CoreError>,
{
    row.try_get::<Option<String>, _>(column)?
        .map(T::try_from)
        .transpose()
        .map_err(|e| column_error(column, e))
}

fn column_error(column: &str, err: CoreError) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    }
}
