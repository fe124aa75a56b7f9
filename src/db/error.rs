use rusqlite::types::FromSqlError;
use thiserror::Error;

/// Failures surfaced by the data access layer. Nothing here is retried; each
/// variant reaches the caller of the failing operation unchanged.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The locator matched neither the record nor the filter pattern, or named
    /// a pattern the operation does not accept.
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Unknown columns in projection: {}", .0.join(", "))]
    InvalidProjection(Vec<String>),

    #[error("No values supplied for update")]
    EmptyValues,

    /// A write tried to store something other than a rating code in the
    /// `rating` column.
    #[error("Invalid rating value: {0}")]
    InvalidRating(String),

    /// A write named a column only storage may set.
    #[error("Column {0} is assigned by storage and cannot be written")]
    ReadOnlyColumn(&'static str),

    #[error("Cannot downgrade database from version {from} to {to}")]
    DowngradeRefused { from: i64, to: i64 },

    #[error("Unexpected column value: {0}")]
    Conversion(#[from] FromSqlError),

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}
