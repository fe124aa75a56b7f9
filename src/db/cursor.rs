use rusqlite::types::{FromSql, Value, ValueRef};

use crate::models::Rating;

use super::error::ProviderError;
use super::locator::Locator;
use super::notify::Subscription;

/// Result of a provider query: the selected rows plus a subscription to writes
/// that may have made them stale.
///
/// Like a database cursor the position starts before the first row; call
/// [`JokeCursor::move_to_first`] or [`JokeCursor::move_to_position`] before
/// reading columns.
#[derive(Debug)]
pub struct JokeCursor {
    /// Filter locator the rows were read through.
    locator: Locator,
    /// Column names in projection order; row values line up with these.
    columns: Vec<String>,
    /// Materialized rows. Later writes never change them; refresh instead.
    rows: Vec<Vec<Value>>,
    /// `None` until the first move, i.e. before the first row.
    position: Option<usize>,
    /// Notifications for writes that may have made `rows` stale.
    changes: Subscription,
}

impl JokeCursor {
    pub(crate) fn new(
        locator: Locator,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
        changes: Subscription,
    ) -> Self {
        Self {
            locator,
            columns,
            rows,
            position: None,
            changes,
        }
    }

    /// The locator this result set was read from.
    pub fn locator(&self) -> Locator {
        self.locator
    }

    /// Names of the projected columns, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of a projected column by name, `None` when the query left it out.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Number of rows in the result.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Current row, `None` before the first move.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Point at `position`. Out of range positions leave the cursor where it
    /// was and return `false`.
    pub fn move_to_position(&mut self, position: usize) -> bool {
        if position < self.rows.len() {
            self.position = Some(position);
            true
        } else {
            false
        }
    }

    /// Point at the first row. Returns `false` on an empty result.
    pub fn move_to_first(&mut self) -> bool {
        self.move_to_position(0)
    }

    /// Advance one row, starting from the first when nothing was read yet.
    /// Returns `false` once the rows run out.
    pub fn move_to_next(&mut self) -> bool {
        let next = self.position.map_or(0, |position| position + 1);
        self.move_to_position(next)
    }

    /// Integer value of `column` in the current row.
    pub fn get_i64(&self, column: usize) -> Result<i64, ProviderError> {
        self.read(column)
    }

    /// Text value of `column` in the current row.
    pub fn get_string(&self, column: usize) -> Result<String, ProviderError> {
        self.read(column)
    }

    /// Rating stored in `column` of the current row. Unknown codes fail with
    /// [`ProviderError::Conversion`].
    pub fn get_rating(&self, column: usize) -> Result<Rating, ProviderError> {
        self.read(column)
    }

    /// Whether a write reached this result's locator since the last check.
    /// Pending notifications are consumed.
    pub fn has_changed(&self) -> bool {
        self.changes.drain()
    }

    /// Missing positions and columns both report `InvalidColumnIndex`.
    fn read<T: FromSql>(&self, column: usize) -> Result<T, ProviderError> {
        let position = self
            .position
            .ok_or(rusqlite::Error::InvalidColumnIndex(column))?;
        let value = self
            .rows
            .get(position)
            .and_then(|row| row.get(column))
            .ok_or(rusqlite::Error::InvalidColumnIndex(column))?;
        Ok(T::column_result(ValueRef::from(value))?)
    }
}
