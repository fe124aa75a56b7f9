use std::collections::BTreeMap;

use rusqlite::types::Value;

use crate::models::Rating;

use super::schema::Column;

/// Column/value pairs for an insert or update. Keys are [`Column`]s, so a value
/// can never name a field the table does not have.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentValues {
    /// Ordered by column so generated SQL is stable for the same set of keys.
    values: BTreeMap<Column, Value>,
}

impl ContentValues {
    /// An empty set. Inserting it stores a row with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an integer value, replacing whatever `column` held before. The
    /// provider validates the pair when it is written, not here.
    pub fn put_i64(&mut self, column: Column, value: i64) {
        self.values.insert(column, Value::Integer(value));
    }

    /// Set a text value, replacing whatever `column` held before.
    pub fn put_text(&mut self, column: Column, value: impl Into<String>) {
        self.values.insert(column, Value::Text(value.into()));
    }

    /// Store a rating by its integer code. This is the only way the app
    /// itself writes the `rating` column.
    pub fn put_rating(&mut self, column: Column, rating: Rating) {
        self.put_i64(column, rating.code());
    }

    /// Value currently set for `column`, if any.
    pub fn get(&self, column: Column) -> Option<&Value> {
        self.values.get(&column)
    }

    /// Number of columns set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Column, &Value)> {
        self.values.iter().map(|(column, value)| (*column, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_puts_replace_earlier_ones() {
        let mut values = ContentValues::new();
        assert!(values.is_empty());
        values.put_rating(Column::Rating, Rating::Liked);
        values.put_rating(Column::Rating, Rating::Disliked);
        values.put_text(Column::Text, "pun");

        assert_eq!(values.len(), 2);
        assert_eq!(values.get(Column::Rating), Some(&Value::Integer(2)));
        let columns: Vec<Column> = values.iter().map(|(column, _)| column).collect();
        assert_eq!(columns, vec![Column::Text, Column::Rating]);
    }
}
