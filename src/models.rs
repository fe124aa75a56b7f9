//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. These types stay light-weight data holders so other layers can focus on
//! presentation and persistence logic.

use std::fmt;
use std::hash::{Hash, Hasher};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};

use crate::db::{Column, ContentValues, JokeCursor, ProviderError};

/// Rating stored alongside every joke. Only these three values ever reach the
/// table; the "show everything" option lives on [`RatingFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rating {
    /// Nobody has rated the joke yet. New jokes start here.
    #[default]
    Unrated,
    /// Marked with `l` in the list; shown with a green `[+]`.
    Liked,
    /// Marked with `d` in the list; shown with a red `[-]`.
    Disliked,
}

impl Rating {
    /// Integer encoding used in the `rating` column and in filter locators.
    pub fn code(self) -> i64 {
        match self {
            Rating::Unrated => 0,
            Rating::Liked => 1,
            Rating::Disliked => 2,
        }
    }

    /// Inverse of [`Rating::code`]. Codes outside `0..=2` have no rating.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Rating::Unrated),
            1 => Some(Rating::Liked),
            2 => Some(Rating::Disliked),
            _ => None,
        }
    }

    /// Name used in the filter menu, the header badge and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Rating::Unrated => "Unrated",
            Rating::Liked => "Liked",
            Rating::Disliked => "Disliked",
        }
    }
}

impl FromSql for Rating {
    /// Decode the `rating` column. Anything that is not one of the three
    /// codes surfaces as `OutOfRange` instead of being coerced.
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = i64::column_result(value)?;
        Rating::from_code(code).ok_or(FromSqlError::OutOfRange(code))
    }
}

/// Which jokes the list shows. `ShowAll` is encoded as `3` so it can travel
/// through the same integer slot as a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RatingFilter {
    /// Only jokes carrying exactly this rating.
    Only(Rating),
    /// Every joke regardless of rating. This is what a fresh install shows.
    #[default]
    ShowAll,
}

impl RatingFilter {
    /// Entries in the order the filter menu presents them.
    pub const ALL: [RatingFilter; 4] = [
        RatingFilter::Only(Rating::Liked),
        RatingFilter::Only(Rating::Disliked),
        RatingFilter::Only(Rating::Unrated),
        RatingFilter::ShowAll,
    ];

    const SHOW_ALL_CODE: i64 = 3;

    /// Integer used in the filter locator and in saved preferences.
    pub fn code(self) -> i64 {
        match self {
            RatingFilter::Only(rating) => rating.code(),
            RatingFilter::ShowAll => Self::SHOW_ALL_CODE,
        }
    }

    /// Inverse of [`RatingFilter::code`]; accepts `0..=3`.
    pub fn from_code(code: i64) -> Option<Self> {
        if code == Self::SHOW_ALL_CODE {
            Some(RatingFilter::ShowAll)
        } else {
            Rating::from_code(code).map(RatingFilter::Only)
        }
    }

    /// Menu and header text. Single-rating filters reuse the rating's label.
    pub fn label(self) -> &'static str {
        match self {
            RatingFilter::Only(rating) => rating.label(),
            RatingFilter::ShowAll => "Show All",
        }
    }

    /// The rating predicate this filter applies, if any.
    pub fn rating(self) -> Option<Rating> {
        match self {
            RatingFilter::Only(rating) => Some(rating),
            RatingFilter::ShowAll => None,
        }
    }
}

/// One joke row. Two jokes compare equal when their text matches, regardless
/// of id or rating, so list lookups by value find the same joke after a
/// re-query even if its rating changed.
#[derive(Debug, Clone)]
pub struct Joke {
    /// Primary key from the database, `0` until the joke has been inserted.
    pub id: i64,
    /// The joke itself, stored trimmed. Also the identity used by `PartialEq`.
    pub text: String,
    /// Current rating. Row views change it locally before the controller
    /// writes it back.
    pub rating: Rating,
}

impl Joke {
    /// A fresh, not yet stored joke.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: 0,
            text: text.into(),
            rating: Rating::Unrated,
        }
    }

    /// A joke as read back from storage.
    pub fn with_id(id: i64, text: impl Into<String>, rating: Rating) -> Self {
        Self {
            id,
            text: text.into(),
            rating,
        }
    }

    /// Field values written on insert and update.
    pub fn to_values(&self) -> ContentValues {
        let mut values = ContentValues::new();
        values.put_text(Column::Text, &self.text);
        values.put_rating(Column::Rating, self.rating);
        values
    }

    /// Read the joke under the cursor's current position. Columns are looked up
    /// by name so any projection containing all three works.
    pub fn from_cursor(cursor: &JokeCursor) -> Result<Self, ProviderError> {
        let id = cursor.get_i64(required_column(cursor, Column::Id)?)?;
        let text = cursor.get_string(required_column(cursor, Column::Text)?)?;
        let rating = cursor.get_rating(required_column(cursor, Column::Rating)?)?;
        Ok(Self { id, text, rating })
    }
}

/// Position of `column` in the cursor's projection, or an `InvalidProjection`
/// naming it when the query left it out.
fn required_column(cursor: &JokeCursor, column: Column) -> Result<usize, ProviderError> {
    cursor
        .column_index(column.name())
        .ok_or_else(|| ProviderError::InvalidProjection(vec![column.name().to_string()]))
}

impl PartialEq for Joke {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Joke {}

impl Hash for Joke {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for Joke {
    /// Write only the joke text so the type drops straight into list items.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jokes_compare_by_text_only() {
        let a = Joke::with_id(1, "Knock knock", Rating::Liked);
        let b = Joke::with_id(7, "Knock knock", Rating::Disliked);
        let c = Joke::with_id(1, "Who's there?", Rating::Liked);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn new_jokes_start_unrated_without_id() {
        let joke = Joke::new("Why did the chicken cross the road?");
        assert_eq!(joke.id, 0);
        assert_eq!(joke.rating, Rating::Unrated);
        assert_eq!(joke.to_string(), "Why did the chicken cross the road?");
    }

    #[test]
    fn filter_codes_cover_ratings_and_show_all() {
        assert_eq!(RatingFilter::ShowAll.code(), 3);
        assert_eq!(
            RatingFilter::from_code(2),
            Some(RatingFilter::Only(Rating::Disliked))
        );
        assert_eq!(RatingFilter::from_code(3), Some(RatingFilter::ShowAll));
        assert_eq!(RatingFilter::from_code(4), None);
        assert_eq!(Rating::from_code(3), None);
        assert_eq!(RatingFilter::default(), RatingFilter::ShowAll);
    }

    #[test]
    fn to_values_carries_text_and_rating() {
        let mut joke = Joke::new("Pun");
        joke.rating = Rating::Liked;
        let values = joke.to_values();
        assert_eq!(values.len(), 2);
        assert_eq!(
            values.get(Column::Rating),
            Some(&rusqlite::types::Value::Integer(1))
        );
        assert!(values.get(Column::Id).is_none());
    }
}
