//! Locator-routed access to `joke_table`. Every read and write in the app goes
//! through [`JokeProvider`] so that writes can notify whoever is showing the
//! affected rows.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use tracing::debug;

use super::cursor::JokeCursor;
use super::error::ProviderError;
use super::locator::Locator;
use super::notify::{ChangeNotifier, Subscription};
use super::schema::{Column, TABLE_NAME};
use super::values::ContentValues;
use crate::models::Rating;

pub struct JokeProvider {
    conn: Connection,
    notifier: ChangeNotifier,
}

impl JokeProvider {
    /// Wrap a connection whose schema is already prepared (see
    /// [`super::open_database`]).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Read the jokes selected by a filter locator. `projection` limits the
    /// returned columns; `None` returns all of them in table order.
    pub fn query(
        &mut self,
        locator: &str,
        projection: Option<&[&str]>,
    ) -> Result<JokeCursor, ProviderError> {
        let parsed: Locator = locator.parse()?;
        let filter = match parsed {
            Locator::Filter(filter) => filter,
            Locator::Record(_) => return Err(ProviderError::UnknownResource(locator.to_string())),
        };
        let columns = check_columns(projection)?;

        let column_list = columns
            .iter()
            .map(|column| column.name())
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {column_list} FROM {TABLE_NAME}");
        let mut args: Vec<Value> = Vec::new();
        if let Some(rating) = filter.rating() {
            sql.push_str(" WHERE rating = ?1");
            args.push(Value::Integer(rating.code()));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), |row| {
                (0..columns.len())
                    .map(|index| row.get::<_, Value>(index))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(locator = %parsed, rows = rows.len(), "queried jokes");

        let names = columns.iter().map(|column| column.name().to_string()).collect();
        let changes = self.notifier.register(parsed);
        Ok(JokeCursor::new(parsed, names, rows, changes))
    }

    /// Store a new joke. The id segment of the locator, if any, is ignored;
    /// the returned locator carries the id storage assigned.
    pub fn insert(&mut self, locator: &str, values: &ContentValues) -> Result<Locator, ProviderError> {
        let parsed: Locator = locator.parse()?;
        if !matches!(parsed, Locator::Record(_)) {
            return Err(ProviderError::UnknownResource(locator.to_string()));
        }
        check_values(values)?;

        if values.is_empty() {
            self.conn
                .execute(&format!("INSERT INTO {TABLE_NAME} DEFAULT VALUES"), [])?;
        } else {
            let names = values
                .iter()
                .map(|(column, _)| column.name())
                .collect::<Vec<_>>()
                .join(", ");
            let placeholders = (1..=values.len())
                .map(|index| format!("?{index}"))
                .collect::<Vec<_>>()
                .join(", ");
            self.conn.execute(
                &format!("INSERT INTO {TABLE_NAME} ({names}) VALUES ({placeholders})"),
                params_from_iter(values.iter().map(|(_, value)| value)),
            )?;
        }

        let id = self.conn.last_insert_rowid();
        debug!(id, "inserted joke");
        let created = Locator::record(id);
        self.notifier.notify(created);
        Ok(created)
    }

    /// Apply `values` to the joke the locator names. Returns the number of rows
    /// changed, `0` when the id does not exist.
    pub fn update(&mut self, locator: &str, values: &ContentValues) -> Result<usize, ProviderError> {
        let (parsed, id) = record_locator(locator)?;
        if values.is_empty() {
            return Err(ProviderError::EmptyValues);
        }
        check_values(values)?;

        let assignments = values
            .iter()
            .enumerate()
            .map(|(index, (column, _))| format!("{} = ?{}", column.name(), index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let id_param = values.len() + 1;
        let mut args: Vec<&Value> = values.iter().map(|(_, value)| value).collect();
        let id_value = Value::Integer(id);
        args.push(&id_value);

        let updated = self.conn.execute(
            &format!("UPDATE {TABLE_NAME} SET {assignments} WHERE id = ?{id_param}"),
            params_from_iter(args),
        )?;

        debug!(id, updated, "updated joke");
        if updated > 0 {
            self.notifier.notify(parsed);
        }
        Ok(updated)
    }

    /// Remove the joke the locator names. Returns the number of rows removed.
    pub fn delete(&mut self, locator: &str) -> Result<usize, ProviderError> {
        let (parsed, id) = record_locator(locator)?;

        let deleted = self
            .conn
            .execute(&format!("DELETE FROM {TABLE_NAME} WHERE id = ?1"), [id])?;

        debug!(id, deleted, "deleted joke");
        if deleted > 0 {
            self.notifier.notify(parsed);
        }
        Ok(deleted)
    }

    /// Subscribe to writes without running a query.
    pub fn register_observer(&mut self, locator: Locator) -> Subscription {
        self.notifier.register(locator)
    }
}

/// Parse a locator that must name one stored joke.
fn record_locator(locator: &str) -> Result<(Locator, i64), ProviderError> {
    let parsed: Locator = locator.parse()?;
    match parsed {
        Locator::Record(Some(id)) => Ok((parsed, id)),
        _ => Err(ProviderError::UnknownResource(locator.to_string())),
    }
}

/// Refuse writes to the id and any rating that is not a stored rating code.
fn check_values(values: &ContentValues) -> Result<(), ProviderError> {
    if values.get(Column::Id).is_some() {
        return Err(ProviderError::ReadOnlyColumn(Column::Id.name()));
    }
    match values.get(Column::Rating) {
        None => Ok(()),
        Some(Value::Integer(code)) if Rating::from_code(*code).is_some() => Ok(()),
        Some(other) => Err(ProviderError::InvalidRating(format!("{other:?}"))),
    }
}

/// Resolve a projection to columns, rejecting any name the table lacks.
fn check_columns(projection: Option<&[&str]>) -> Result<Vec<Column>, ProviderError> {
    let Some(requested) = projection else {
        return Ok(Column::ALL.to_vec());
    };

    let unknown: Vec<String> = requested
        .iter()
        .filter(|name| Column::from_name(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(ProviderError::InvalidProjection(unknown));
    }

    Ok(requested.iter().filter_map(|name| Column::from_name(name)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::models::{Joke, RatingFilter};

    const ALL_COLUMNS: &[&str] = &["id", "text", "rating"];

    fn provider() -> JokeProvider {
        JokeProvider::new(open_in_memory().unwrap())
    }

    fn filter_locator(filter: RatingFilter) -> String {
        Locator::filter(filter).to_string()
    }

    fn insert_joke(provider: &mut JokeProvider, text: &str) -> i64 {
        let created = provider
            .insert(&Locator::new_record().to_string(), &Joke::new(text).to_values())
            .unwrap();
        created.record_id().unwrap()
    }

    fn set_rating(provider: &mut JokeProvider, id: i64, rating: Rating) -> usize {
        let mut values = ContentValues::new();
        values.put_rating(Column::Rating, rating);
        provider
            .update(&Locator::record(id).to_string(), &values)
            .unwrap()
    }

    fn read_all(cursor: &mut JokeCursor) -> Vec<Joke> {
        let mut jokes = Vec::new();
        while cursor.move_to_next() {
            jokes.push(Joke::from_cursor(cursor).unwrap());
        }
        jokes
    }

    fn query(provider: &mut JokeProvider, filter: RatingFilter) -> Vec<Joke> {
        let mut cursor = provider
            .query(&filter_locator(filter), Some(ALL_COLUMNS))
            .unwrap();
        read_all(&mut cursor)
    }

    #[test]
    fn first_insert_is_visible_under_show_all() {
        let mut provider = provider();
        let text = "Why did the chicken cross the road?";
        let id = insert_joke(&mut provider, text);
        assert_eq!(id, 1);

        let mut cursor = provider
            .query(&filter_locator(RatingFilter::ShowAll), Some(ALL_COLUMNS))
            .unwrap();
        assert_eq!(cursor.len(), 1);
        assert!(cursor.move_to_first());
        assert_eq!(cursor.get_i64(0).unwrap(), 1);
        assert_eq!(cursor.get_string(1).unwrap(), text);
        assert_eq!(cursor.get_i64(2).unwrap(), 0);
    }

    #[test]
    fn each_insert_appears_once_unrated() {
        let mut provider = provider();
        for text in ["one", "two", "three"] {
            insert_joke(&mut provider, text);
        }

        let jokes = query(&mut provider, RatingFilter::ShowAll);
        for text in ["one", "two", "three"] {
            let matches: Vec<&Joke> = jokes.iter().filter(|joke| joke.text == text).collect();
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].rating, Rating::Unrated);
        }
    }

    #[test]
    fn liked_jokes_follow_the_filter() {
        let mut provider = provider();
        let id = insert_joke(&mut provider, "pun");
        insert_joke(&mut provider, "other");

        assert_eq!(set_rating(&mut provider, id, Rating::Liked), 1);

        let liked = query(&mut provider, RatingFilter::Only(Rating::Liked));
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].id, id);
        assert!(query(&mut provider, RatingFilter::Only(Rating::Disliked)).is_empty());
        assert_eq!(query(&mut provider, RatingFilter::Only(Rating::Unrated)).len(), 1);
    }

    #[test]
    fn insert_update_query_round_trip() {
        let mut provider = provider();
        let id = insert_joke(&mut provider, "A");
        set_rating(&mut provider, id, Rating::Disliked);

        let disliked = query(&mut provider, RatingFilter::Only(Rating::Disliked));
        assert_eq!(disliked.len(), 1);
        assert_eq!(disliked[0].text, "A");
        assert_eq!(disliked[0].rating, Rating::Disliked);
    }

    #[test]
    fn delete_removes_the_row() {
        let mut provider = provider();
        let id = insert_joke(&mut provider, "gone soon");
        let kept = insert_joke(&mut provider, "stays");

        assert_eq!(provider.delete(&Locator::record(id).to_string()).unwrap(), 1);

        let ids: Vec<i64> = query(&mut provider, RatingFilter::ShowAll)
            .iter()
            .map(|joke| joke.id)
            .collect();
        assert_eq!(ids, vec![kept]);
    }

    #[test]
    fn missing_ids_change_nothing_and_stay_silent() {
        let mut provider = provider();
        insert_joke(&mut provider, "present");
        let cursor = provider
            .query(&filter_locator(RatingFilter::ShowAll), None)
            .unwrap();

        assert_eq!(provider.delete(&Locator::record(99).to_string()).unwrap(), 0);
        assert_eq!(set_rating(&mut provider, 99, Rating::Liked), 0);
        assert!(!cursor.has_changed());
    }

    #[test]
    fn writes_notify_open_cursors() {
        let mut provider = provider();
        let cursor = provider
            .query(&filter_locator(RatingFilter::Only(Rating::Liked)), None)
            .unwrap();
        let id = insert_joke(&mut provider, "new");
        assert!(cursor.has_changed());

        set_rating(&mut provider, id, Rating::Liked);
        assert!(cursor.has_changed());

        provider.delete(&Locator::record(id).to_string()).unwrap();
        assert!(cursor.has_changed());
    }

    #[test]
    fn insert_ignores_the_id_segment() {
        let mut provider = provider();
        let created = provider
            .insert(&Locator::record(42).to_string(), &Joke::new("x").to_values())
            .unwrap();
        assert_eq!(created, Locator::record(1));
    }

    #[test]
    fn unknown_projection_column_is_rejected_without_writes() {
        let mut provider = provider();
        insert_joke(&mut provider, "untouched");

        let err = provider
            .query(&filter_locator(RatingFilter::ShowAll), Some(&["id", "bogus"][..]))
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidProjection(ref cols) if cols == &["bogus"]));

        let jokes = query(&mut provider, RatingFilter::ShowAll);
        assert_eq!(jokes.len(), 1);
        assert_eq!(jokes[0].text, "untouched");
    }

    #[test]
    fn projection_limits_columns() {
        let mut provider = provider();
        insert_joke(&mut provider, "only text");
        let mut cursor = provider
            .query(&filter_locator(RatingFilter::ShowAll), Some(&["text"][..]))
            .unwrap();
        assert_eq!(cursor.columns(), ["text"]);
        cursor.move_to_first();
        assert_eq!(cursor.get_string(0).unwrap(), "only text");
        assert!(Joke::from_cursor(&cursor).is_err());
    }

    #[test]
    fn operations_reject_the_wrong_locator_kind() {
        let mut provider = provider();
        let values = Joke::new("x").to_values();
        let filter = filter_locator(RatingFilter::ShowAll);
        let new_record = Locator::new_record().to_string();

        assert!(matches!(
            provider.query(&Locator::record(1).to_string(), None),
            Err(ProviderError::UnknownResource(_))
        ));
        assert!(matches!(
            provider.insert(&filter, &values),
            Err(ProviderError::UnknownResource(_))
        ));
        assert!(matches!(
            provider.update(&new_record, &values),
            Err(ProviderError::UnknownResource(_))
        ));
        assert!(matches!(
            provider.delete(&filter),
            Err(ProviderError::UnknownResource(_))
        ));
        assert!(matches!(
            provider.delete("not a locator"),
            Err(ProviderError::UnknownResource(_))
        ));
    }

    #[test]
    fn storage_failures_propagate() {
        let mut provider = provider();
        let mut values = ContentValues::new();
        values.put_rating(Column::Rating, Rating::Liked);

        let err = provider
            .insert(&Locator::new_record().to_string(), &values)
            .unwrap_err();
        assert!(matches!(err, ProviderError::Storage(_)));

        let err = provider
            .update(&Locator::record(1).to_string(), &ContentValues::new())
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyValues));
    }

    #[test]
    fn explicit_observers_hear_record_writes() {
        let mut provider = provider();
        let id = insert_joke(&mut provider, "watched");
        let watcher = provider.register_observer(Locator::record(id));

        set_rating(&mut provider, id, Rating::Liked);
        assert_eq!(watcher.try_recv().unwrap(), Locator::record(id));
    }

    fn stored(provider: &mut JokeProvider) -> Vec<(i64, String, i64)> {
        let mut stmt = provider
            .connection()
            .prepare("SELECT id, text, rating FROM joke_table ORDER BY id")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn out_of_range_ratings_are_never_stored() {
        let mut provider = provider();
        let id = insert_joke(&mut provider, "rated");
        let cursor = provider
            .query(&filter_locator(RatingFilter::ShowAll), None)
            .unwrap();

        let mut bad_code = ContentValues::new();
        bad_code.put_i64(Column::Rating, 7);
        let mut bad_type = ContentValues::new();
        bad_type.put_text(Column::Rating, "liked");

        for values in [&bad_code, &bad_type] {
            assert!(matches!(
                provider.update(&Locator::record(id).to_string(), values),
                Err(ProviderError::InvalidRating(_))
            ));
        }

        let mut new_joke = Joke::new("sneaky").to_values();
        new_joke.put_i64(Column::Rating, -1);
        assert!(matches!(
            provider.insert(&Locator::new_record().to_string(), &new_joke),
            Err(ProviderError::InvalidRating(_))
        ));

        assert_eq!(stored(&mut provider), vec![(id, "rated".to_string(), 0)]);
        assert!(!cursor.has_changed());
        assert_eq!(query(&mut provider, RatingFilter::ShowAll).len(), 1);
    }

    #[test]
    fn ids_cannot_be_written() {
        let mut provider = provider();
        let id = insert_joke(&mut provider, "fixed id");

        let mut renumber = ContentValues::new();
        renumber.put_i64(Column::Id, 99);
        assert!(matches!(
            provider.update(&Locator::record(id).to_string(), &renumber),
            Err(ProviderError::ReadOnlyColumn("id"))
        ));

        let mut chosen_id = Joke::new("picked").to_values();
        chosen_id.put_i64(Column::Id, 500);
        assert!(matches!(
            provider.insert(&Locator::new_record().to_string(), &chosen_id),
            Err(ProviderError::ReadOnlyColumn("id"))
        ));

        assert_eq!(stored(&mut provider), vec![(id, "fixed id".to_string(), 0)]);
    }

    #[test]
    fn insert_notifies_the_assigned_record_only() {
        let mut provider = provider();
        let existing = insert_joke(&mut provider, "already here");
        let watcher = provider.register_observer(Locator::record(existing));

        let created = provider
            .insert(&Locator::record(existing).to_string(), &Joke::new("new").to_values())
            .unwrap();
        assert_ne!(created, Locator::record(existing));
        assert!(watcher.try_recv().is_err());

        let new_watcher = provider.register_observer(created);
        set_rating(&mut provider, created.record_id().unwrap(), Rating::Liked);
        assert_eq!(new_watcher.try_recv().unwrap(), created);
    }
}
