use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use super::error::ProviderError;
use super::schema;

/// Version written to `PRAGMA user_version`. Raising it wipes the joke table on
/// the next launch (see [`schema::upgrade`]).
pub const SCHEMA_VERSION: i64 = 1;

/// Open (or create) the database file and bring the schema up to
/// [`SCHEMA_VERSION`].
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    migrate(&conn, SCHEMA_VERSION).context("failed to prepare joke table")?;
    info!(path = %path.display(), version = SCHEMA_VERSION, "opened joke database");
    Ok(conn)
}

/// Fresh in-memory database at the current schema version.
pub fn open_in_memory() -> Result<Connection, ProviderError> {
    let conn = Connection::open_in_memory()?;
    migrate(&conn, SCHEMA_VERSION)?;
    Ok(conn)
}

/// Version currently recorded in the database file, `0` for a new file.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Create the table on a new database, or run the destructive upgrade when the
/// stored version is older than `target`. Newer databases are refused.
pub fn migrate(conn: &Connection, target: i64) -> Result<(), ProviderError> {
    let current = schema_version(conn)?;

    if current == 0 {
        schema::initialize(conn)?;
    } else if current < target {
        schema::upgrade(conn, current, target)?;
    } else if current > target {
        return Err(ProviderError::DowngradeRefused {
            from: current,
            to: target,
        });
    } else {
        return Ok(());
    }

    conn.execute_batch(&format!("PRAGMA user_version = {target}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_row(conn: &Connection, text: &str) {
        conn.execute(
            "INSERT INTO joke_table (text, rating) VALUES (?1, 0)",
            [text],
        )
        .unwrap();
    }

    fn row_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM joke_table", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn new_database_gets_current_version() {
        let conn = open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert_eq!(row_count(&conn), 0);
    }

    #[test]
    fn same_version_keeps_rows() {
        let conn = open_in_memory().unwrap();
        insert_row(&conn, "keep me");
        migrate(&conn, SCHEMA_VERSION).unwrap();
        assert_eq!(row_count(&conn), 1);
    }

    #[test]
    fn upgrade_from_one_to_two_empties_table() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn, 1).unwrap();
        insert_row(&conn, "first");
        insert_row(&conn, "second");

        migrate(&conn, 2).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), 2);
        assert_eq!(row_count(&conn), 0);
    }

    #[test]
    fn downgrade_is_refused() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn, 3).unwrap();
        let err = migrate(&conn, 2).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::DowngradeRefused { from: 3, to: 2 }
        ));
    }

    #[test]
    fn open_database_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jokes.db");

        {
            let conn = open_database(&path).unwrap();
            insert_row(&conn, "persisted");
        }

        let conn = open_database(&path).unwrap();
        assert_eq!(row_count(&conn), 1);
    }
}
