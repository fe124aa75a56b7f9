//! Names, positions and DDL for the single `joke_table`.

use rusqlite::Connection;
use tracing::{info, warn};

pub const TABLE_NAME: &str = "joke_table";

pub const INDEX_ID: usize = 0;
pub const INDEX_TEXT: usize = 1;
pub const INDEX_RATING: usize = 2;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS joke_table (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    rating INTEGER NOT NULL CHECK (rating IN (0, 1, 2))
)";

const DROP_TABLE: &str = "DROP TABLE IF EXISTS joke_table";

/// Columns of `joke_table`, doubling as the keys of [`super::ContentValues`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Id,
    Text,
    Rating,
}

impl Column {
    /// Every column in table order. A query without a projection selects these.
    pub const ALL: [Column; 3] = [Column::Id, Column::Text, Column::Rating];

    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Text => "text",
            Column::Rating => "rating",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Column::Id => INDEX_ID,
            Column::Text => INDEX_TEXT,
            Column::Rating => INDEX_RATING,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Column::ALL.into_iter().find(|column| column.name() == name)
    }
}

/// Create the table when it does not exist yet.
pub fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(CREATE_TABLE, [])?;
    info!(table = TABLE_NAME, "ensured joke table exists");
    Ok(())
}

/// Move the table to a new schema version. There is no data migration: the
/// table is dropped and recreated, so every stored joke is lost.
pub fn upgrade(conn: &Connection, from: i64, to: i64) -> rusqlite::Result<()> {
    warn!(from, to, "upgrading joke table; existing rows are dropped");
    conn.execute(DROP_TABLE, [])?;
    initialize(conn)
}
