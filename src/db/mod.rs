//! Persistence module split across logical submodules. The provider is the
//! only entry point that writes; everything else describes what it reads and
//! who gets told about changes.

mod connection;
mod cursor;
mod error;
mod locator;
mod notify;
mod provider;
pub mod schema;
mod values;

pub use connection::{migrate, open_database, open_in_memory, schema_version, SCHEMA_VERSION};
pub use cursor::JokeCursor;
pub use error::ProviderError;
pub use locator::{Locator, AUTHORITY, BASE_PATH};
pub use notify::{ChangeNotifier, Subscription};
pub use provider::JokeProvider;
pub use schema::Column;
pub use values::ContentValues;
