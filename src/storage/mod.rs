// Persistence: the scraped dataset and per-run statistics in SQLite.

pub mod sqlite;

pub use sqlite::SqliteStorage;
