// Storage infrastructure
pub mod database;              // Database interface
pub mod sqlite_database;       // SQLite implementation

pub use database::DatabaseInterface;
pub use sqlite_database::SqliteDatabase;
