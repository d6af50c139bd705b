// Customer / Item / Review store - schema, relationships and API views over SQLite

// Record types and insert payloads
pub mod models;

// Table definitions and DDL
pub mod schema;

// Storage seam and SQLite implementation
pub mod infrastructure;

// Relationship helpers and view assembly
pub mod services;
pub mod views;

// Common utilities
pub mod app_state;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use infrastructure::{DatabaseInterface, SqliteDatabase};
pub use models::{Customer, Item, ItemWithReviews, NewCustomer, NewItem, NewReview, Review};
pub use services::ReviewService;
