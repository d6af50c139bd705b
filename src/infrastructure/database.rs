// Database Interface - storage seam for customers, items and reviews
// Relationship navigation is exposed as explicit foreign-key lookups.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Customer, Item, ItemWithReviews, NewCustomer, NewItem, NewReview, Review};

/// Storage operations for the review schema.
///
/// Lookups by id return `AppError::NotFound` when no row matches. Relationship
/// lookups (`reviews_by_customer`, `reviews_by_item`, `items_for_customer`) are
/// plain indexed queries and return an empty list for unknown ids.
#[async_trait]
pub trait DatabaseInterface: Send + Sync {
    /// Create tables and indexes if they do not exist yet
    async fn initialize(&self) -> AppResult<()>;

    // Customer operations
    async fn create_customer(&self, customer: &NewCustomer) -> AppResult<Customer>;
    async fn get_customer(&self, id: i64) -> AppResult<Customer>;
    async fn list_customers(&self) -> AppResult<Vec<Customer>>;
    async fn update_customer(&self, id: i64, customer: &NewCustomer) -> AppResult<Customer>;
    /// Deletes the customer and its reviews, returning how many reviews went with it
    async fn delete_customer(&self, id: i64) -> AppResult<u64>;

    // Item operations
    async fn create_item(&self, item: &NewItem) -> AppResult<Item>;
    async fn get_item(&self, id: i64) -> AppResult<Item>;
    async fn get_item_with_reviews(&self, id: i64) -> AppResult<ItemWithReviews>;
    async fn list_items(&self) -> AppResult<Vec<Item>>;
    async fn update_item(&self, id: i64, item: &NewItem) -> AppResult<Item>;
    /// Deletes the item and clears `item_id` on its reviews, returning how many were detached
    async fn delete_item(&self, id: i64) -> AppResult<u64>;

    // Review operations
    async fn create_review(&self, review: &NewReview) -> AppResult<Review>;
    async fn get_review(&self, id: i64) -> AppResult<Review>;
    async fn update_review_comment(&self, id: i64, comment: Option<String>) -> AppResult<Review>;
    async fn delete_review(&self, id: i64) -> AppResult<()>;

    // Relationship lookups, ordered by review id (insertion order)
    async fn reviews_by_customer(&self, customer_id: i64) -> AppResult<Vec<Review>>;
    async fn reviews_by_item(&self, item_id: i64) -> AppResult<Vec<Review>>;
    /// `review.item` projected over the customer's reviews; item-less reviews are skipped
    async fn items_for_customer(&self, customer_id: i64) -> AppResult<Vec<Item>>;
}
