// ReviewService - relationship helpers and view assembly on top of the database interface

use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::AppResult;
use crate::infrastructure::DatabaseInterface;
use crate::models::{Customer, Item, NewReview, Review};
use crate::views::{CustomerView, ItemView, ReviewDetailView, ReviewView};

#[derive(Clone)]
pub struct ReviewService {
    db: Arc<dyn DatabaseInterface>,
}

impl ReviewService {
    pub fn new(db: Arc<dyn DatabaseInterface>) -> Self {
        Self { db }
    }

    /// Append `item_id` to the customer's items by writing a review with no comment.
    ///
    /// The new review lands at the end of the customer's reviews. Reviewing the
    /// same item again creates another review.
    #[instrument(skip(self))]
    pub async fn add_item_review(&self, customer_id: i64, item_id: i64) -> AppResult<Review> {
        let review = self
            .db
            .create_review(&NewReview::new(customer_id).with_item(item_id))
            .await?;
        info!(review_id = review.id, "item added to customer");
        Ok(review)
    }

    /// Items the customer has reviewed, in review order, one entry per review.
    #[instrument(skip(self))]
    pub async fn items_for_customer(&self, customer_id: i64) -> AppResult<Vec<Item>> {
        self.db.get_customer(customer_id).await?;
        self.db.items_for_customer(customer_id).await
    }

    pub async fn review_customer(&self, review_id: i64) -> AppResult<Customer> {
        let review = self.db.get_review(review_id).await?;
        self.db.get_customer(review.customer_id).await
    }

    /// `None` for a review that names no item
    pub async fn review_item(&self, review_id: i64) -> AppResult<Option<Item>> {
        let review = self.db.get_review(review_id).await?;
        match review.item_id {
            Some(item_id) => Ok(Some(self.db.get_item(item_id).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn customer_view(&self, customer_id: i64) -> AppResult<CustomerView> {
        let customer = self.db.get_customer(customer_id).await?;
        let reviews = self.db.reviews_by_customer(customer_id).await?;
        Ok(CustomerView::new(customer, reviews))
    }

    #[instrument(skip(self))]
    pub async fn item_view(&self, item_id: i64) -> AppResult<ItemView> {
        Ok(self.db.get_item_with_reviews(item_id).await?.into())
    }

    pub async fn review_view(&self, review_id: i64) -> AppResult<ReviewView> {
        Ok(self.db.get_review(review_id).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn review_detail(&self, review_id: i64) -> AppResult<ReviewDetailView> {
        let review = self.db.get_review(review_id).await?;
        let customer = self.db.get_customer(review.customer_id).await?;
        let item = match review.item_id {
            Some(item_id) => Some(self.db.get_item(item_id).await?),
            None => None,
        };
        Ok(ReviewDetailView::new(review, customer, item))
    }
}
