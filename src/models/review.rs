use serde::{Deserialize, Serialize};
use std::fmt;

/// A row of the `reviews` table, the join between a customer and an item.
///
/// `item_id` is optional: a review may belong to a customer without naming an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub comment: Option<String>,
    pub customer_id: i64,
    pub item_id: Option<i64>,
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Review {}>", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub comment: Option<String>,
    pub customer_id: i64,
    pub item_id: Option<i64>,
}

impl NewReview {
    pub fn new(customer_id: i64) -> Self {
        Self {
            comment: None,
            customer_id,
            item_id: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_item(mut self, item_id: i64) -> Self {
        self.item_id = Some(item_id);
        self
    }
}
