use serde::{Deserialize, Serialize};
use std::fmt;

use super::Review;
use crate::error::{AppError, AppResult};

/// A row of the `items` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Item {}, {}, {}>", self.id, self.name, self.price)
    }
}

/// An item together with every review that references it, read in one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemWithReviews {
    pub item: Item,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        super::require_name("item", &self.name)?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation(format!(
                "item price must be a finite, non-negative number, got {}",
                self.price
            )));
        }
        Ok(())
    }
}
