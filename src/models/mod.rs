// Record types for the customers / items / reviews tables

pub mod customer;
pub mod item;
pub mod review;

pub use customer::{Customer, NewCustomer};
pub use item::{Item, ItemWithReviews, NewItem};
pub use review::{NewReview, Review};

use crate::error::{AppError, AppResult};

/// Reject names that are empty once surrounding whitespace is removed.
pub(crate) fn require_name(entity: &str, name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation(format!("{} name is required", entity)));
    }
    Ok(())
}
