// API-facing shapes. Each view embeds related records only one level deep,
// so a customer's reviews never carry the customer again and an item's reviews
// never carry the item again.

use serde::Serialize;

use crate::models::{Customer, Item, ItemWithReviews, Review};

/// A review as listed under its customer or item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
    pub id: i64,
    pub comment: Option<String>,
    pub customer_id: i64,
    pub item_id: Option<i64>,
}

impl From<Review> for ReviewView {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            comment: review.comment,
            customer_id: review.customer_id,
            item_id: review.item_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerView {
    pub id: i64,
    pub name: String,
    pub reviews: Vec<ReviewView>,
}

impl CustomerView {
    pub fn new(customer: Customer, reviews: Vec<Review>) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            reviews: reviews.into_iter().map(ReviewView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub reviews: Vec<ReviewView>,
}

impl From<ItemWithReviews> for ItemView {
    fn from(loaded: ItemWithReviews) -> Self {
        Self {
            id: loaded.item.id,
            name: loaded.item.name,
            price: loaded.item.price,
            reviews: loaded.reviews.into_iter().map(ReviewView::from).collect(),
        }
    }
}

/// Customer without its review collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    pub id: i64,
    pub name: String,
}

impl From<Customer> for CustomerSummary {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
        }
    }
}

/// Item without its review collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

impl From<Item> for ItemSummary {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
        }
    }
}

/// A single review with both ends resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDetailView {
    pub id: i64,
    pub comment: Option<String>,
    pub customer_id: i64,
    pub item_id: Option<i64>,
    pub customer: CustomerSummary,
    pub item: Option<ItemSummary>,
}

impl ReviewDetailView {
    pub fn new(review: Review, customer: Customer, item: Option<Item>) -> Self {
        Self {
            id: review.id,
            comment: review.comment,
            customer_id: review.customer_id,
            item_id: review.item_id,
            customer: customer.into(),
            item: item.map(ItemSummary::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn review(id: i64, item_id: Option<i64>) -> Review {
        Review {
            id,
            comment: None,
            customer_id: 1,
            item_id,
        }
    }

    #[test]
    fn test_customer_view_does_not_embed_customer_in_reviews() {
        let customer = Customer { id: 1, name: "Ada".to_string() };
        let view = CustomerView::new(customer, vec![review(10, Some(2)), review(11, None)]);
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "Ada",
                "reviews": [
                    {"id": 10, "comment": null, "customer_id": 1, "item_id": 2},
                    {"id": 11, "comment": null, "customer_id": 1, "item_id": null}
                ]
            })
        );
        for entry in value["reviews"].as_array().unwrap() {
            assert!(entry.get("customer").is_none());
        }
    }

    #[test]
    fn test_item_view_does_not_embed_item_in_reviews() {
        let loaded = ItemWithReviews {
            item: Item { id: 2, name: "Widget".to_string(), price: 9.99 },
            reviews: vec![review(10, Some(2))],
        };
        let value = serde_json::to_value(ItemView::from(loaded)).unwrap();

        assert_eq!(value["price"], json!(9.99));
        let entry = &value["reviews"][0];
        assert!(entry.get("item").is_none());
        assert_eq!(entry["item_id"], json!(2));
    }

    #[test]
    fn test_review_detail_omits_back_references() {
        let detail = ReviewDetailView::new(
            Review {
                id: 5,
                comment: Some("great".to_string()),
                customer_id: 1,
                item_id: Some(2),
            },
            Customer { id: 1, name: "Ada".to_string() },
            Some(Item { id: 2, name: "Widget".to_string(), price: 9.99 }),
        );
        let value = serde_json::to_value(&detail).unwrap();

        assert_eq!(value["customer"], json!({"id": 1, "name": "Ada"}));
        assert_eq!(value["item"], json!({"id": 2, "name": "Widget", "price": 9.99}));
        assert!(value["customer"].get("reviews").is_none());
        assert!(value["item"].get("reviews").is_none());
    }

    #[test]
    fn test_review_detail_without_item() {
        let detail = ReviewDetailView::new(
            review(6, None),
            Customer { id: 1, name: "Ada".to_string() },
            None,
        );
        let value = serde_json::to_value(&detail).unwrap();
        assert!(value["item"].is_null());
        assert!(value["item_id"].is_null());
    }
}
