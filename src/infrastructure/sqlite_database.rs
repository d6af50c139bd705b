use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::DatabaseInterface;
use crate::models::{Customer, Item, ItemWithReviews, NewCustomer, NewItem, NewReview, Review};
use crate::schema::{self, CUSTOMERS, ITEMS};

const REVIEW_COLUMNS: &str = "id, comment, customer_id, item_id";

/// SQLite implementation of the database interface
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Connect with foreign key enforcement switched on for every pooled connection.
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| {
                AppError::ConfigurationError(format!("Invalid database url {}: {}", config.url, e))
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        // Connections are never recycled: an in-memory database dies with its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size())
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {}", config.url), e))?;

        info!(url = %config.url, pool_size = config.pool_size(), "connected to sqlite");
        Ok(Self { pool })
    }

    /// Fresh in-memory database with the schema already created
    pub async fn new_in_memory() -> AppResult<Self> {
        let db = Self::new(&DatabaseConfig::in_memory()).await?;
        db.initialize().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn row_exists(conn: &mut SqliteConnection, table: &str, id: i64) -> AppResult<bool> {
    let sql = format!("SELECT 1 FROM {} WHERE id = ?", table);
    let found = sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to look up {} {}", table, id), e))?;
    Ok(found.is_some())
}

/// Name the reference a rejected review insert was missing, if it can still be found.
async fn missing_reference(conn: &mut SqliteConnection, review: &NewReview) -> AppResult<Option<AppError>> {
    if !row_exists(conn, CUSTOMERS, review.customer_id).await? {
        return Ok(Some(AppError::ReferentialIntegrity(format!(
            "review references missing customer {}",
            review.customer_id
        ))));
    }
    if let Some(item_id) = review.item_id {
        if !row_exists(conn, ITEMS, item_id).await? {
            return Ok(Some(AppError::ReferentialIntegrity(format!(
                "review references missing item {}",
                item_id
            ))));
        }
    }
    Ok(None)
}

fn customer_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Customer with id {} not found", id))
}

fn item_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Item with id {} not found", id))
}

fn review_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Review with id {} not found", id))
}

#[async_trait]
impl DatabaseInterface for SqliteDatabase {
    async fn initialize(&self) -> AppResult<()> {
        for statement in schema::create_statements() {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to run `{}`", statement), e))?;
        }
        debug!("schema initialized");
        Ok(())
    }

    async fn create_customer(&self, customer: &NewCustomer) -> AppResult<Customer> {
        customer.validate()?;
        let result = sqlx::query("INSERT INTO customers (name) VALUES (?)")
            .bind(&customer.name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to create customer", e))?;

        let created = Customer {
            id: result.last_insert_rowid(),
            name: customer.name.clone(),
        };
        debug!("created {}", created);
        Ok(created)
    }

    async fn get_customer(&self, id: i64) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>("SELECT id, name FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get customer {}", id), e))?
            .ok_or_else(|| customer_not_found(id))
    }

    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        sqlx::query_as::<_, Customer>("SELECT id, name FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to list customers", e))
    }

    async fn update_customer(&self, id: i64, customer: &NewCustomer) -> AppResult<Customer> {
        customer.validate()?;
        let result = sqlx::query("UPDATE customers SET name = ? WHERE id = ?")
            .bind(&customer.name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update customer {}", id), e))?;

        if result.rows_affected() == 0 {
            return Err(customer_not_found(id));
        }
        Ok(Customer {
            id,
            name: customer.name.clone(),
        })
    }

    async fn delete_customer(&self, id: i64) -> AppResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database("Failed to begin transaction", e))?;

        // Same effect as ON DELETE CASCADE, but counted.
        let removed = sqlx::query("DELETE FROM reviews WHERE customer_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete reviews of customer {}", id), e))?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete customer {}", id), e))?
            .rows_affected();

        if deleted == 0 {
            return Err(customer_not_found(id));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database("Failed to commit transaction", e))?;
        info!(customer_id = id, reviews_removed = removed, "deleted customer");
        Ok(removed)
    }

    async fn create_item(&self, item: &NewItem) -> AppResult<Item> {
        item.validate()?;
        let result = sqlx::query("INSERT INTO items (name, price) VALUES (?, ?)")
            .bind(&item.name)
            .bind(item.price)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to create item", e))?;

        let created = Item {
            id: result.last_insert_rowid(),
            name: item.name.clone(),
            price: item.price,
        };
        debug!("created {}", created);
        Ok(created)
    }

    async fn get_item(&self, id: i64) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT id, name, price FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get item {}", id), e))?
            .ok_or_else(|| item_not_found(id))
    }

    async fn get_item_with_reviews(&self, id: i64) -> AppResult<ItemWithReviews> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database("Failed to begin transaction", e))?;

        let item = sqlx::query_as::<_, Item>("SELECT id, name, price FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to get item {}", id), e))?
            .ok_or_else(|| item_not_found(id))?;

        let sql = format!("SELECT {} FROM reviews WHERE item_id = ? ORDER BY id", REVIEW_COLUMNS);
        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to get reviews of item {}", id), e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database("Failed to commit transaction", e))?;
        Ok(ItemWithReviews { item, reviews })
    }

    async fn list_items(&self) -> AppResult<Vec<Item>> {
        sqlx::query_as::<_, Item>("SELECT id, name, price FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to list items", e))
    }

    async fn update_item(&self, id: i64, item: &NewItem) -> AppResult<Item> {
        item.validate()?;
        let result = sqlx::query("UPDATE items SET name = ?, price = ? WHERE id = ?")
            .bind(&item.name)
            .bind(item.price)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update item {}", id), e))?;

        if result.rows_affected() == 0 {
            return Err(item_not_found(id));
        }
        Ok(Item {
            id,
            name: item.name.clone(),
            price: item.price,
        })
    }

    async fn delete_item(&self, id: i64) -> AppResult<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database("Failed to begin transaction", e))?;

        let detached = sqlx::query("UPDATE reviews SET item_id = NULL WHERE item_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to detach reviews of item {}", id), e))?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete item {}", id), e))?
            .rows_affected();

        if deleted == 0 {
            return Err(item_not_found(id));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database("Failed to commit transaction", e))?;
        info!(item_id = id, reviews_detached = detached, "deleted item");
        Ok(detached)
    }

    async fn create_review(&self, review: &NewReview) -> AppResult<Review> {
        // Single statement: the store's foreign keys reject dangling references.
        let result = match sqlx::query("INSERT INTO reviews (comment, customer_id, item_id) VALUES (?, ?, ?)")
            .bind(&review.comment)
            .bind(review.customer_id)
            .bind(review.item_id)
            .execute(&self.pool)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                let err = AppError::database("Failed to create review", e);
                if matches!(err, AppError::ReferentialIntegrity(_)) {
                    let mut conn = self
                        .pool
                        .acquire()
                        .await
                        .map_err(|e| AppError::database("Failed to acquire connection", e))?;
                    if let Some(named) = missing_reference(&mut conn, review).await? {
                        return Err(named);
                    }
                }
                return Err(err);
            }
        };

        let created = Review {
            id: result.last_insert_rowid(),
            comment: review.comment.clone(),
            customer_id: review.customer_id,
            item_id: review.item_id,
        };
        debug!(
            customer_id = created.customer_id,
            item_id = ?created.item_id,
            "created {}",
            created
        );
        Ok(created)
    }

    async fn get_review(&self, id: i64) -> AppResult<Review> {
        let sql = format!("SELECT {} FROM reviews WHERE id = ?", REVIEW_COLUMNS);
        sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get review {}", id), e))?
            .ok_or_else(|| review_not_found(id))
    }

    async fn update_review_comment(&self, id: i64, comment: Option<String>) -> AppResult<Review> {
        let result = sqlx::query("UPDATE reviews SET comment = ? WHERE id = ?")
            .bind(&comment)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update review {}", id), e))?;

        if result.rows_affected() == 0 {
            return Err(review_not_found(id));
        }
        self.get_review(id).await
    }

    async fn delete_review(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete review {}", id), e))?;

        if result.rows_affected() == 0 {
            return Err(review_not_found(id));
        }
        Ok(())
    }

    async fn reviews_by_customer(&self, customer_id: i64) -> AppResult<Vec<Review>> {
        let sql = format!("SELECT {} FROM reviews WHERE customer_id = ? ORDER BY id", REVIEW_COLUMNS);
        sqlx::query_as::<_, Review>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to get reviews of customer {}", customer_id), e)
            })
    }

    async fn reviews_by_item(&self, item_id: i64) -> AppResult<Vec<Review>> {
        let sql = format!("SELECT {} FROM reviews WHERE item_id = ? ORDER BY id", REVIEW_COLUMNS);
        sqlx::query_as::<_, Review>(&sql)
            .bind(item_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get reviews of item {}", item_id), e))
    }

    async fn items_for_customer(&self, customer_id: i64) -> AppResult<Vec<Item>> {
        sqlx::query_as::<_, Item>(
            "SELECT items.id, items.name, items.price
             FROM reviews
             JOIN items ON items.id = reviews.item_id
             WHERE reviews.customer_id = ?
             ORDER BY reviews.id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get items of customer {}", customer_id), e))
    }
}
