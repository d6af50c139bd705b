use customer_reviews::config::DatabaseConfig;
use customer_reviews::{
    AppError, DatabaseInterface, NewCustomer, NewItem, NewReview, ReviewService, SqliteDatabase,
};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn test_db() -> SqliteDatabase {
    init_tracing();
    SqliteDatabase::new_in_memory().await.unwrap()
}

#[tokio::test]
async fn test_customer_crud() {
    let db = test_db().await;

    let ada = db.create_customer(&NewCustomer::new("Ada")).await.unwrap();
    let bob = db.create_customer(&NewCustomer::new("Bob")).await.unwrap();
    assert_ne!(ada.id, bob.id);

    let fetched = db.get_customer(ada.id).await.unwrap();
    assert_eq!(fetched, ada);

    let renamed = db
        .update_customer(ada.id, &NewCustomer::new("Ada Lovelace"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Ada Lovelace");
    assert_eq!(db.get_customer(ada.id).await.unwrap().name, "Ada Lovelace");

    let all = db.list_customers().await.unwrap();
    assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), vec![ada.id, bob.id]);

    db.delete_customer(bob.id).await.unwrap();
    assert!(db.get_customer(bob.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_item_crud() {
    let db = test_db().await;

    let widget = db.create_item(&NewItem::new("Widget", 9.99)).await.unwrap();
    assert_eq!(widget.name, "Widget");
    assert_eq!(widget.price, 9.99);
    assert_eq!(db.get_item(widget.id).await.unwrap(), widget);

    let repriced = db
        .update_item(widget.id, &NewItem::new("Widget", 12.5))
        .await
        .unwrap();
    assert_eq!(db.get_item(widget.id).await.unwrap(), repriced);
    assert_eq!(db.list_items().await.unwrap(), vec![repriced]);
}

#[tokio::test]
async fn test_validation_errors() {
    let db = test_db().await;

    let err = db.create_customer(&NewCustomer::new("")).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = db.create_item(&NewItem::new("Widget", -3.0)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let ada = db.create_customer(&NewCustomer::new("Ada")).await.unwrap();
    let err = db
        .update_customer(ada.id, &NewCustomer::new("  "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(db.get_customer(ada.id).await.unwrap().name, "Ada");

    assert_eq!(db.list_customers().await.unwrap().len(), 1);
    assert!(db.list_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let db = test_db().await;

    assert!(db.get_customer(42).await.unwrap_err().is_not_found());
    assert!(db.get_item(42).await.unwrap_err().is_not_found());
    assert!(db.get_item_with_reviews(42).await.unwrap_err().is_not_found());
    assert!(db.get_review(42).await.unwrap_err().is_not_found());
    assert!(db
        .update_customer(42, &NewCustomer::new("Nobody"))
        .await
        .unwrap_err()
        .is_not_found());
    assert!(db
        .update_item(42, &NewItem::new("Nothing", 1.0))
        .await
        .unwrap_err()
        .is_not_found());
    assert!(db.update_review_comment(42, None).await.unwrap_err().is_not_found());
    assert!(db.delete_customer(42).await.unwrap_err().is_not_found());
    assert!(db.delete_item(42).await.unwrap_err().is_not_found());
    assert!(db.delete_review(42).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let db = test_db().await;
    let ada = db.create_customer(&NewCustomer::new("Ada")).await.unwrap();

    db.initialize().await.unwrap();
    assert_eq!(db.get_customer(ada.id).await.unwrap(), ada);
}

#[tokio::test]
async fn test_foreign_keys_enforced_by_store() {
    let db = test_db().await;

    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(enabled, 1);

    // Bypass the explicit reference checks and let SQLite reject the row.
    let err = sqlx::query("INSERT INTO reviews (comment, customer_id, item_id) VALUES (?, ?, ?)")
        .bind("orphan")
        .bind(999_i64)
        .bind(Option::<i64>::None)
        .execute(db.pool())
        .await
        .unwrap_err();
    assert!(matches!(
        AppError::from(err),
        AppError::ReferentialIntegrity(_)
    ));
}

#[tokio::test]
async fn test_file_database_persists_between_connections() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviews.db");
    let config = DatabaseConfig::new(format!("sqlite:{}", path.display()));

    let db = SqliteDatabase::new(&config).await.unwrap();
    db.initialize().await.unwrap();
    let ada = db.create_customer(&NewCustomer::new("Ada")).await.unwrap();
    let review = db
        .create_review(&NewReview::new(ada.id).with_comment("first"))
        .await
        .unwrap();
    db.pool().close().await;

    let reopened = SqliteDatabase::new(&config).await.unwrap();
    reopened.initialize().await.unwrap();
    assert_eq!(reopened.get_customer(ada.id).await.unwrap(), ada);
    assert_eq!(reopened.get_review(review.id).await.unwrap(), review);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_item_reviews_on_file_database() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig::new(format!("sqlite:{}", dir.path().join("reviews.db").display()));
    assert!(config.pool_size() > 1);

    let db = SqliteDatabase::new(&config).await.unwrap();
    db.initialize().await.unwrap();
    let ada = db.create_customer(&NewCustomer::new("Ada")).await.unwrap();
    let widget = db.create_item(&NewItem::new("Widget", 9.99)).await.unwrap();
    let reviews = ReviewService::new(Arc::new(db));

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let reviews = reviews.clone();
            tokio::spawn(async move { reviews.add_item_review(ada.id, widget.id).await })
        })
        .collect();

    let mut created = Vec::new();
    for handle in handles {
        created.push(handle.await.unwrap().unwrap());
    }
    assert_eq!(created.len(), 50);

    let items = reviews.items_for_customer(ada.id).await.unwrap();
    assert_eq!(items.len(), 50);
    assert!(items.iter().all(|item| item.id == widget.id));
}
