use std::sync::Arc;
use crate::{
    config::Config,
    error::AppResult,
    infrastructure::{DatabaseInterface, SqliteDatabase},
    services::ReviewService,
};

#[derive(Clone)]
pub struct AppState {
    pub database: Arc<dyn DatabaseInterface>,
    pub reviews: ReviewService,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        // Initialize database
        let database = SqliteDatabase::new(&config.database).await?;
        database.initialize().await?;
        let database: Arc<dyn DatabaseInterface> = Arc::new(database);

        let reviews = ReviewService::new(database.clone());

        Ok(Self {
            database,
            reviews,
            config,
        })
    }
}
