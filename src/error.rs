use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    NotFound(String),
    Validation(String),
    ReferentialIntegrity(String),
    ConfigurationError(String),
}

impl AppError {
    /// Map a sqlx failure into the store's taxonomy, keeping `context` in the message.
    pub fn database(context: impl fmt::Display, err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound(context.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::ReferentialIntegrity(format!("{}: {}", context, db_err))
            }
            _ => {
                tracing::error!("Database error: {}: {}", context, err);
                AppError::DatabaseError(format!("{}: {}", context, err))
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::ReferentialIntegrity(msg) => {
                write!(f, "Referential integrity error: {}", msg)
            }
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::database("query failed", err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
