use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("Quantity to order must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Entity has no assigned identity; it was never persisted")]
    MissingIdentity,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WarehouseResult<T> = Result<T, WarehouseError>;

impl From<sea_orm::DbErr> for WarehouseError {
    fn from(err: sea_orm::DbErr) -> Self {
        WarehouseError::Database(err.to_string())
    }
}
