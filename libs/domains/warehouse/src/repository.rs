use async_trait::async_trait;
use uuid::Uuid;

use crate::error::WarehouseResult;
use crate::models::{Order, Product};

/// Repository trait for Product persistence
///
/// Implementations are handed out by a unit-of-work scope and are only valid
/// for the lifetime of that scope's transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product, returning it with its assigned identity
    async fn add(&self, product: Product) -> WarehouseResult<Product>;

    /// Get a product by ID
    async fn get(&self, id: Uuid) -> WarehouseResult<Option<Product>>;

    /// List all products in creation order
    async fn list(&self) -> WarehouseResult<Vec<Product>>;

    /// Persist changes to an existing product
    ///
    /// Fails with [`WarehouseError::ProductNotFound`] when no record with the
    /// product's identity exists, and [`WarehouseError::MissingIdentity`]
    /// when the product was never persisted at all.
    ///
    /// [`WarehouseError::ProductNotFound`]: crate::error::WarehouseError::ProductNotFound
    /// [`WarehouseError::MissingIdentity`]: crate::error::WarehouseError::MissingIdentity
    async fn update(&self, product: &Product) -> WarehouseResult<Product>;
}

/// Repository trait for Order persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order and all of its lines, returning it with its
    /// assigned identity
    ///
    /// Every line keeps a durable reference to its product; a line whose
    /// product is absent from the store fails the whole add with
    /// [`WarehouseError::ProductNotFound`].
    ///
    /// [`WarehouseError::ProductNotFound`]: crate::error::WarehouseError::ProductNotFound
    async fn add(&self, order: Order) -> WarehouseResult<Order>;

    /// Get an order by ID, with its lines hydrated with their product
    /// snapshots
    async fn get(&self, id: Uuid) -> WarehouseResult<Option<Order>>;

    /// List all orders in creation order
    async fn list(&self) -> WarehouseResult<Vec<Order>>;
}
