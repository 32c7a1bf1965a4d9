use async_trait::async_trait;

use crate::error::WarehouseResult;
use crate::repository::{OrderRepository, ProductRepository};

/// Factory for transactional scopes
///
/// The service holds one of these and opens a fresh scope per operation.
/// Implementations pair a shared storage handle (a connection pool, an
/// in-memory store) with the scope type that runs one transaction on it.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Scope: UnitOfWorkScope;

    /// Open a transactional context and bind fresh repository instances to it
    async fn begin(&self) -> WarehouseResult<Self::Scope>;
}

/// One open transaction
///
/// The repositories returned by [`products`](Self::products) and
/// [`orders`](Self::orders) are the only valid handles for reading and
/// mutating state inside the transaction; everything they do stays invisible
/// to other scopes until [`commit`](Self::commit).
///
/// `commit` and `rollback` consume the scope, so a finished transaction
/// cannot be touched again. Dropping a scope without committing rolls the
/// transaction back and releases the underlying resource, which is what
/// happens when an error propagates out of a service operation with `?`.
#[async_trait]
pub trait UnitOfWorkScope: Send {
    /// Product repository bound to this transaction
    fn products(&self) -> &dyn ProductRepository;

    /// Order repository bound to this transaction
    fn orders(&self) -> &dyn OrderRepository;

    /// Make all writes performed in this scope durable
    async fn commit(self) -> WarehouseResult<()>;

    /// Discard all writes performed in this scope
    async fn rollback(self) -> WarehouseResult<()>;
}
