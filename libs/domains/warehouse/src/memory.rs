//! In-memory unit of work (for development/testing)

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use async_trait::async_trait;

use crate::error::{WarehouseError, WarehouseResult};
use crate::models::{Order, Product};
use crate::repository::{OrderRepository, ProductRepository};
use crate::unit_of_work::{UnitOfWork, UnitOfWorkScope};

#[derive(Debug, Clone, Default)]
struct StoreState {
    products: HashMap<Uuid, Product>,
    orders: HashMap<Uuid, Order>,
}

/// In-memory implementation of the unit-of-work contract
///
/// `begin` clones the current store into a private working set; repositories
/// mutate the working set; `commit` publishes it back to the shared store and
/// dropping the scope discards it. This gives real commit/rollback semantics
/// without a database, which is all the testing contract asks for.
/// Concurrent scopes each work on their own snapshot; the last commit wins.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUnitOfWork {
    store: Arc<RwLock<StoreState>>,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    type Scope = InMemoryScope;

    async fn begin(&self) -> WarehouseResult<InMemoryScope> {
        let snapshot = self.store.read().await.clone();
        let working = Arc::new(RwLock::new(snapshot));
        Ok(InMemoryScope {
            store: Arc::clone(&self.store),
            products: InMemoryProductRepository {
                working: Arc::clone(&working),
            },
            orders: InMemoryOrderRepository {
                working: Arc::clone(&working),
            },
            working,
        })
    }
}

/// One open in-memory transaction
pub struct InMemoryScope {
    store: Arc<RwLock<StoreState>>,
    working: Arc<RwLock<StoreState>>,
    products: InMemoryProductRepository,
    orders: InMemoryOrderRepository,
}

#[async_trait]
impl UnitOfWorkScope for InMemoryScope {
    fn products(&self) -> &dyn ProductRepository {
        &self.products
    }

    fn orders(&self) -> &dyn OrderRepository {
        &self.orders
    }

    async fn commit(self) -> WarehouseResult<()> {
        let working = self.working.read().await.clone();
        *self.store.write().await = working;
        Ok(())
    }

    async fn rollback(self) -> WarehouseResult<()> {
        // The working set is dropped with the scope; the store never saw it.
        Ok(())
    }
}

pub struct InMemoryProductRepository {
    working: Arc<RwLock<StoreState>>,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn add(&self, mut product: Product) -> WarehouseResult<Product> {
        let id = Uuid::now_v7();
        product.id = Some(id);
        self.working
            .write()
            .await
            .products
            .insert(id, product.clone());
        tracing::debug!(product_id = %id, "added product");
        Ok(product)
    }

    async fn get(&self, id: Uuid) -> WarehouseResult<Option<Product>> {
        Ok(self.working.read().await.products.get(&id).cloned())
    }

    async fn list(&self) -> WarehouseResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .working
            .read()
            .await
            .products
            .values()
            .cloned()
            .collect();
        // v7 identifiers are time-ordered, so this is creation order
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn update(&self, product: &Product) -> WarehouseResult<Product> {
        let id = product.id.ok_or(WarehouseError::MissingIdentity)?;
        let mut state = self.working.write().await;
        if !state.products.contains_key(&id) {
            return Err(WarehouseError::ProductNotFound(id));
        }
        state.products.insert(id, product.clone());
        Ok(product.clone())
    }
}

pub struct InMemoryOrderRepository {
    working: Arc<RwLock<StoreState>>,
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn add(&self, mut order: Order) -> WarehouseResult<Order> {
        let mut state = self.working.write().await;
        for item in &order.items {
            let product_id = item.product.id.ok_or(WarehouseError::MissingIdentity)?;
            if !state.products.contains_key(&product_id) {
                tracing::error!(product_id = %product_id, "order line references a product absent from the store");
                return Err(WarehouseError::ProductNotFound(product_id));
            }
        }
        let id = Uuid::now_v7();
        order.id = Some(id);
        state.orders.insert(id, order.clone());
        tracing::debug!(order_id = %id, lines = order.items.len(), "added order");
        Ok(order)
    }

    async fn get(&self, id: Uuid) -> WarehouseResult<Option<Order>> {
        Ok(self.working.read().await.orders.get(&id).cloned())
    }

    async fn list(&self) -> WarehouseResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.working.read().await.orders.values().cloned().collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }
}
