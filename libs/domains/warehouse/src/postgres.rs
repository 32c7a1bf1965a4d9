//! PostgreSQL unit of work backed by Sea-ORM transactions

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::entity;
use crate::error::{WarehouseError, WarehouseResult};
use crate::models::{Order, OrderItem, Product};
use crate::repository::{OrderRepository, ProductRepository};
use crate::unit_of_work::{UnitOfWork, UnitOfWorkScope};

/// Unit of work handing out one database transaction per scope
///
/// Holds the connection pool; every [`begin`](UnitOfWork::begin) opens a
/// transaction and binds fresh repositories to it. The store's isolation
/// level serializes conflicting stock decrements from concurrent callers.
#[derive(Clone)]
pub struct SeaOrmUnitOfWork {
    db: DatabaseConnection,
}

impl SeaOrmUnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connect to PostgreSQL with tuned pool settings and wrap the pool
    pub async fn connect(database_url: &str) -> WarehouseResult<Self> {
        let mut opt = ConnectOptions::new(database_url);
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(true);

        let db = Database::connect(opt).await?;
        tracing::info!("Successfully connected to PostgreSQL database");
        Ok(Self::new(db))
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    type Scope = SeaOrmScope;

    async fn begin(&self) -> WarehouseResult<SeaOrmScope> {
        let txn = Arc::new(self.db.begin().await?);
        Ok(SeaOrmScope {
            products: SeaOrmProductRepository {
                txn: Arc::clone(&txn),
            },
            orders: SeaOrmOrderRepository {
                txn: Arc::clone(&txn),
            },
            txn,
        })
    }
}

/// One open database transaction
///
/// Sea-ORM rolls the transaction back when it is dropped uncommitted, so an
/// error propagating out of a service operation releases the connection and
/// undoes every write of the scope.
pub struct SeaOrmScope {
    txn: Arc<DatabaseTransaction>,
    products: SeaOrmProductRepository,
    orders: SeaOrmOrderRepository,
}

#[async_trait]
impl UnitOfWorkScope for SeaOrmScope {
    fn products(&self) -> &dyn ProductRepository {
        &self.products
    }

    fn orders(&self) -> &dyn OrderRepository {
        &self.orders
    }

    async fn commit(self) -> WarehouseResult<()> {
        let Self {
            txn,
            products,
            orders,
        } = self;
        // The repositories hold the only other clones of this Arc
        drop((products, orders));
        let txn = Arc::try_unwrap(txn)
            .map_err(|_| WarehouseError::Internal("transaction handle still in use at commit".to_string()))?;
        txn.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> WarehouseResult<()> {
        let Self {
            txn,
            products,
            orders,
        } = self;
        drop((products, orders));
        let txn = Arc::try_unwrap(txn)
            .map_err(|_| WarehouseError::Internal("transaction handle still in use at rollback".to_string()))?;
        txn.rollback().await?;
        Ok(())
    }
}

pub struct SeaOrmProductRepository {
    txn: Arc<DatabaseTransaction>,
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn add(&self, product: Product) -> WarehouseResult<Product> {
        let active = entity::product::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(product.name),
            quantity: Set(product.quantity),
            price: Set(product.price),
            created_at: Set(product.created_at.into()),
            updated_at: Set(product.updated_at.into()),
        };

        let model = active.insert(self.txn.as_ref()).await?;
        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn get(&self, id: Uuid) -> WarehouseResult<Option<Product>> {
        let model = entity::product::Entity::find_by_id(id)
            .one(self.txn.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self) -> WarehouseResult<Vec<Product>> {
        let models = entity::product::Entity::find()
            .order_by_asc(entity::product::Column::CreatedAt)
            .all(self.txn.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, product: &Product) -> WarehouseResult<Product> {
        let id = product.id.ok_or(WarehouseError::MissingIdentity)?;

        let existing = entity::product::Entity::find_by_id(id)
            .one(self.txn.as_ref())
            .await?
            .ok_or(WarehouseError::ProductNotFound(id))?;

        let mut active: entity::product::ActiveModel = existing.into();
        active.name = Set(product.name.clone());
        active.quantity = Set(product.quantity);
        active.price = Set(product.price);
        active.updated_at = Set(product.updated_at.into());

        let model = active.update(self.txn.as_ref()).await?;
        Ok(model.into())
    }
}

pub struct SeaOrmOrderRepository {
    txn: Arc<DatabaseTransaction>,
}

impl SeaOrmOrderRepository {
    /// Load an order's lines together with their product rows
    async fn hydrate(&self, model: entity::order::Model) -> WarehouseResult<Order> {
        let rows = entity::order_item::Entity::find()
            .filter(entity::order_item::Column::OrderId.eq(model.id))
            .order_by_asc(entity::order_item::Column::Id)
            .find_also_related(entity::product::Entity)
            .all(self.txn.as_ref())
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for (item, product) in rows {
            let Some(product) = product else {
                tracing::error!(order_item_id = %item.id, "product row missing for order line");
                continue;
            };
            items.push(OrderItem {
                product: product.into(),
                quantity_ordered: item.quantity_ordered,
                price_at_purchase: item.price_at_purchase,
            });
        }

        Ok(Order {
            id: Some(model.id),
            items,
            created_at: model.created_at.into(),
        })
    }
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn add(&self, mut order: Order) -> WarehouseResult<Order> {
        let order_id = Uuid::now_v7();

        entity::order::ActiveModel {
            id: Set(order_id),
            created_at: Set(order.created_at.into()),
        }
        .insert(self.txn.as_ref())
        .await?;

        for item in &order.items {
            let product_id = item.product.id.ok_or(WarehouseError::MissingIdentity)?;

            let exists = entity::product::Entity::find_by_id(product_id)
                .one(self.txn.as_ref())
                .await?
                .is_some();
            if !exists {
                tracing::error!(product_id = %product_id, "order line references a product absent from the store");
                return Err(WarehouseError::ProductNotFound(product_id));
            }

            entity::order_item::ActiveModel {
                id: Set(Uuid::now_v7()),
                order_id: Set(order_id),
                product_id: Set(product_id),
                quantity_ordered: Set(item.quantity_ordered),
                price_at_purchase: Set(item.price_at_purchase),
            }
            .insert(self.txn.as_ref())
            .await?;
        }

        order.id = Some(order_id);
        tracing::info!(order_id = %order_id, lines = order.items.len(), "Created order");
        Ok(order)
    }

    async fn get(&self, id: Uuid) -> WarehouseResult<Option<Order>> {
        let Some(model) = entity::order::Entity::find_by_id(id)
            .one(self.txn.as_ref())
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(self.hydrate(model).await?))
    }

    async fn list(&self) -> WarehouseResult<Vec<Order>> {
        let models = entity::order::Entity::find()
            .order_by_asc(entity::order::Column::CreatedAt)
            .all(self.txn.as_ref())
            .await?;

        let mut orders = Vec::with_capacity(models.len());
        for model in models {
            orders.push(self.hydrate(model).await?);
        }
        Ok(orders)
    }
}
