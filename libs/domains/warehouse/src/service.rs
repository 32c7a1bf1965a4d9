//! Warehouse Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{WarehouseError, WarehouseResult};
use crate::models::{CreateProduct, Order, OrderLineInput, Product};
use crate::repository::{OrderRepository, ProductRepository};
use crate::unit_of_work::{UnitOfWork, UnitOfWorkScope};

/// Warehouse service providing inventory and order placement operations
///
/// Every operation runs inside its own unit-of-work scope: it commits on
/// success, and an error propagating out of the scope rolls the whole
/// transaction back.
pub struct WarehouseService<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> WarehouseService<U> {
    /// Create a new WarehouseService over the given unit of work
    pub fn new(uow: U) -> Self {
        Self { uow: Arc::new(uow) }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> WarehouseResult<Product> {
        input
            .validate()
            .map_err(|e| WarehouseError::Validation(e.to_string()))?;

        let scope = self.uow.begin().await?;
        let product = scope.products().add(Product::new(input)).await?;
        scope.commit().await?;
        Ok(product)
    }

    /// Get a product by ID, or `None` when no such product exists
    #[instrument(skip(self))]
    pub async fn get_product_details(&self, id: Uuid) -> WarehouseResult<Option<Product>> {
        let scope = self.uow.begin().await?;
        let product = scope.products().get(id).await?;
        scope.commit().await?;
        Ok(product)
    }

    /// List all products
    #[instrument(skip(self))]
    pub async fn list_all_products(&self) -> WarehouseResult<Vec<Product>> {
        let scope = self.uow.begin().await?;
        let products = scope.products().list().await?;
        scope.commit().await?;
        Ok(products)
    }

    /// Replace a product's stock count
    ///
    /// Returns `None` without writing anything when the product does not
    /// exist. A negative count is rejected: stock is invariantly
    /// non-negative.
    #[instrument(skip(self))]
    pub async fn update_product_stock(
        &self,
        id: Uuid,
        new_quantity: i32,
    ) -> WarehouseResult<Option<Product>> {
        if new_quantity < 0 {
            return Err(WarehouseError::Validation(format!(
                "stock count cannot be negative, got {new_quantity}"
            )));
        }

        let scope = self.uow.begin().await?;
        let Some(mut product) = scope.products().get(id).await? else {
            return Ok(None);
        };

        product.set_quantity(new_quantity);
        let product = scope.products().update(&product).await?;
        scope.commit().await?;
        Ok(Some(product))
    }

    /// Place an order for the requested lines, best effort
    ///
    /// Each line is handled independently, in input order: a line with a
    /// non-positive quantity, an unknown product or insufficient stock is
    /// skipped, never failing the whole order. A satisfied line decrements
    /// the product's stock. The caller detects partial or total failure by
    /// comparing the returned order's line count against the request; an
    /// order with no satisfiable lines comes back empty, unpersisted and
    /// without an identity.
    #[instrument(skip(self, lines), fields(requested_lines = lines.len()))]
    pub async fn create_order(&self, lines: Vec<OrderLineInput>) -> WarehouseResult<Order> {
        let scope = self.uow.begin().await?;
        let mut order = Order::new();

        // Nothing requested is not an error, just nothing to do
        if lines.is_empty() {
            return Ok(order);
        }

        for line in &lines {
            if line.quantity <= 0 {
                tracing::warn!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    "skipping order line with non-positive quantity"
                );
                continue;
            }

            let Some(mut product) = scope.products().get(line.product_id).await? else {
                tracing::warn!(product_id = %line.product_id, "skipping order line for unknown product");
                continue;
            };

            if product.quantity < line.quantity {
                tracing::warn!(
                    product_id = %line.product_id,
                    available = product.quantity,
                    requested = line.quantity,
                    "skipping order line with insufficient stock"
                );
                continue;
            }

            order.add_item(&product, line.quantity)?;
            product.deduct_stock(line.quantity);
            scope.products().update(&product).await?;
        }

        // Every line was skipped: hand back the empty order unpersisted
        if order.items.is_empty() {
            return Ok(order);
        }

        let order = scope.orders().add(order).await?;
        scope.commit().await?;
        Ok(order)
    }

    /// Get an order by ID, with its lines, or `None` when no such order
    /// exists
    #[instrument(skip(self))]
    pub async fn get_order_details(&self, id: Uuid) -> WarehouseResult<Option<Order>> {
        let scope = self.uow.begin().await?;
        let order = scope.orders().get(id).await?;
        scope.commit().await?;
        Ok(order)
    }

    /// List all orders
    #[instrument(skip(self))]
    pub async fn list_all_orders(&self) -> WarehouseResult<Vec<Order>> {
        let scope = self.uow.begin().await?;
        let orders = scope.orders().list().await?;
        scope.commit().await?;
        Ok(orders)
    }
}

impl<U: UnitOfWork> Clone for WarehouseService<U> {
    fn clone(&self) -> Self {
        Self {
            uow: Arc::clone(&self.uow),
        }
    }
}
