use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{WarehouseError, WarehouseResult};

/// Product entity - a stocked, purchasable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, assigned by the storage layer on first persist
    pub id: Option<Uuid>,
    /// Product name
    pub name: String,
    /// Units currently in stock (never negative)
    pub quantity: i32,
    /// Current unit price
    pub price: f64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// One line of an order: an immutable snapshot taken at purchase time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product as it looked when the line was added
    pub product: Product,
    /// Units ordered (always positive)
    pub quantity_ordered: i32,
    /// Unit price copied from the product when the line was added;
    /// later price changes on the product never touch it
    pub price_at_purchase: f64,
}

/// Order entity - an ordered sequence of purchase lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier, assigned by the storage layer on first persist
    pub id: Option<Uuid>,
    /// Purchase lines in insertion order
    pub items: Vec<OrderItem>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity: i32,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// One requested line of an order placement: which product, how many units.
///
/// Deliberately unvalidated: the order-placement algorithm tolerates bad
/// lines by skipping them rather than rejecting the whole request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

impl Product {
    /// Create a new, not-yet-persisted product from a CreateProduct DTO
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: input.name,
            quantity: input.quantity,
            price: input.price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Remove `amount` units from stock. Callers check availability first.
    pub fn deduct_stock(&mut self, amount: i32) {
        self.quantity -= amount;
        self.updated_at = Utc::now();
    }

    /// Replace the stock count outright
    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
        self.updated_at = Utc::now();
    }
}

impl OrderItem {
    /// Line total: units ordered times the price captured at purchase
    pub fn total_cost(&self) -> f64 {
        f64::from(self.quantity_ordered) * self.price_at_purchase
    }
}

impl Order {
    /// Create a new, empty, not-yet-persisted order
    pub fn new() -> Self {
        Self {
            id: None,
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a line for `quantity_to_order` units of `product`, snapshotting
    /// the product and its current price.
    ///
    /// Fails with [`WarehouseError::InvalidQuantity`] for a non-positive
    /// quantity, leaving the line list untouched. The product itself is not
    /// modified.
    pub fn add_item(&mut self, product: &Product, quantity_to_order: i32) -> WarehouseResult<()> {
        if quantity_to_order <= 0 {
            return Err(WarehouseError::InvalidQuantity(quantity_to_order));
        }
        self.items.push(OrderItem {
            product: product.clone(),
            quantity_ordered: quantity_to_order,
            price_at_purchase: product.price,
        });
        Ok(())
    }

    /// Total cost across all lines; `0.0` for an empty order
    pub fn total_cost(&self) -> f64 {
        self.items.iter().map(OrderItem::total_cost).sum()
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}
