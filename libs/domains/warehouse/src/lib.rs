//! Warehouse Domain
//!
//! This module provides a complete domain implementation for product
//! inventory and order placement, built around a transactional unit of work.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Service    │  ← Business logic, order-placement algorithm
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │ Unit of Work │  ← Transactional scope (commit / rollback)
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │ Repositories │  ← Data access (traits + implementations)
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │    Models    │  ← Entities, DTOs
//! └──────────────┘
//! ```
//!
//! Order placement is best effort: each requested line is checked and
//! fulfilled independently inside one transaction, and unsatisfiable lines
//! are skipped rather than failing the order. Callers inspect the returned
//! order's line count and identity to tell full, partial and zero
//! fulfillment apart.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_warehouse::{
//!     memory::InMemoryUnitOfWork,
//!     models::{CreateProduct, OrderLineInput},
//!     service::WarehouseService,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a unit of work and the service over it
//! let service = WarehouseService::new(InMemoryUnitOfWork::new());
//!
//! let product = service
//!     .create_product(CreateProduct {
//!         name: "Widget".to_string(),
//!         quantity: 5,
//!         price: 10.0,
//!     })
//!     .await?;
//!
//! let order = service
//!     .create_order(vec![OrderLineInput {
//!         product_id: product.id.unwrap(),
//!         quantity: 2,
//!     }])
//!     .await?;
//! assert_eq!(order.items.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod unit_of_work;

// Re-export commonly used types
pub use error::{WarehouseError, WarehouseResult};
pub use memory::InMemoryUnitOfWork;
pub use models::{CreateProduct, Order, OrderItem, OrderLineInput, Product};
pub use postgres::SeaOrmUnitOfWork;
pub use repository::{OrderRepository, ProductRepository};
pub use service::WarehouseService;
pub use unit_of_work::{UnitOfWork, UnitOfWorkScope};
