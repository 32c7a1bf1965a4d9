//! End-to-end tests for the Warehouse domain
//!
//! These tests run the full service over the in-memory unit of work, so they
//! exercise the real transaction semantics: commit-on-success, rollback on
//! scope drop, and stock state surviving across operations.

use domain_warehouse::*;
use uuid::Uuid;

fn create_product(name: &str, quantity: i32, price: f64) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        quantity,
        price,
    }
}

fn line(product_id: Uuid, quantity: i32) -> OrderLineInput {
    OrderLineInput {
        product_id,
        quantity,
    }
}

// ============================================================================
// Product lifecycle
// ============================================================================

#[tokio::test]
async fn test_create_and_get_product_round_trip() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    let created = service
        .create_product(create_product("Test Product", 5, 10.0))
        .await
        .unwrap();
    assert!(created.id.is_some());

    let fetched = service
        .get_product_details(created.id.unwrap())
        .await
        .unwrap()
        .expect("persisted product must be retrievable");

    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.quantity, created.quantity);
    assert_eq!(fetched.price, created.price);
}

#[tokio::test]
async fn test_get_unknown_product_returns_none() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    let found = service.get_product_details(Uuid::now_v7()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_list_all_products_returns_everything_created() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    service.create_product(create_product("A", 1, 1.0)).await.unwrap();
    service.create_product(create_product("B", 2, 2.0)).await.unwrap();
    service.create_product(create_product("C", 3, 3.0)).await.unwrap();

    let products = service.list_all_products().await.unwrap();
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_update_product_stock_persists_new_count() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    let product = service
        .create_product(create_product("Widget", 5, 10.0))
        .await
        .unwrap();
    let id = product.id.unwrap();

    let updated = service.update_product_stock(id, 42).await.unwrap().unwrap();
    assert_eq!(updated.quantity, 42);

    let fetched = service.get_product_details(id).await.unwrap().unwrap();
    assert_eq!(fetched.quantity, 42);
}

#[tokio::test]
async fn test_update_product_stock_unknown_id_returns_none() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    let updated = service
        .update_product_stock(Uuid::now_v7(), 42)
        .await
        .unwrap();
    assert!(updated.is_none());
}

// ============================================================================
// Order placement
// ============================================================================

#[tokio::test]
async fn test_create_order_fulfills_and_decrements_stock() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    let product = service
        .create_product(create_product("Test Product", 5, 10.0))
        .await
        .unwrap();
    let id = product.id.unwrap();

    let order = service.create_order(vec![line(id, 2)]).await.unwrap();

    assert!(order.id.is_some(), "fulfilled order gets an identity");
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity_ordered, 2);
    assert_eq!(order.items[0].price_at_purchase, 10.0);
    assert_eq!(order.total_cost(), 20.0);

    let product = service.get_product_details(id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 3, "stock decremented by the ordered amount");

    let fetched = service
        .get_order_details(order.id.unwrap())
        .await
        .unwrap()
        .expect("persisted order must be retrievable");
    assert_eq!(fetched.items.len(), 1);
    assert_eq!(fetched.items[0].product.id, Some(id));
}

#[tokio::test]
async fn test_create_order_with_no_lines_returns_empty_unpersisted_order() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    let order = service.create_order(Vec::new()).await.unwrap();

    assert!(order.id.is_none());
    assert!(order.items.is_empty());
    assert!(service.list_all_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_order_insufficient_stock_leaves_everything_untouched() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    let product = service
        .create_product(create_product("Scarce", 1, 10.0))
        .await
        .unwrap();
    let id = product.id.unwrap();

    let order = service.create_order(vec![line(id, 5)]).await.unwrap();

    assert!(order.id.is_none());
    assert!(order.items.is_empty());

    let product = service.get_product_details(id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 1, "stock must be unchanged");
    assert!(service.list_all_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_order_partial_fulfillment_skips_unknown_product() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    let known = service
        .create_product(create_product("Known", 10, 4.0))
        .await
        .unwrap();
    let known_id = known.id.unwrap();
    let unknown_id = Uuid::now_v7();

    let order = service
        .create_order(vec![line(known_id, 3), line(unknown_id, 2)])
        .await
        .unwrap();

    assert!(order.id.is_some());
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].product.id, Some(known_id));
    assert!(
        order.items.iter().all(|i| i.product.id != Some(unknown_id)),
        "no line may reference the unknown product"
    );

    let known = service.get_product_details(known_id).await.unwrap().unwrap();
    assert_eq!(known.quantity, 7);
}

#[tokio::test]
async fn test_create_order_mixes_skip_reasons_per_line() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    let plentiful = service
        .create_product(create_product("Plentiful", 10, 2.0))
        .await
        .unwrap();
    let scarce = service
        .create_product(create_product("Scarce", 1, 8.0))
        .await
        .unwrap();
    let plentiful_id = plentiful.id.unwrap();
    let scarce_id = scarce.id.unwrap();

    let order = service
        .create_order(vec![
            line(plentiful_id, 4),
            line(scarce_id, 3),     // insufficient stock
            line(plentiful_id, 0),  // non-positive quantity
            line(plentiful_id, 2),  // fulfillable again
        ])
        .await
        .unwrap();

    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].quantity_ordered, 4);
    assert_eq!(order.items[1].quantity_ordered, 2);
    assert_eq!(order.total_cost(), 4.0 * 2.0 + 2.0 * 2.0);

    let plentiful = service
        .get_product_details(plentiful_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plentiful.quantity, 4, "both fulfilled lines decrement stock");

    let scarce = service.get_product_details(scarce_id).await.unwrap().unwrap();
    assert_eq!(scarce.quantity, 1, "skipped line leaves stock alone");
}

#[tokio::test]
async fn test_price_at_purchase_survives_later_price_changes() {
    let uow = InMemoryUnitOfWork::new();
    let service = WarehouseService::new(uow.clone());

    let product = service
        .create_product(create_product("Volatile", 10, 10.0))
        .await
        .unwrap();
    let id = product.id.unwrap();

    let order = service.create_order(vec![line(id, 1)]).await.unwrap();

    // Raise the price after the order was placed, through its own scope
    let scope = uow.begin().await.unwrap();
    let mut repriced = scope.products().get(id).await.unwrap().unwrap();
    repriced.price = 25.0;
    scope.products().update(&repriced).await.unwrap();
    scope.commit().await.unwrap();

    let fetched = service
        .get_order_details(order.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.items[0].price_at_purchase, 10.0);
    assert_eq!(
        service.get_product_details(id).await.unwrap().unwrap().price,
        25.0
    );
}

#[tokio::test]
async fn test_list_all_orders_returns_persisted_orders_only() {
    let service = WarehouseService::new(InMemoryUnitOfWork::new());

    let product = service
        .create_product(create_product("Widget", 10, 1.0))
        .await
        .unwrap();
    let id = product.id.unwrap();

    service.create_order(vec![line(id, 1)]).await.unwrap();
    service.create_order(vec![line(id, 2)]).await.unwrap();
    // This one is skipped entirely and must not be persisted
    service.create_order(vec![line(Uuid::now_v7(), 1)]).await.unwrap();

    let orders = service.list_all_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
}
