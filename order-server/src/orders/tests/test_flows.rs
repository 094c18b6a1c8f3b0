//! Listing, search, pagination and stats aggregation

use super::*;
use crate::db::models::{Order, OrderStatus, OrderUpdate, PaymentStatus, TenantStatus};
use crate::db::repository::{OrderFilter, SortDirection, SortField, SortSpec};
use std::time::Duration;

async fn create_named(service: &OrderService, name: &str, email: &str, total: f64) -> Order {
    let mut input = order_input(vec![simple_item(total, 1)]);
    input.customer_id = format!("cust-{name}");
    input.customer_name = name.to_string();
    input.customer_email = email.to_string();
    let order = service.create_order(TENANT, input).await.unwrap();
    // Keep createdAt strictly increasing so sort assertions are deterministic
    tokio::time::sleep(Duration::from_millis(5)).await;
    order
}

async fn set_status(service: &OrderService, order: &Order, status: OrderStatus) {
    service
        .update_order(
            TENANT,
            &order.id_string(),
            OrderUpdate {
                status: Some(status),
                ..Default::default()
            },
            "user-2",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn filters_are_conjunctive() {
    let (service, _db) = setup().await;
    let a = create_named(&service, "Alice", "alice@example.com", 10.0).await;
    let _b = create_named(&service, "Bob", "bob@example.com", 20.0).await;
    set_status(&service, &a, OrderStatus::Confirmed).await;

    let filter = OrderFilter {
        status: Some(OrderStatus::Confirmed),
        ..Default::default()
    };
    let (orders, page) = service
        .get_orders(TENANT, filter, SortSpec::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer_name, "Alice");
    assert_eq!(page.total_count, 1);

    // Same status AND someone else's customer id matches nothing
    let filter = OrderFilter {
        status: Some(OrderStatus::Confirmed),
        customer_id: Some("cust-Bob".to_string()),
        ..Default::default()
    };
    let (orders, page) = service
        .get_orders(TENANT, filter, SortSpec::default(), 1, 10)
        .await
        .unwrap();
    assert!(orders.is_empty());
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn payment_status_filter_matches_exactly() {
    let (service, _db) = setup().await;
    let a = create_named(&service, "Alice", "alice@example.com", 10.0).await;
    let _b = create_named(&service, "Bob", "bob@example.com", 20.0).await;
    service
        .update_order(
            TENANT,
            &a.id_string(),
            OrderUpdate {
                payment_status: Some(PaymentStatus::Paid),
                ..Default::default()
            },
            "user-2",
        )
        .await
        .unwrap();

    let filter = OrderFilter {
        payment_status: Some(PaymentStatus::Paid),
        ..Default::default()
    };
    let (orders, _) = service
        .get_orders(TENANT, filter, SortSpec::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer_name, "Alice");
}

#[tokio::test]
async fn search_is_or_across_number_name_email() {
    let (service, _db) = setup().await;
    let by_name = create_named(&service, "Acme Wholesale", "sales@example.com", 10.0).await;
    let by_email = create_named(&service, "Widget Co", "info@ACME.example", 20.0).await;
    let neither = create_named(&service, "Globex", "contact@globex.example", 30.0).await;

    let filter = OrderFilter {
        search: Some("ACME".to_string()),
        ..Default::default()
    };
    let (orders, _) = service
        .get_orders(TENANT, filter, SortSpec::default(), 1, 10)
        .await
        .unwrap();
    let numbers: Vec<&str> = orders.iter().map(|o| o.order_number.as_str()).collect();
    assert_eq!(orders.len(), 2);
    assert!(numbers.contains(&by_name.order_number.as_str()));
    assert!(numbers.contains(&by_email.order_number.as_str()));
    assert!(!numbers.contains(&neither.order_number.as_str()));

    // Order-number fragments match too
    let filter = OrderFilter {
        search: Some(neither.order_number.to_lowercase()),
        ..Default::default()
    };
    let (orders, _) = service
        .get_orders(TENANT, filter, SortSpec::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer_name, "Globex");
}

#[tokio::test]
async fn date_range_bounds_are_inclusive() {
    let (service, _db) = setup().await;
    let order = create_named(&service, "Alice", "alice@example.com", 10.0).await;

    let filter = OrderFilter {
        start_millis: Some(order.created_at),
        end_millis: Some(order.created_at),
        ..Default::default()
    };
    let (orders, _) = service
        .get_orders(TENANT, filter, SortSpec::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);

    let filter = OrderFilter {
        start_millis: Some(order.created_at + 1),
        ..Default::default()
    };
    let (orders, _) = service
        .get_orders(TENANT, filter, SortSpec::default(), 1, 10)
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn pagination_math_rounds_up() {
    let (service, _db) = setup().await;
    for i in 0..5 {
        create_named(&service, &format!("Customer {i}"), "c@example.com", 10.0).await;
    }

    let (orders, page) = service
        .get_orders(TENANT, OrderFilter::default(), SortSpec::default(), 1, 2)
        .await
        .unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_count, 5);
    assert_eq!(page.limit, 2);

    let (orders, page) = service
        .get_orders(TENANT, OrderFilter::default(), SortSpec::default(), 3, 2)
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(page.current_page, 3);
}

#[tokio::test]
async fn empty_pages_are_not_an_error() {
    let (service, _db) = setup().await;

    let (orders, page) = service
        .get_orders(TENANT, OrderFilter::default(), SortSpec::default(), 1, 10)
        .await
        .unwrap();
    assert!(orders.is_empty());
    assert_eq!(page.total_count, 0);
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn default_sort_is_newest_first() {
    let (service, _db) = setup().await;
    create_named(&service, "First", "a@example.com", 10.0).await;
    create_named(&service, "Second", "b@example.com", 20.0).await;
    create_named(&service, "Third", "c@example.com", 30.0).await;

    let (orders, _) = service
        .get_orders(TENANT, OrderFilter::default(), SortSpec::default(), 1, 10)
        .await
        .unwrap();
    let names: Vec<&str> = orders.iter().map(|o| o.customer_name.as_str()).collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);

    let ascending = SortSpec {
        field: SortField::Total,
        direction: SortDirection::Asc,
    };
    let (orders, _) = service
        .get_orders(TENANT, OrderFilter::default(), ascending, 1, 10)
        .await
        .unwrap();
    let totals: Vec<f64> = orders.iter().map(|o| o.total).collect();
    assert_eq!(totals, vec![10.0, 20.0, 30.0]);
}

#[tokio::test]
async fn stats_on_empty_tenant_are_all_zero() {
    let (service, _db) = setup().await;

    let stats = service.get_order_stats(TENANT, None).await.unwrap();
    assert_eq!(stats.total_orders, 0);
    assert_eq!(stats.total_revenue, 0.0);
    assert_eq!(stats.average_order_value, 0.0);
    assert_eq!(stats.pending_orders, 0);
    assert_eq!(stats.cancelled_orders, 0);
}

#[tokio::test]
async fn stats_count_revenue_and_statuses() {
    let (service, _db) = setup().await;
    let _pending = create_named(&service, "A", "a@example.com", 10.0).await;
    let delivered = create_named(&service, "B", "b@example.com", 20.0).await;
    let cancelled = create_named(&service, "C", "c@example.com", 30.0).await;
    let refunded = create_named(&service, "D", "d@example.com", 40.0).await;

    set_status(&service, &delivered, OrderStatus::Delivered).await;
    service
        .cancel_order(TENANT, &cancelled.id_string(), "changed mind", "user-2")
        .await
        .unwrap();
    set_status(&service, &refunded, OrderStatus::Refunded).await;

    let stats = service.get_order_stats(TENANT, None).await.unwrap();
    assert_eq!(stats.total_orders, 4);
    assert_eq!(stats.total_revenue, 100.0);
    assert_eq!(stats.average_order_value, 25.0);
    assert_eq!(stats.pending_orders, 1);
    assert_eq!(stats.delivered_orders, 1);
    assert_eq!(stats.cancelled_orders, 1);
    // Refunded orders appear in the totals only; the per-status breakdown
    // carries no refunded field.
    let broken_down = stats.pending_orders
        + stats.confirmed_orders
        + stats.processing_orders
        + stats.shipped_orders
        + stats.delivered_orders
        + stats.cancelled_orders;
    assert_eq!(broken_down, 3);
}

#[tokio::test]
async fn stats_can_be_scoped_to_a_store() {
    let (service, _db) = setup().await;
    let mut input = order_input(vec![simple_item(10.0, 1)]);
    input.store_id = "store-1".to_string();
    service.create_order(TENANT, input).await.unwrap();

    let mut input = order_input(vec![simple_item(50.0, 1)]);
    input.store_id = "store-2".to_string();
    service.create_order(TENANT, input).await.unwrap();

    let stats = service
        .get_order_stats(TENANT, Some("store-2"))
        .await
        .unwrap();
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_revenue, 50.0);

    let stats = service.get_order_stats(TENANT, None).await.unwrap();
    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.total_revenue, 60.0);
}

#[tokio::test]
async fn store_filter_scopes_listing() {
    let (service, db) = setup().await;
    provision_tenant(&db, "other", TenantStatus::Active, Default::default()).await;

    let mut input = order_input(vec![simple_item(10.0, 1)]);
    input.store_id = "store-2".to_string();
    service.create_order(TENANT, input).await.unwrap();
    service
        .create_order(TENANT, order_input(vec![simple_item(10.0, 1)]))
        .await
        .unwrap();

    let filter = OrderFilter {
        store_id: Some("store-2".to_string()),
        ..Default::default()
    };
    let (orders, _) = service
        .get_orders(TENANT, filter, SortSpec::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].store_id, "store-2");

    // Another tenant's store sees none of it
    let filter = OrderFilter {
        store_id: Some("store-2".to_string()),
        ..Default::default()
    };
    let (orders, _) = service
        .get_orders("other", filter, SortSpec::default(), 1, 10)
        .await
        .unwrap();
    assert!(orders.is_empty());
}
