//! Creation, totals and numbering

use super::*;
use crate::db::models::{OrderStatus, PaymentStatus, TenantStatus};
use crate::orders::error::OrderError;
use crate::orders::numbering;

#[tokio::test]
async fn totals_follow_the_items() {
    let (service, _db) = setup().await;

    let mut input = order_input(vec![simple_item(10.0, 2)]);
    input.tax = Some(2.0);
    input.shipping = Some(5.0);
    input.discount = Some(1.0);

    let order = service.create_order(TENANT, input).await.unwrap();
    assert_eq!(order.subtotal, 20.0);
    assert_eq!(order.total, 26.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.created_by, "user-1");
    assert_eq!(order.created_at, order.updated_at);
}

#[tokio::test]
async fn charges_default_to_zero() {
    let (service, _db) = setup().await;

    let order = service
        .create_order(TENANT, order_input(vec![simple_item(7.5, 3)]))
        .await
        .unwrap();
    assert_eq!(order.subtotal, 22.5);
    assert_eq!(order.tax, 0.0);
    assert_eq!(order.shipping, 0.0);
    assert_eq!(order.discount, 0.0);
    assert_eq!(order.total, 22.5);
}

#[tokio::test]
async fn subtotal_sums_every_item() {
    let (service, _db) = setup().await;

    let order = service
        .create_order(
            TENANT,
            order_input(vec![simple_item(10.0, 1), simple_item(4.25, 2)]),
        )
        .await
        .unwrap();
    assert_eq!(order.subtotal, 18.5);
    assert_eq!(order.items.len(), 2);
}

#[tokio::test]
async fn currency_defaults_from_tenant_settings() {
    let (service, db) = setup().await;

    let order = service
        .create_order(TENANT, order_input(vec![simple_item(1.0, 1)]))
        .await
        .unwrap();
    assert_eq!(order.currency, "USD");

    let settings = TenantSettings {
        currency: "EUR".to_string(),
        ..Default::default()
    };
    provision_tenant(&db, "euro", TenantStatus::Active, settings).await;
    let order = service
        .create_order("euro", order_input(vec![simple_item(1.0, 1)]))
        .await
        .unwrap();
    assert_eq!(order.currency, "EUR");

    let mut input = order_input(vec![simple_item(1.0, 1)]);
    input.currency = Some("GBP".to_string());
    let order = service.create_order("euro", input).await.unwrap();
    assert_eq!(order.currency, "GBP");
}

#[tokio::test]
async fn first_two_numbers_of_the_day() {
    let (service, _db) = setup().await;
    let today = numbering::today_key("UTC");

    let first = service
        .create_order(TENANT, order_input(vec![simple_item(1.0, 1)]))
        .await
        .unwrap();
    let second = service
        .create_order(TENANT, order_input(vec![simple_item(1.0, 1)]))
        .await
        .unwrap();

    assert_eq!(first.order_number, format!("ORD-{today}-0001"));
    assert_eq!(second.order_number, format!("ORD-{today}-0002"));
}

#[tokio::test]
async fn custom_prefix_flows_into_numbers() {
    let (service, db) = setup().await;
    let settings = TenantSettings {
        order_prefix: "ACME".to_string(),
        ..Default::default()
    };
    provision_tenant(&db, "branded", TenantStatus::Active, settings).await;

    let order = service
        .create_order("branded", order_input(vec![simple_item(1.0, 1)]))
        .await
        .unwrap();
    let today = numbering::today_key("UTC");
    assert_eq!(order.order_number, format!("ACME-{today}-0001"));
}

#[tokio::test]
async fn blank_prefix_falls_back_to_default() {
    let (service, db) = setup().await;
    let settings = TenantSettings {
        order_prefix: "   ".to_string(),
        ..Default::default()
    };
    provision_tenant(&db, "blank", TenantStatus::Active, settings).await;

    let order = service
        .create_order("blank", order_input(vec![simple_item(1.0, 1)]))
        .await
        .unwrap();
    assert!(order.order_number.starts_with("ORD-"));
}

#[tokio::test]
async fn tenants_number_independently() {
    let (service, db) = setup().await;
    provision_tenant(&db, "other", TenantStatus::Active, TenantSettings::default()).await;

    let first = service
        .create_order(TENANT, order_input(vec![simple_item(1.0, 1)]))
        .await
        .unwrap();
    let other = service
        .create_order("other", order_input(vec![simple_item(1.0, 1)]))
        .await
        .unwrap();

    // Both tenants start their own daily sequence at 0001
    assert!(first.order_number.ends_with("-0001"));
    assert!(other.order_number.ends_with("-0001"));
}

#[tokio::test]
async fn generated_numbers_consume_the_daily_sequence() {
    let (service, _db) = setup().await;
    let today = numbering::today_key("UTC");

    let number = service.generate_order_number(TENANT).await.unwrap();
    assert_eq!(number, format!("ORD-{today}-0001"));

    // The standalone generation took 0001; the next order continues after it
    let order = service
        .create_order(TENANT, order_input(vec![simple_item(1.0, 1)]))
        .await
        .unwrap();
    assert_eq!(order.order_number, format!("ORD-{today}-0002"));
}

#[tokio::test]
async fn created_orders_are_retrievable_by_id() {
    let (service, _db) = setup().await;

    let created = service
        .create_order(TENANT, order_input(vec![simple_item(3.0, 2)]))
        .await
        .unwrap();
    let fetched = service
        .get_order_by_id(TENANT, &created.id_string())
        .await
        .unwrap();
    assert_eq!(fetched.order_number, created.order_number);
    assert_eq!(fetched.total, created.total);
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let (service, _db) = setup().await;

    let err = service
        .get_order_by_id(TENANT, "order:missing")
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(_)));
}
