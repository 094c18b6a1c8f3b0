//! Order Model
//!
//! Orders live in the owning tenant's isolated store. Field names are
//! camelCase both on the wire and in the store; all timestamps are Unix millis.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

// =============================================================================
// Enums
// =============================================================================

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

/// Payment progress, tracked only (no payment processing here)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
    PartiallyRefunded,
}

/// Accepted payment methods
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
    CashOnDelivery,
}

// =============================================================================
// Order
// =============================================================================

/// Order line item; the item list is fixed at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub sku: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    #[serde(default)]
    pub discount: f64,
}

/// Shipping / billing address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub full_name: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Human-readable identifier, unique within the tenant store, immutable
    pub order_number: String,
    pub customer_id: String,
    pub customer_email: String,
    pub customer_name: String,
    pub store_id: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub discount: f64,
    pub total: f64,
    pub currency: String,
    pub shipping_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Record id as a "order:key" string; empty until persisted
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

// =============================================================================
// DTOs
// =============================================================================

/// Validated order-creation input handed to the lifecycle engine.
/// Totals and numbering are computed by the engine, never supplied.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_id: String,
    pub customer_email: String,
    pub customer_name: String,
    pub store_id: String,
    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
    pub tax: Option<f64>,
    pub shipping: Option<f64>,
    pub discount: Option<f64>,
    pub currency: Option<String>,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub notes: Option<String>,
    pub created_by: String,
}

/// Caller-facing partial update; the externally patchable fields only.
/// The lifecycle engine turns this into an [`OrderPatch`] with audit stamps.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<i64>,
    pub notes: Option<String>,
}

/// Partial update merged over an existing order.
/// Only fields present are touched; the engine stamps the audit fields.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

// =============================================================================
// Stats
// =============================================================================

/// Aggregate statistics over a tenant's (optionally store-scoped) orders.
/// Refunded orders count toward the totals but have no breakdown field,
/// matching the upstream reporting contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub pending_orders: i64,
    pub confirmed_orders: i64,
    pub processing_orders: i64,
    pub shipped_orders: i64,
    pub delivered_orders: i64,
    pub cancelled_orders: i64,
}
