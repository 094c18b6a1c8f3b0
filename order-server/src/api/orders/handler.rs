//! Order API Handlers
//!
//! Request-shape validation lives here at the boundary (`validator` derive);
//! the lifecycle engine re-checks the domain invariants it cares about.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::core::ServerState;
use crate::db::models::{
    Address, Order, OrderCreate, OrderItem, OrderStats, OrderStatus, OrderUpdate, PaymentMethod,
    PaymentStatus,
};
use crate::db::repository::{OrderFilter, SortSpec};
use crate::orders::query;
use crate::tenancy::TenantContext;
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ok_paginated, ok_with_message, time};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub product_id: String,
    #[validate(length(min = 1, max = 200))]
    pub product_name: String,
    #[validate(length(min = 1, max = 100))]
    pub sku: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
    #[validate(range(min = 0.0))]
    pub total_price: f64,
    #[validate(range(min = 0.0))]
    pub discount: Option<f64>,
}

impl From<OrderItemRequest> for OrderItem {
    fn from(item: OrderItemRequest) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item.product_name,
            sku: item.sku,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
            discount: item.discount.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(length(min = 1, max = 500))]
    pub address_line1: String,
    #[validate(length(max = 500))]
    pub address_line2: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
}

impl From<AddressRequest> for Address {
    fn from(addr: AddressRequest) -> Self {
        Self {
            full_name: addr.full_name,
            address_line1: addr.address_line1,
            address_line2: addr.address_line2,
            city: addr.city,
            state: addr.state,
            postal_code: addr.postal_code,
            country: addr.country,
            phone: addr.phone,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub customer_id: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemRequest>,
    pub payment_method: PaymentMethod,
    #[validate(range(min = 0.0))]
    pub tax: Option<f64>,
    #[validate(range(min = 0.0))]
    pub shipping: Option<f64>,
    #[validate(range(min = 0.0))]
    pub discount: Option<f64>,
    #[validate(length(min = 3, max = 3))]
    pub currency: Option<String>,
    #[validate(nested)]
    pub shipping_address: AddressRequest,
    #[validate(nested)]
    pub billing_address: Option<AddressRequest>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[validate(length(max = 100))]
    pub tracking_number: Option<String>,
    /// Unix millis
    pub estimated_delivery: Option<i64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    #[serde(default)]
    pub cancel_reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub sort: Option<String>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub customer_id: Option<String>,
    /// YYYY-MM-DD, inclusive
    pub start_date: Option<String>,
    /// YYYY-MM-DD, inclusive
    pub end_date: Option<String>,
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/orders
pub async fn create_order(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationErrors(validation_messages(&e)))?;
    let store_id = ctx
        .store_id
        .clone()
        .ok_or_else(|| AppError::Validation("Store context is required".to_string()))?;

    let input = OrderCreate {
        customer_id: payload.customer_id,
        customer_email: payload.customer_email,
        customer_name: payload.customer_name,
        store_id,
        items: payload.items.into_iter().map(OrderItem::from).collect(),
        payment_method: payload.payment_method,
        tax: payload.tax,
        shipping: payload.shipping,
        discount: payload.discount,
        currency: payload.currency,
        shipping_address: payload.shipping_address.into(),
        billing_address: payload.billing_address.map(Address::from),
        notes: payload.notes,
        created_by: ctx.user_id.clone(),
    };

    let order = state.orders.create_order(&ctx.tenant_id, input).await?;
    Ok((
        StatusCode::CREATED,
        ok_with_message(order, "Order created successfully"),
    ))
}

/// GET /api/orders
pub async fn list_orders(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Query(params): Query<ListOrdersQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let sort = match params.sort.as_deref() {
        Some(sort) => query::parse_sort(sort)?,
        None => SortSpec::default(),
    };

    let filter = OrderFilter {
        status: params.status,
        payment_status: params.payment_status,
        customer_id: params.customer_id,
        store_id: ctx.store_id.clone(),
        start_millis: parse_bound(params.start_date.as_deref(), time::day_start_millis)?,
        end_millis: parse_bound(params.end_date.as_deref(), time::day_end_millis)?,
        search: params.search.filter(|s| !s.trim().is_empty()),
    };

    let (orders, pagination) = state
        .orders
        .get_orders(&ctx.tenant_id, filter, sort, params.page, params.limit)
        .await?;
    Ok(ok_paginated(
        orders,
        pagination,
        "Orders retrieved successfully",
    ))
}

/// GET /api/orders/stats
pub async fn get_order_stats(
    State(state): State<ServerState>,
    ctx: TenantContext,
) -> AppResult<Json<ApiResponse<OrderStats>>> {
    let stats = state
        .orders
        .get_order_stats(&ctx.tenant_id, ctx.store_id.as_deref())
        .await?;
    Ok(ok_with_message(
        stats,
        "Order statistics retrieved successfully",
    ))
}

/// GET /api/orders/{order_id}
pub async fn get_order_by_id(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state
        .orders
        .get_order_by_id(&ctx.tenant_id, &order_id)
        .await?;
    Ok(ok_with_message(order, "Order retrieved successfully"))
}

/// PUT /api/orders/{order_id}
pub async fn update_order(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(order_id): Path<String>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationErrors(validation_messages(&e)))?;

    let update = OrderUpdate {
        status: payload.status,
        payment_status: payload.payment_status,
        tracking_number: payload.tracking_number,
        estimated_delivery: payload.estimated_delivery,
        notes: payload.notes,
    };

    let order = state
        .orders
        .update_order(&ctx.tenant_id, &order_id, update, &ctx.user_id)
        .await?;
    Ok(ok_with_message(order, "Order updated successfully"))
}

/// PATCH /api/orders/{order_id}/cancel
pub async fn cancel_order(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(order_id): Path<String>,
    Json(payload): Json<CancelOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    validate_required_text(&payload.cancel_reason, "cancelReason", MAX_NOTE_LEN)?;

    let order = state
        .orders
        .cancel_order(
            &ctx.tenant_id,
            &order_id,
            &payload.cancel_reason,
            &ctx.user_id,
        )
        .await?;
    Ok(ok_with_message(order, "Order cancelled successfully"))
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_bound(
    date: Option<&str>,
    to_millis: fn(chrono::NaiveDate) -> i64,
) -> AppResult<Option<i64>> {
    match date {
        Some(raw) => {
            let parsed = time::parse_date(raw)
                .map_err(|_| AppError::Validation(format!("Invalid date: {raw}")))?;
            Ok(Some(to_millis(parsed)))
        }
        None => Ok(None),
    }
}

/// Flatten `validator` output into one message per failed field
fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_messages(errors, "", &mut messages);
    messages.sort();
    messages
}

fn collect_messages(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let detail = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    out.push(format!("{path}: {detail}"));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}
