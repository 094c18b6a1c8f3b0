//! Order Lifecycle Engine
//!
//! One stateless service instance handles every tenant; the tenant scope is
//! passed per call and resolved through the [`TenantDirectory`] before any
//! store access. Orders are created once, then only ever mutated through
//! [`OrderService::update_order`] (cancellation included); they are never
//! physically deleted.

use tracing::info;

use crate::db::models::{
    Order, OrderCreate, OrderPatch, OrderStats, OrderStatus, OrderUpdate, PaymentStatus,
};
use crate::db::repository::{OrderFilter, OrderRepository, SortSpec};
use crate::orders::error::{OrderError, OrderResult};
use crate::orders::{numbering, query};
use crate::tenancy::{ResolvedTenant, TenantDirectory};
use crate::utils::{Pagination, time};

#[derive(Clone)]
pub struct OrderService {
    directory: TenantDirectory,
}

impl OrderService {
    pub fn new(directory: TenantDirectory) -> Self {
        Self { directory }
    }

    // ========================================================================
    // Create
    // ========================================================================

    /// Create an order: compute totals, assign a fresh order number, persist.
    /// No side effect beyond the write.
    pub async fn create_order(&self, tenant_id: &str, input: OrderCreate) -> OrderResult<Order> {
        let resolved = self.directory.resolve(tenant_id).await?;
        validate_create(&input)?;

        let repo = OrderRepository::new(resolved.store.clone());
        let order_number = self.next_order_number(&resolved, &repo).await?;

        let subtotal: f64 = input.items.iter().map(|item| item.total_price).sum();
        let tax = input.tax.unwrap_or(0.0);
        let shipping = input.shipping.unwrap_or(0.0);
        let discount = input.discount.unwrap_or(0.0);
        let total = subtotal + tax + shipping - discount;

        let currency = input
            .currency
            .unwrap_or_else(|| resolved.tenant.settings.currency.clone());

        let now = time::now_millis();
        let order = Order {
            id: None,
            order_number,
            customer_id: input.customer_id,
            customer_email: input.customer_email,
            customer_name: input.customer_name,
            store_id: input.store_id,
            items: input.items,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: input.payment_method,
            subtotal,
            tax,
            shipping,
            discount,
            total,
            currency,
            shipping_address: input.shipping_address,
            billing_address: input.billing_address,
            notes: input.notes,
            tracking_number: None,
            estimated_delivery: None,
            delivered_at: None,
            cancelled_at: None,
            cancel_reason: None,
            created_by: input.created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };

        let created = repo.create(order).await?;
        info!(
            tenant_id,
            order_number = %created.order_number,
            total = created.total,
            "Order created"
        );
        Ok(created)
    }

    /// Next order number for the tenant; also exposed for tooling
    pub async fn generate_order_number(&self, tenant_id: &str) -> OrderResult<String> {
        let resolved = self.directory.resolve(tenant_id).await?;
        let repo = OrderRepository::new(resolved.store.clone());
        self.next_order_number(&resolved, &repo).await
    }

    async fn next_order_number(
        &self,
        resolved: &ResolvedTenant,
        repo: &OrderRepository,
    ) -> OrderResult<String> {
        let settings = &resolved.tenant.settings;
        let prefix = if settings.order_prefix.trim().is_empty() {
            numbering::DEFAULT_PREFIX
        } else {
            settings.order_prefix.as_str()
        };
        let date_key = numbering::today_key(&settings.timezone);

        let seq = repo
            .next_daily_sequence(&numbering::counter_key(prefix, &date_key))
            .await?;
        Ok(numbering::format_order_number(prefix, &date_key, seq))
    }

    // ========================================================================
    // Read
    // ========================================================================

    /// One page of orders matching the conjunctive filter set
    pub async fn get_orders(
        &self,
        tenant_id: &str,
        filter: OrderFilter,
        sort: SortSpec,
        page: u32,
        limit: u32,
    ) -> OrderResult<(Vec<Order>, Pagination)> {
        let resolved = self.directory.resolve(tenant_id).await?;
        let (page, limit) = query::normalize_page(page, limit)?;

        let repo = OrderRepository::new(resolved.store.clone());
        let total = repo.count(&filter).await?;
        let orders = repo.find_page(&filter, sort, limit, (page - 1) * limit).await?;

        Ok((orders, query::page_info(page, limit, total)))
    }

    pub async fn get_order_by_id(&self, tenant_id: &str, order_id: &str) -> OrderResult<Order> {
        let resolved = self.directory.resolve(tenant_id).await?;
        let repo = OrderRepository::new(resolved.store.clone());
        repo.find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    // ========================================================================
    // Update / Cancel
    // ========================================================================

    /// Apply a partial update after the transition guards pass.
    ///
    /// Two guards only: a cancelled order rejects every patch, a delivered
    /// order accepts only a move to refunded. Other status jumps are accepted
    /// as-is (no full transition table; widening the guards is a pending
    /// product decision).
    pub async fn update_order(
        &self,
        tenant_id: &str,
        order_id: &str,
        update: OrderUpdate,
        updated_by: &str,
    ) -> OrderResult<Order> {
        let resolved = self.directory.resolve(tenant_id).await?;
        let repo = OrderRepository::new(resolved.store.clone());
        let order = repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        let patch = OrderPatch {
            status: update.status,
            payment_status: update.payment_status,
            tracking_number: update.tracking_number,
            estimated_delivery: update.estimated_delivery,
            notes: update.notes,
            ..Default::default()
        };
        self.apply_update(tenant_id, &repo, &order, patch, updated_by)
            .await
    }

    /// Cancellation is an update with a required reason. The reason check
    /// runs first, before anything is fetched or mutated.
    pub async fn cancel_order(
        &self,
        tenant_id: &str,
        order_id: &str,
        reason: &str,
        cancelled_by: &str,
    ) -> OrderResult<Order> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(OrderError::MissingCancelReason);
        }

        let resolved = self.directory.resolve(tenant_id).await?;
        let repo = OrderRepository::new(resolved.store.clone());
        let order = repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        let patch = OrderPatch {
            status: Some(OrderStatus::Cancelled),
            cancel_reason: Some(reason.to_string()),
            ..Default::default()
        };
        self.apply_update(tenant_id, &repo, &order, patch, cancelled_by)
            .await
    }

    async fn apply_update(
        &self,
        tenant_id: &str,
        repo: &OrderRepository,
        order: &Order,
        mut patch: OrderPatch,
        updated_by: &str,
    ) -> OrderResult<Order> {
        // Guards run against the current status, before any field is applied
        if order.status == OrderStatus::Delivered && patch.status != Some(OrderStatus::Refunded) {
            return Err(OrderError::InvalidTransition(
                "Cannot modify delivered order".to_string(),
            ));
        }
        if order.status == OrderStatus::Cancelled {
            return Err(OrderError::InvalidTransition(
                "Cannot modify cancelled order".to_string(),
            ));
        }

        let now = time::now_millis();
        // Status milestones are stamped server-side; caller values never win
        match patch.status {
            Some(OrderStatus::Delivered) => patch.delivered_at = Some(now),
            Some(OrderStatus::Cancelled) => patch.cancelled_at = Some(now),
            _ => {}
        }
        patch.updated_by = Some(updated_by.to_string());
        patch.updated_at = Some(now);

        let updated = repo
            .merge_patch(&order.id_string(), patch)
            .await
            .map_err(|e| match e {
                crate::db::repository::RepoError::NotFound(_) => {
                    OrderError::OrderNotFound(order.order_number.clone())
                }
                other => OrderError::Storage(other),
            })?;

        info!(
            tenant_id,
            order_number = %updated.order_number,
            status = ?updated.status,
            "Order updated"
        );
        Ok(updated)
    }

    // ========================================================================
    // Stats
    // ========================================================================

    /// Aggregate stats over the tenant's orders, optionally store-scoped
    pub async fn get_order_stats(
        &self,
        tenant_id: &str,
        store_id: Option<&str>,
    ) -> OrderResult<OrderStats> {
        let resolved = self.directory.resolve(tenant_id).await?;
        let repo = OrderRepository::new(resolved.store.clone());
        Ok(repo.stats(store_id).await?)
    }
}

/// Domain invariants re-checked here even though the boundary validates
/// request shape; the engine is reachable from other internal callers.
fn validate_create(input: &OrderCreate) -> OrderResult<()> {
    if input.items.is_empty() {
        return Err(OrderError::Validation(
            "Order must contain at least one item".to_string(),
        ));
    }
    for (idx, item) in input.items.iter().enumerate() {
        if item.quantity < 1 {
            return Err(OrderError::Validation(format!(
                "items[{idx}].quantity must be >= 1"
            )));
        }
        if item.unit_price < 0.0 {
            return Err(OrderError::Validation(format!(
                "items[{idx}].unitPrice must be >= 0"
            )));
        }
        if item.total_price < 0.0 {
            return Err(OrderError::Validation(format!(
                "items[{idx}].totalPrice must be >= 0"
            )));
        }
        if item.discount < 0.0 {
            return Err(OrderError::Validation(format!(
                "items[{idx}].discount must be >= 0"
            )));
        }
    }
    for (value, field) in [
        (input.tax, "tax"),
        (input.shipping, "shipping"),
        (input.discount, "discount"),
    ] {
        if let Some(v) = value
            && v < 0.0
        {
            return Err(OrderError::Validation(format!("{field} must be >= 0")));
        }
    }
    Ok(())
}
