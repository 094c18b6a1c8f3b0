//! Order Repository
//!
//! Query layer over a single tenant's order store. Instances are cheap and
//! constructed per request around the store handle returned by tenant
//! resolution. Mutations never delete records; the order list is append +
//! merge-patch only.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderPatch, OrderStats, OrderStatus, PaymentStatus};
use serde::Deserialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

/// Atomic per-day sequence increment; a single statement, so a single
/// transaction on the embedded engine.
const COUNTER_SQL: &str =
    "UPSERT type::thing('order_counter', $key) SET value = (value ?? 0) + 1";

const COUNTER_MAX_ATTEMPTS: u32 = 5;

// =============================================================================
// Query types
// =============================================================================

/// Conjunctive order filters; every field is optional
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub customer_id: Option<String>,
    pub store_id: Option<String>,
    /// Inclusive lower bound on createdAt (Unix millis)
    pub start_millis: Option<i64>,
    /// Inclusive upper bound on createdAt (Unix millis)
    pub end_millis: Option<i64>,
    /// Case-insensitive substring, OR'd across orderNumber / customerName /
    /// customerEmail
    pub search: Option<String>,
}

/// Sortable columns (whitelist; the column name is interpolated into SurrealQL)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    OrderNumber,
    Total,
    Status,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::OrderNumber => "orderNumber",
            SortField::Total => "total",
            SortField::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Sort order for list queries; newest first unless the caller says otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

// =============================================================================
// Row types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CounterRow {
    value: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalsRow {
    total_orders: i64,
    total_revenue: Option<f64>,
    average_order_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StatusCountRow {
    status: OrderStatus,
    count: i64,
}

// =============================================================================
// Repository
// =============================================================================

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order. The unique index on orderNumber backstops the
    /// counter-based numbering.
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        match self.base.db().create(TABLE).content(order).await {
            Ok(created) => {
                let created: Option<Order> = created;
                created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
            }
            Err(e) if e.to_string().contains("already contains") => Err(RepoError::Duplicate(
                "Order number already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Find an order by record id; accepts "order:key" or a bare key
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let key = strip_table_prefix(id);
        let order: Option<Order> = self.base.db().select((TABLE, key)).await?;
        Ok(order)
    }

    /// Merge a partial patch over an existing order and return the result
    pub async fn merge_patch(&self, id: &str, patch: OrderPatch) -> RepoResult<Order> {
        let key = strip_table_prefix(id);
        let thing = RecordId::from_table_key(TABLE, key);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", patch))
            .await?
            .check()?;

        self.find_by_id(key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// One page of orders matching the filter
    pub async fn find_page(
        &self,
        filter: &OrderFilter,
        sort: SortSpec,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Order>> {
        let sql = format!(
            "SELECT * FROM order{} ORDER BY {} {} LIMIT $limit START $offset",
            where_clause(filter),
            sort.field.column(),
            sort.direction.keyword(),
        );

        let mut result = bind_filter(self.base.db().query(sql), filter)
            .bind(("limit", limit as i64))
            .bind(("offset", offset as i64))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Total number of orders matching the filter
    pub async fn count(&self, filter: &OrderFilter) -> RepoResult<i64> {
        let sql = format!(
            "SELECT count() AS count FROM order{} GROUP ALL",
            where_clause(filter)
        );

        let mut result = bind_filter(self.base.db().query(sql), filter).await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Aggregate stats over the tenant's orders, optionally store-scoped.
    /// An empty store yields an all-zero record, never an error.
    pub async fn stats(&self, store_id: Option<&str>) -> RepoResult<OrderStats> {
        let scope = if store_id.is_some() {
            " WHERE storeId = $store_id"
        } else {
            ""
        };

        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT count() AS totalOrders, math::sum(total) AS totalRevenue, \
                 math::mean(total) AS averageOrderValue FROM order{scope} GROUP ALL"
            ))
            .query(format!(
                "SELECT status, count() AS count FROM order{scope} GROUP BY status"
            ))
            .bind(("store_id", store_id.map(str::to_string)))
            .await?;

        let totals: Option<TotalsRow> = result.take(0)?;
        let by_status: Vec<StatusCountRow> = result.take(1)?;

        let mut stats = OrderStats::default();
        if let Some(totals) = totals {
            stats.total_orders = totals.total_orders;
            stats.total_revenue = totals.total_revenue.unwrap_or(0.0);
            stats.average_order_value = totals.average_order_value.unwrap_or(0.0);
        }
        for row in by_status {
            match row.status {
                OrderStatus::Pending => stats.pending_orders = row.count,
                OrderStatus::Confirmed => stats.confirmed_orders = row.count,
                OrderStatus::Processing => stats.processing_orders = row.count,
                OrderStatus::Shipped => stats.shipped_orders = row.count,
                OrderStatus::Delivered => stats.delivered_orders = row.count,
                OrderStatus::Cancelled => stats.cancelled_orders = row.count,
                // Counted in the totals; the breakdown has no refunded field
                OrderStatus::Refunded => {}
            }
        }
        Ok(stats)
    }

    /// Next value of the tenant+prefix+day counter. Bounded retry absorbs
    /// transaction conflicts between concurrent creates; the caller never
    /// sees the retries.
    pub async fn next_daily_sequence(&self, key: &str) -> RepoResult<i64> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_increment(key).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < COUNTER_MAX_ATTEMPTS => {
                    tracing::debug!(error = %err, attempt, "order counter conflict, retrying");
                    tokio::time::sleep(std::time::Duration::from_millis(5 * attempt as u64)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_increment(&self, key: &str) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(COUNTER_SQL)
            .bind(("key", key.to_string()))
            .await?;
        let rows: Vec<CounterRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(|row| row.value)
            .ok_or_else(|| RepoError::Database("Counter upsert returned no row".to_string()))
    }
}

// =============================================================================
// Query building
// =============================================================================

fn strip_table_prefix(id: &str) -> &str {
    id.strip_prefix("order:").unwrap_or(id)
}

fn where_clause(filter: &OrderFilter) -> String {
    let mut conds: Vec<&'static str> = Vec::new();
    if filter.status.is_some() {
        conds.push("status = $status");
    }
    if filter.payment_status.is_some() {
        conds.push("paymentStatus = $payment_status");
    }
    if filter.customer_id.is_some() {
        conds.push("customerId = $customer_id");
    }
    if filter.store_id.is_some() {
        conds.push("storeId = $store_id");
    }
    if filter.start_millis.is_some() {
        conds.push("createdAt >= $start_date");
    }
    if filter.end_millis.is_some() {
        conds.push("createdAt <= $end_date");
    }
    if filter.search.is_some() {
        conds.push(
            "(string::contains(string::lowercase(orderNumber), $search) \
             OR string::contains(string::lowercase(customerName), $search) \
             OR string::contains(string::lowercase(customerEmail), $search))",
        );
    }

    if conds.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conds.join(" AND "))
    }
}

/// Bind every filter value; unused binds are never referenced by the query
fn bind_filter<'r>(
    query: surrealdb::method::Query<'r, Db>,
    filter: &OrderFilter,
) -> surrealdb::method::Query<'r, Db> {
    query
        .bind(("status", filter.status))
        .bind(("payment_status", filter.payment_status))
        .bind(("customer_id", filter.customer_id.clone()))
        .bind(("store_id", filter.store_id.clone()))
        .bind(("start_date", filter.start_millis))
        .bind(("end_date", filter.end_millis))
        .bind(("search", filter.search.as_ref().map(|s| s.to_lowercase())))
}
