//! Order API Module
//!
//! All order routes operate inside the tenant/store/user scope injected by
//! the upstream gateway (see [`crate::tenancy::TenantContext`]).

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create_order).get(handler::list_orders))
        // Static segment registered before the id capture
        .route("/stats", get(handler::get_order_stats))
        .route(
            "/{order_id}",
            get(handler::get_order_by_id).put(handler::update_order),
        )
        .route("/{order_id}/cancel", patch(handler::cancel_order))
}
