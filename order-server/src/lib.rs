//! Order Server - multi-tenant order management service
//!
//! # Architecture
//!
//! Every request is scoped to a tenant resolved through the Tenant Directory;
//! orders live in per-tenant isolated stores.
//!
//! - **Tenancy** (`tenancy`): tenant resolution and per-request scope
//! - **Orders** (`orders`): order lifecycle, numbering, stats aggregation
//! - **Database** (`db`): embedded SurrealDB stores and repositories
//! - **HTTP API** (`api`): RESTful routes and handlers
//!
//! # Module layout
//!
//! ```text
//! order-server/src/
//! ├── core/          # configuration, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── tenancy/       # tenant directory + request context
//! ├── orders/        # lifecycle engine, numbering, stats
//! ├── db/            # database layer
//! └── utils/         # errors, logging, time, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod tenancy;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::orders::{OrderError, OrderService};
pub use crate::tenancy::{TenantContext, TenantDirectory, TenantError};
pub use crate::utils::{ApiResponse, AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};
