//! Database Models

// Serde helpers
pub mod serde_helpers;

// Directory store
pub mod tenant;

// Tenant stores
pub mod order;

// Re-exports
pub use order::{
    Address, Order, OrderCreate, OrderItem, OrderPatch, OrderStats, OrderStatus, OrderUpdate,
    PaymentMethod, PaymentStatus,
};
pub use tenant::{Tenant, TenantCreate, TenantSettings, TenantStatus};
