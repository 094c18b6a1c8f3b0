//! Tenancy — tenant resolution and per-request tenant scope

pub mod context;
pub mod directory;

pub use context::TenantContext;
pub use directory::{ResolvedTenant, TenantDirectory, TenantError};
