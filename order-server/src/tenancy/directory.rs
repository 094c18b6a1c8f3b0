//! Tenant Directory
//!
//! Resolves a tenant id to the tenant's settings and its isolated order
//! store. Every order operation resolves first; nothing proceeds against an
//! unresolved or inactive tenant.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::db::DbService;
use crate::db::models::{Tenant, TenantStatus};
use crate::db::repository::{RepoError, TenantRepository};

/// Tenant resolution failures
#[derive(Debug, Error)]
pub enum TenantError {
    #[error("Tenant not found: {0}")]
    NotFound(String),

    #[error("Tenant is not active: {0}")]
    Inactive(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

/// A resolved tenant: its record plus a handle to its isolated store
#[derive(Clone)]
pub struct ResolvedTenant {
    pub tenant: Tenant,
    pub store: Surreal<Db>,
}

#[derive(Clone)]
pub struct TenantDirectory {
    db: DbService,
}

impl TenantDirectory {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Look up a tenant and open its store.
    ///
    /// `inactive` and `suspended` tenants both resolve as [`TenantError::Inactive`];
    /// only `active` tenants may be operated on.
    pub async fn resolve(&self, tenant_id: &str) -> Result<ResolvedTenant, TenantError> {
        let repo = TenantRepository::new(self.db.directory().clone());
        let tenant = repo
            .find_by_tenant_id(tenant_id)
            .await?
            .ok_or_else(|| TenantError::NotFound(tenant_id.to_string()))?;

        if tenant.status != TenantStatus::Active {
            return Err(TenantError::Inactive(tenant_id.to_string()));
        }

        let store = self.db.tenant_store(&tenant.data_store_ref).await?;
        Ok(ResolvedTenant { tenant, store })
    }
}
