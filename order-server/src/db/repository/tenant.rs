//! Tenant Repository
//!
//! Runs against the shared directory store. Tenants are provisioned
//! out-of-band; `create` exists for provisioning tooling and tests.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Tenant, TenantCreate, TenantStatus};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "tenant";

#[derive(Clone)]
pub struct TenantRepository {
    base: BaseRepository,
}

impl TenantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a tenant by its external tenant id
    pub async fn find_by_tenant_id(&self, tenant_id: &str) -> RepoResult<Option<Tenant>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM tenant WHERE tenantId = $tenant_id LIMIT 1")
            .bind(("tenant_id", tenant_id.to_string()))
            .await?;
        let tenants: Vec<Tenant> = result.take(0)?;
        Ok(tenants.into_iter().next())
    }

    /// Provision a new tenant record
    pub async fn create(&self, data: TenantCreate) -> RepoResult<Tenant> {
        if self.find_by_tenant_id(&data.tenant_id).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Tenant '{}' already exists",
                data.tenant_id
            )));
        }

        let now = time::now_millis();
        let tenant = Tenant {
            id: None,
            tenant_id: data.tenant_id,
            name: data.name,
            data_store_ref: data.data_store_ref,
            status: data.status.unwrap_or(TenantStatus::Active),
            settings: data.settings.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let created: Option<Tenant> = self.base.db().create(TABLE).content(tenant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create tenant".to_string()))
    }
}
