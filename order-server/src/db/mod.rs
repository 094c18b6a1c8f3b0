//! Database Module
//!
//! Embedded SurrealDB stores. One *directory* store holds tenant records;
//! every tenant owns an isolated order store (its own RocksDB directory,
//! named by the tenant's `dataStoreRef`). Store handles are long-lived,
//! cached, and safe for concurrent use across in-flight requests.

pub mod models;
pub mod repository;

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use tokio::sync::Mutex;

use repository::{RepoError, RepoResult};

const NAMESPACE: &str = "orders";
const DIRECTORY_DB: &str = "directory";
const TENANT_DB: &str = "orders";

/// Storage backend for tenant stores
#[derive(Debug, Clone)]
enum StoreBackend {
    /// One RocksDB directory per tenant under `base_dir/tenants/`
    RocksDb { base_dir: PathBuf },
    /// In-memory stores (tests)
    Memory,
}

/// Database service — owns the directory store and the cached tenant stores
#[derive(Clone)]
pub struct DbService {
    directory: Surreal<Db>,
    tenant_stores: Arc<DashMap<String, Surreal<Db>>>,
    /// Serializes first-open of a tenant store; lookups stay lock-free
    open_lock: Arc<Mutex<()>>,
    backend: StoreBackend,
}

impl DbService {
    /// Open the on-disk stores under `work_dir/data`
    pub async fn open(work_dir: &str) -> RepoResult<Self> {
        let base_dir = PathBuf::from(work_dir).join("data");
        let path = base_dir.join(DIRECTORY_DB);
        let path_str = path.to_string_lossy().into_owned();
        let directory = Surreal::new::<RocksDb>(path_str.as_str()).await?;
        Self::init_directory(&directory).await?;

        tracing::info!(path = %base_dir.display(), "Database stores opened (RocksDB)");

        Ok(Self {
            directory,
            tenant_stores: Arc::new(DashMap::new()),
            open_lock: Arc::new(Mutex::new(())),
            backend: StoreBackend::RocksDb { base_dir },
        })
    }

    /// Open fully in-memory stores (tests)
    pub async fn open_in_memory() -> RepoResult<Self> {
        let directory = Surreal::new::<Mem>(()).await?;
        Self::init_directory(&directory).await?;

        Ok(Self {
            directory,
            tenant_stores: Arc::new(DashMap::new()),
            open_lock: Arc::new(Mutex::new(())),
            backend: StoreBackend::Memory,
        })
    }

    /// The shared directory store (tenant records)
    pub fn directory(&self) -> &Surreal<Db> {
        &self.directory
    }

    /// Handle to a tenant's isolated order store, opening it on first use
    pub async fn tenant_store(&self, data_store_ref: &str) -> RepoResult<Surreal<Db>> {
        if let Some(handle) = self.tenant_stores.get(data_store_ref) {
            return Ok(handle.clone());
        }

        // Double-checked: only one task may open a given store
        let _guard = self.open_lock.lock().await;
        if let Some(handle) = self.tenant_stores.get(data_store_ref) {
            return Ok(handle.clone());
        }

        let store = self.open_tenant_store(data_store_ref).await?;
        self.tenant_stores
            .insert(data_store_ref.to_string(), store.clone());
        tracing::info!(store = data_store_ref, "Tenant store opened");
        Ok(store)
    }

    async fn open_tenant_store(&self, data_store_ref: &str) -> RepoResult<Surreal<Db>> {
        let store = match &self.backend {
            StoreBackend::RocksDb { base_dir } => {
                let path = base_dir.join("tenants").join(data_store_ref);
                let path_str = path.to_string_lossy().into_owned();
                Surreal::new::<RocksDb>(path_str.as_str()).await?
            }
            StoreBackend::Memory => Surreal::new::<Mem>(()).await?,
        };
        store.use_ns(NAMESPACE).use_db(TENANT_DB).await?;
        Self::define_order_schema(&store).await?;
        Ok(store)
    }

    async fn init_directory(directory: &Surreal<Db>) -> RepoResult<()> {
        directory.use_ns(NAMESPACE).use_db(DIRECTORY_DB).await?;
        directory
            .query("DEFINE TABLE IF NOT EXISTS tenant SCHEMALESS")
            .query("DEFINE INDEX IF NOT EXISTS idx_tenant_id ON TABLE tenant COLUMNS tenantId UNIQUE")
            .query("DEFINE INDEX IF NOT EXISTS idx_tenant_store_ref ON TABLE tenant COLUMNS dataStoreRef UNIQUE")
            .await?
            .check()
            .map_err(RepoError::from)?;
        Ok(())
    }

    /// Mirrors the lookup paths the service actually takes: number uniqueness,
    /// customer/store/status filters, createdAt sorting.
    async fn define_order_schema(store: &Surreal<Db>) -> RepoResult<()> {
        store
            .query("DEFINE TABLE IF NOT EXISTS order SCHEMALESS")
            .query("DEFINE INDEX IF NOT EXISTS idx_order_number ON TABLE order COLUMNS orderNumber UNIQUE")
            .query("DEFINE INDEX IF NOT EXISTS idx_order_customer ON TABLE order COLUMNS customerId")
            .query("DEFINE INDEX IF NOT EXISTS idx_order_store ON TABLE order COLUMNS storeId")
            .query("DEFINE INDEX IF NOT EXISTS idx_order_status ON TABLE order COLUMNS status")
            .query("DEFINE INDEX IF NOT EXISTS idx_order_created ON TABLE order COLUMNS createdAt")
            .query("DEFINE TABLE IF NOT EXISTS order_counter SCHEMALESS")
            .await?
            .check()
            .map_err(RepoError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tenant_stores_are_isolated() {
        let db = DbService::open_in_memory().await.unwrap();
        let a = db.tenant_store("store_a").await.unwrap();
        let b = db.tenant_store("store_b").await.unwrap();

        a.query("CREATE order_counter:probe SET value = 1")
            .await
            .unwrap()
            .check()
            .unwrap();

        let mut result = b
            .query("SELECT value FROM order_counter:probe")
            .await
            .unwrap();
        let rows: Vec<serde_json::Value> = result.take(0).unwrap();
        assert!(rows.is_empty(), "tenant stores must not share data");
    }

    #[tokio::test]
    async fn tenant_store_handle_is_cached() {
        let db = DbService::open_in_memory().await.unwrap();
        let _ = db.tenant_store("store_a").await.unwrap();
        let _ = db.tenant_store("store_a").await.unwrap();
        assert_eq!(db.tenant_stores.len(), 1);
    }

    #[tokio::test]
    async fn opens_on_disk_stores() {
        let dir = tempfile::tempdir().unwrap();
        let db = DbService::open(dir.path().to_str().unwrap()).await.unwrap();
        let _ = db.tenant_store("store_a").await.unwrap();
    }
}
