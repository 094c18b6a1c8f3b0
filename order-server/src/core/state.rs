use std::time::Instant;

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::RepoResult;
use crate::orders::OrderService;
use crate::tenancy::TenantDirectory;

/// Shared server state
///
/// Built once at startup and cloned into every request handler. The service
/// objects are stateless; the only long-lived resources are the store handles
/// inside [`DbService`], which are safe for concurrent use.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub orders: OrderService,
    /// Process start, reported by the health probe
    pub started_at: Instant,
}

impl ServerState {
    /// Initialize the state against on-disk stores under the configured
    /// working directory
    pub async fn initialize(config: &Config) -> RepoResult<Self> {
        let db = DbService::open(&config.work_dir).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// State backed by in-memory stores (tests)
    pub async fn initialize_in_memory(config: &Config) -> RepoResult<Self> {
        let db = DbService::open_in_memory().await?;
        Ok(Self::with_db(config.clone(), db))
    }

    fn with_db(config: Config, db: DbService) -> Self {
        let directory = TenantDirectory::new(db.clone());
        let orders = OrderService::new(directory);
        Self {
            config,
            db,
            orders,
            started_at: Instant::now(),
        }
    }
}
