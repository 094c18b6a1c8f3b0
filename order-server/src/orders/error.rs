//! Order lifecycle errors

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::tenancy::TenantError;
use crate::utils::AppError;

/// Lifecycle engine errors. Every kind the boundary needs to distinguish
/// surfaces here; infrastructure failures stay separate under `Storage`.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Tenant(#[from] TenantError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("Cancel reason is required")]
    MissingCancelReason,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Tenant(TenantError::NotFound(id)) => {
                AppError::NotFound(format!("Tenant not found: {id}"))
            }
            OrderError::Tenant(TenantError::Inactive(id)) => {
                AppError::Forbidden(format!("Tenant is not active: {id}"))
            }
            OrderError::Tenant(TenantError::Storage(e)) => AppError::Database(e.to_string()),
            OrderError::OrderNotFound(id) => AppError::NotFound(format!("Order not found: {id}")),
            OrderError::InvalidTransition(msg) => AppError::Conflict(msg),
            OrderError::MissingCancelReason => {
                AppError::Validation("Cancel reason is required".to_string())
            }
            OrderError::Validation(msg) => AppError::Validation(msg),
            OrderError::Storage(RepoError::NotFound(msg)) => AppError::NotFound(msg),
            OrderError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
