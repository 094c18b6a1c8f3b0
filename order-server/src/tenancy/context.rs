//! Request tenant context
//!
//! The gateway in front of this service authenticates the caller and injects
//! the tenant scope as trusted headers. This extractor is the only place the
//! headers are read.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::utils::AppError;

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const STORE_HEADER: &str = "x-store-id";
pub const USER_HEADER: &str = "x-user-id";

/// Authenticated tenant/store/user scope for one request
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: String,
    /// Store sub-scope; absent means tenant-wide (stats, listing)
    pub store_id: Option<String>,
    pub user_id: String,
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tenant_id = header(TENANT_HEADER).ok_or(AppError::Unauthorized)?;
        let user_id = header(USER_HEADER).ok_or(AppError::Unauthorized)?;
        let store_id = header(STORE_HEADER);

        Ok(Self {
            tenant_id,
            store_id,
            user_id,
        })
    }
}
