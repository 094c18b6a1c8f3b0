//! Tenant Model
//!
//! Tenant records live in the shared directory store. They are provisioned
//! out-of-band; this service only reads them during tenant resolution.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Tenant lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Active,
    Inactive,
    Suspended,
}

/// Per-tenant settings applied as defaults during order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSettings {
    #[serde(default = "default_order_prefix")]
    pub order_prefix: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_order_prefix() -> String {
    "ORD".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            order_prefix: default_order_prefix(),
            currency: default_currency(),
            timezone: default_timezone(),
        }
    }
}

/// Tenant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub tenant_id: String,
    pub name: String,
    /// Name of the tenant's isolated order store; stable for the tenant's lifetime
    pub data_store_ref: String,
    pub status: TenantStatus,
    #[serde(default)]
    pub settings: TenantSettings,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for provisioning a tenant (tooling and tests)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantCreate {
    pub tenant_id: String,
    pub name: String,
    pub data_store_ref: String,
    #[serde(default)]
    pub status: Option<TenantStatus>,
    #[serde(default)]
    pub settings: Option<TenantSettings>,
}
