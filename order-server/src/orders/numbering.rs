//! Order Numbering
//!
//! Human-readable order identifiers: `{prefix}-{YYYYMMDD}-{seq}` with a
//! 4-digit zero-padded daily sequence. The date key is the current date in
//! the tenant's configured timezone so a tenant's sequence does not depend
//! on which host handled the request. The sequence itself comes from the
//! per-store atomic counter ([`crate::db::repository::OrderRepository::next_daily_sequence`]).

use crate::utils::time;

/// Fallback when the tenant has no (or a blank) configured prefix
pub const DEFAULT_PREFIX: &str = "ORD";

/// Counter record key for one tenant prefix and day
pub fn counter_key(prefix: &str, date_key: &str) -> String {
    format!("{prefix}-{date_key}")
}

/// Today's date key (YYYYMMDD) in the tenant's business timezone
pub fn today_key(timezone: &str) -> String {
    time::local_date_key(time::parse_timezone(timezone))
}

/// Format a full order number; sequences past 9999 widen naturally
pub fn format_order_number(prefix: &str, date_key: &str, seq: i64) -> String {
    format!("{prefix}-{date_key}-{seq:04}")
}
