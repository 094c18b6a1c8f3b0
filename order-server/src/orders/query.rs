//! List-query parsing and pagination math

use crate::db::repository::{SortDirection, SortField, SortSpec};
use crate::orders::error::{OrderError, OrderResult};
use crate::utils::Pagination;

/// Largest page the service will return in one response
pub const MAX_PAGE_SIZE: u32 = 100;

/// Parse a caller sort expression: `field` ascending, `-field` descending.
/// Fields outside the whitelist are a validation error.
pub fn parse_sort(sort: &str) -> OrderResult<SortSpec> {
    let (direction, field) = match sort.strip_prefix('-') {
        Some(rest) => (SortDirection::Desc, rest),
        None => (SortDirection::Asc, sort),
    };

    let field = match field {
        "createdAt" => SortField::CreatedAt,
        "updatedAt" => SortField::UpdatedAt,
        "orderNumber" => SortField::OrderNumber,
        "total" => SortField::Total,
        "status" => SortField::Status,
        other => {
            return Err(OrderError::Validation(format!(
                "Unsupported sort field: {other}"
            )));
        }
    };

    Ok(SortSpec { field, direction })
}

/// Validate the 1-indexed page and clamp the page size to [`MAX_PAGE_SIZE`]
pub fn normalize_page(page: u32, limit: u32) -> OrderResult<(u32, u32)> {
    if page == 0 {
        return Err(OrderError::Validation("page must be >= 1".to_string()));
    }
    if limit == 0 {
        return Err(OrderError::Validation("limit must be >= 1".to_string()));
    }
    Ok((page, limit.min(MAX_PAGE_SIZE)))
}

/// Pagination block for a result set
pub fn page_info(page: u32, limit: u32, total: i64) -> Pagination {
    let total_pages = ((total + limit as i64 - 1) / limit as i64) as u32;
    Pagination {
        current_page: page,
        total_pages,
        total_count: total,
        limit,
    }
}
