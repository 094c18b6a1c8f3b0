//! Unified Error Handling
//!
//! Provides the application-level error type and the API response envelope:
//! - [`AppError`] - application error enum, maps onto HTTP statuses
//! - [`ApiResponse`] - `{success, message, data?, errors?, pagination?}` envelope
//!
//! Domain errors ([`crate::orders::OrderError`], [`crate::tenancy::TenantError`],
//! [`crate::db::repository::RepoError`]) convert into [`AppError`] at the API
//! boundary so every failure kind keeps a distinguishable status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Unified API response structure
///
/// ```json
/// {
///   "success": true,
///   "message": "Order created successfully",
///   "data": { ... },
///   "pagination": { "currentPage": 1, ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Field-level validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Pagination block returned alongside list responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: i64,
    pub limit: u32,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Request Context Errors (4xx) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business Logic Errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed")]
    ValidationErrors(Vec<String>),

    // ========== System Errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            // Missing/invalid gateway context (401)
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
                None,
            ),

            // Inactive tenant and the like (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),

            // Transition guard violations (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::ValidationErrors(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation error".to_string(),
                Some(errors),
            ),

            // Database errors (500) - details go to the log, not the wire
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    None,
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()> {
            success: false,
            message,
            data: None,
            errors,
            pagination: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper functions ==========

/// Create a successful response with a message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: Some(data),
        errors: None,
        pagination: None,
    })
}

/// Create a successful paginated response
pub fn ok_paginated<T: Serialize>(
    data: T,
    pagination: Pagination,
    message: impl Into<String>,
) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: Some(data),
        errors: None,
        pagination: Some(pagination),
    })
}
