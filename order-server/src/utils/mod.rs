//! Utility module — shared helpers and types
//!
//! - [`AppError`] / [`ApiResponse`] - error type and response envelope
//! - [`logger`] - tracing setup
//! - [`time`] - business timezone and millis conversion
//! - [`validation`] - text validation helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{ApiResponse, AppError, Pagination};
pub use error::{ok_paginated, ok_with_message};
pub use result::AppResult;
