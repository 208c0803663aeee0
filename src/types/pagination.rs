//! Limit/offset pagination for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{MAX_OFFSET, MAX_PAGE_SIZE};
use crate::errors::{AppError, AppResult};

/// Pagination query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page size, 0 or anything above 100 means 100
    #[serde(default)]
    pub limit: u64,
    /// Number of items to skip
    #[serde(default)]
    pub offset: u64,
}

impl PaginationParams {
    /// Reject offsets the database cannot express.
    pub fn check(self) -> AppResult<Self> {
        if self.offset > MAX_OFFSET {
            return Err(AppError::bad_request(format!(
                "offset must not exceed {MAX_OFFSET}"
            )));
        }
        Ok(self)
    }
}

/// Pagination metadata returned next to a page of items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

impl Pagination {
    /// Normalize `limit` and derive the page numbers.
    pub fn new(limit: u64, offset: u64, total: u64) -> Self {
        let limit = match limit {
            0 => MAX_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };

        Self {
            limit,
            offset,
            total,
            total_pages: total.div_ceil(limit),
            current_page: (offset / limit).saturating_add(1),
        }
    }
}
