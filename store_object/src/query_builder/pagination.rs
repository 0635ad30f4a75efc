//! Page arithmetic and the page envelope

use crate::errors::StoreError;
use crate::query_builder::options::FindOptions;
use serde::Serialize;

pub const MAX_PER_PAGE: i64 = 50;
pub const DEFAULT_PER_PAGE: i64 = 10;
pub const DEFAULT_PAGE: i64 = 1;

/// A validated 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    limit: u64,
    offset: u64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Result<Self, StoreError> {
        if per_page > MAX_PER_PAGE {
            return Err(StoreError::validation(format!(
                "Max results per page: {}",
                MAX_PER_PAGE
            )));
        }
        if per_page < 1 {
            return Err(StoreError::validation("Results per page must be at least 1"));
        }
        if page < 1 {
            return Err(StoreError::validation("Invalid page"));
        }

        // A window that cannot be addressed is as invalid as one past the data
        let offset = (page - 1)
            .checked_mul(per_page)
            .and_then(|offset| u64::try_from(offset).ok())
            .ok_or_else(|| StoreError::validation("Invalid page"))?;
        let limit = u64::try_from(per_page)
            .map_err(|_| StoreError::validation("Results per page must be at least 1"))?;

        Ok(Self {
            page,
            per_page,
            limit,
            offset,
        })
    }

    pub fn from_options(options: &FindOptions) -> Result<Self, StoreError> {
        Self::new(
            options.page.unwrap_or(DEFAULT_PAGE),
            options.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// A page may start at the end of the data but never past it
    pub fn check_against(&self, count: i64) -> Result<(), StoreError> {
        match u64::try_from(count) {
            Ok(count) if self.offset <= count => Ok(()),
            _ => Err(StoreError::validation("Invalid page")),
        }
    }

    pub fn total_pages(&self, total_records: i64) -> i64 {
        (total_records + self.per_page - 1) / self.per_page
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub results: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub records_on_page: usize,
    /// Derived from `total_records`, so it is the real page count on every page
    pub total_pages: i64,
    /// Rows matching the filter, regardless of the window
    pub total_records: i64,
}

impl<T> PageResult<T> {
    pub fn new(results: Vec<T>, pagination: Pagination, total_records: i64) -> Self {
        Self {
            records_on_page: results.len(),
            page: pagination.page,
            per_page: pagination.per_page,
            total_pages: pagination.total_pages(total_records),
            total_records,
            results,
        }
    }
}
