//! # Data Transfer Objects
//!
//! Request and response types for the API endpoints, grouped per resource.

pub mod customers;
pub mod machines;
pub mod notifications;
pub mod points;
pub mod quotations;
pub mod reports;
pub mod service_records;
pub mod users;

use serde::Serialize;

/// Pagination information included with list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// Current page number (1-based)
    pub page:        u64,
    /// Items per page
    pub per_page:    u64,
    /// Total number of items
    pub total:       u64,
    /// Total number of pages
    pub total_pages: u64,
}

impl PaginationInfo {
    /// Build pagination info from page parameters and a total count.
    #[must_use]
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_info() {
        let info = PaginationInfo::new(2, 20, 45);
        assert_eq!(info.total_pages, 3);

        let info = PaginationInfo::new(1, 20, 0);
        assert_eq!(info.total_pages, 0);
    }
}
