//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for paginated listings.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Upper bound on page size; larger requests are clamped, not rejected.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Generic pagination parameters (`?page=&page_size=`), 1-based.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    /// Effective page number, clamped to >= 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to 1..=[`MAX_PAGE_SIZE`].
    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for the effective page.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let params = PageParams {
            page: Some(0),
            page_size: Some(5000),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), MAX_PAGE_SIZE);

        let params = PageParams {
            page: Some(-3),
            page_size: Some(0),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 1);
    }

    #[test]
    fn offset_follows_page_and_size() {
        let params = PageParams {
            page: Some(3),
            page_size: Some(20),
        };
        assert_eq!(params.offset(), 40);
    }
}
