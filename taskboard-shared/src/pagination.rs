//! Page/limit pagination
//!
//! Pages are 1-based. A page past the end is valid and simply empty.

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Rejected pagination parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("page must be at least 1")]
    InvalidPage,

    #[error("limit must be between 1 and 100")]
    InvalidLimit,
}

/// Requested window into an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::InvalidPage);
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::InvalidLimit);
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip, for SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: i64) -> i64 {
        let limit = i64::from(self.limit);
        (total.max(0) + limit - 1) / limit
    }
}

/// One page of results plus the size of the whole filtered set
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    pub fn page(&self) -> u32 {
        self.request.page
    }

    pub fn total_pages(&self) -> i64 {
        self.request.total_pages(self.total)
    }

    /// Number of items on this page
    pub fn results(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(2, 10).unwrap().offset(), 10);
        assert_eq!(PageRequest::new(5, 3).unwrap().offset(), 12);
    }

    #[test]
    fn test_total_pages() {
        let req = PageRequest::new(1, 10).unwrap();
        assert_eq!(req.total_pages(0), 0);
        assert_eq!(req.total_pages(1), 1);
        assert_eq!(req.total_pages(10), 1);
        assert_eq!(req.total_pages(15), 2);
        assert_eq!(req.total_pages(21), 3);
    }

    #[test]
    fn test_rejects_out_of_range_parameters() {
        assert_eq!(PageRequest::new(0, 10), Err(PaginationError::InvalidPage));
        assert_eq!(PageRequest::new(1, 0), Err(PaginationError::InvalidLimit));
        assert_eq!(PageRequest::new(1, MAX_LIMIT + 1), Err(PaginationError::InvalidLimit));
        assert!(PageRequest::new(1, MAX_LIMIT).is_ok());
    }

    #[test]
    fn test_page_past_the_end_is_empty_not_an_error() {
        let req = PageRequest::new(7, 10).unwrap();
        let page: Page<u8> = Page::new(Vec::new(), 15, req);

        assert_eq!(page.results(), 0);
        assert_eq!(page.page(), 7);
        assert_eq!(page.total_pages(), 2);
    }
}
