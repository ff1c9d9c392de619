//! Page bounds and page metadata math.

use inkwell_shared::PageMetadata;

use crate::error::DomainError;

pub const MAX_PAGE_SIZE: u64 = 100;

/// A validated `(page, size)` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::Validation("page must be at least 1".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(DomainError::Validation(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        // Offsets end up in a bigint OFFSET clause.
        let fits = (page - 1)
            .checked_mul(size)
            .is_some_and(|offset| offset <= i64::MAX as u64);
        if !fits {
            return Err(DomainError::Validation("page is out of range".to_string()));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.size
    }

    /// Number of rows to return.
    pub fn limit(&self) -> u64 {
        self.size
    }

    /// Build page metadata for a result set with `total_item` matching rows.
    pub fn metadata(&self, total_item: u64) -> PageMetadata {
        PageMetadata {
            page: self.page,
            size: self.size,
            total_item,
            total_page: total_item.div_ceil(self.size),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub paging: PageMetadata,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            paging: self.paging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(3, 10, 20)]
    #[case(2, 100, 100)]
    fn test_offset(#[case] page: u64, #[case] size: u64, #[case] offset: u64) {
        let req = PageRequest::new(page, size).unwrap();
        assert_eq!(req.offset(), offset);
        assert_eq!(req.limit(), size);
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(25, 10, 3)]
    #[case(30, 10, 3)]
    #[case(31, 10, 4)]
    #[case(1, 100, 1)]
    fn test_total_pages(#[case] total: u64, #[case] size: u64, #[case] pages: u64) {
        let meta = PageRequest::new(1, size).unwrap().metadata(total);
        assert_eq!(meta.total_item, total);
        assert_eq!(meta.total_page, pages);
    }

    #[test]
    fn test_largest_offset_is_accepted() {
        let req = PageRequest::new(i64::MAX as u64 / 100 + 1, 100).unwrap();
        assert!(req.offset() <= i64::MAX as u64);
    }

    #[rstest]
    #[case(0, 10)]
    #[case(1, 0)]
    #[case(1, 101)]
    #[case(u64::MAX, 100)]
    #[case(u64::MAX, 1)]
    #[case(i64::MAX as u64 / 2 + 2, 2)]
    fn test_out_of_bounds(#[case] page: u64, #[case] size: u64) {
        assert!(matches!(
            PageRequest::new(page, size),
            Err(DomainError::Validation(_))
        ));
    }
}
