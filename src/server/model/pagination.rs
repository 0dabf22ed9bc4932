//! Page parameters and paginated results shared by every list operation.

/// Default number of items per page.
pub const DEFAULT_PER_PAGE: u64 = 20;
/// Largest page size a client may request.
pub const MAX_PER_PAGE: u64 = 100;
/// Highest page index served. Keeps `page * per_page` a valid SQL offset.
pub const MAX_PAGE: u64 = 1_000_000;

/// Zero-indexed page request with a bounded page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParam {
    pub page: u64,
    pub per_page: u64,
}

impl PageParam {
    /// Creates page parameters, clamping `per_page` to `1..=MAX_PER_PAGE` and `page` to
    /// `MAX_PAGE`.
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.min(MAX_PAGE),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }
}

impl Default for PageParam {
    fn default() -> Self {
        Self::new(0, DEFAULT_PER_PAGE)
    }
}

/// A page of items with pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    /// Items for this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// Current page number (zero-indexed).
    pub page: u64,
    /// Number of items per page.
    pub per_page: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Builds a page from its items and the total item count.
    pub fn new(items: Vec<T>, total: u64, param: PageParam) -> Self {
        Self {
            items,
            total,
            page: param.page,
            per_page: param.per_page,
            total_pages: total.div_ceil(param.per_page),
        }
    }

    /// Converts every item, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_page_is_clamped() {
        assert_eq!(PageParam::new(0, 0).per_page, 1);
        assert_eq!(PageParam::new(0, 500).per_page, MAX_PER_PAGE);
        assert_eq!(PageParam::default().per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn huge_page_is_clamped() {
        let param = PageParam::new(u64::MAX, u64::MAX);
        assert_eq!(param.page, MAX_PAGE);
        assert!(param.page.checked_mul(param.per_page).is_some_and(|o| o <= i64::MAX as u64));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Paginated::new(vec![1, 2], 41, PageParam::new(2, 20));
        assert_eq!(page.total_pages, 3);

        let empty: Paginated<i32> = Paginated::new(vec![], 0, PageParam::default());
        assert_eq!(empty.total_pages, 0);
    }
}
