//! Offset pagination with the fetch-one-extra convention.
//!
//! Bounded listings fetch `limit + 1` rows at offset `limit * page` so the
//! caller can tell whether more rows exist without a second count query;
//! [`Page::split`] truncates the surplus row back off.

/// Pagination window for a listing query.
///
/// `limit = 0` means unbounded (no `LIMIT` clause at all). A negative page
/// number is coerced to page 0 rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u32,
    page: u32,
}

impl Page {
    /// Create a pagination window. Negative pages are coerced to 0.
    #[must_use]
    pub fn new(limit: u32, page: i64) -> Self {
        let page = if page < 0 {
            0
        } else {
            u32::try_from(page).unwrap_or(u32::MAX)
        };
        Self { limit, page }
    }

    /// The caller-facing page size (`0` = unbounded).
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// The zero-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Whether the window places no bound on the query.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.limit == 0
    }

    /// Rows to actually fetch: one past the page size.
    #[must_use]
    pub fn fetch_limit(&self) -> u64 {
        u64::from(self.limit) + 1
    }

    /// Row offset of this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.limit) * u64::from(self.page)
    }

    /// Truncate a fetched row set back to the page size.
    ///
    /// Returns the page's rows and whether a surplus row indicated more
    /// pages. Unbounded windows pass rows through untouched.
    #[must_use]
    pub fn split<T>(&self, mut rows: Vec<T>) -> (Vec<T>, bool) {
        if self.is_unbounded() {
            return (rows, false);
        }
        let limit = self.limit as usize;
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        (rows, has_more)
    }
}
