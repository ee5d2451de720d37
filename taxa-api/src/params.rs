//! Listing parameters as they arrive on the REST surface.

use crate::error::ApiError;

/// Parameters of the two listing operations.
///
/// Defaults mirror the wire defaults: sort by `t.id` ascending, unbounded
/// (`limit = 0`), first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Sort field (validated against an allow-set when the query is built).
    pub sort_field: String,
    /// Sort order (`ASC`/`DESC`).
    pub sort_order: String,
    /// Page size; `0` means all matching rows.
    pub limit: u32,
    /// Zero-based page number; negative values are later coerced to 0.
    pub page: i64,
    /// Optional category type label.
    pub kind: Option<String>,
    /// Optional filter expression (`sqlfilters`).
    pub filter: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            sort_field: "t.id".into(),
            sort_order: "ASC".into(),
            limit: 0,
            page: 0,
            kind: None,
            filter: None,
        }
    }
}

impl ListParams {
    /// Parse listing parameters from decoded query-string pairs.
    ///
    /// Recognized keys: `sortfield`, `sortorder`, `limit`, `page`, `type`,
    /// `sqlfilters`. Unrecognized keys are ignored; the REST surface
    /// carries unrelated parameters too. Malformed numerics are rejected.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Result<Self, ApiError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key {
                "sortfield" => params.sort_field = value.to_string(),
                "sortorder" => params.sort_order = value.to_string(),
                "limit" => {
                    params.limit = value
                        .parse()
                        .map_err(|_| ApiError::invalid(format!("invalid limit '{value}'")))?;
                },
                "page" => {
                    params.page = value
                        .parse()
                        .map_err(|_| ApiError::invalid(format!("invalid page '{value}'")))?;
                },
                "type" => params.kind = Some(value.to_string()),
                "sqlfilters" => params.filter = Some(value.to_string()),
                _ => {},
            }
        }
        Ok(params)
    }

    /// Set sort field and order.
    #[must_use]
    pub fn with_sort(mut self, field: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort_field = field.into();
        self.sort_order = order.into();
        self
    }

    /// Set the pagination window.
    #[must_use]
    pub fn with_page(mut self, limit: u32, page: i64) -> Self {
        self.limit = limit;
        self.page = page;
        self
    }

    /// Restrict to one category type label.
    #[must_use]
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Attach a filter expression.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}
