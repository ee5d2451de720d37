// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::format_push_string)] // String building style preference
#![allow(clippy::cast_possible_truncation)] // Intentional in SQL context
// Internal parser/builder code where bounds are checked before use
#![allow(clippy::indexing_slicing)] // Bounds checked before indexing in scanner logic

//! # taxa-sql - Bounded listing queries with a safelisted filter grammar
//!
//! A small query-building crate for filtered listing endpoints: a strict
//! `(column:operator:literal)` filter grammar, allow-set-validated sorting,
//! offset pagination with the fetch-one-extra convention, and a SELECT
//! builder that only ever emits caller input as bound parameters.
//!
//! ## Quick Start
//!
//! ```
//! use taxa_sql::prelude::*;
//!
//! let filter = FilterExpr::parse("(t.label:like:'VIP%')").unwrap();
//! let sort = SortSpec::parse("t.label", "ASC", &["id", "label", "type"]).unwrap();
//!
//! let result = ListQuery::new(Postgres, "category", "t")
//!     .scope_in("t.entity", vec![Value::Int(1)])
//!     .filter("t.type", Operator::Eq, Value::Int(2))
//!     .filter_expr(filter)
//!     .sort(sort)
//!     .page(Page::new(20, 0))
//!     .build();
//!
//! assert_eq!(
//!     result.sql,
//!     "SELECT t.id FROM category t WHERE t.entity IN ($1) AND t.type = $2 \
//!      AND (t.label LIKE $3) ORDER BY t.label ASC LIMIT 21 OFFSET 0"
//! );
//! assert_eq!(result.params.len(), 3);
//! ```
//!
//! ## Filter Grammar
//!
//! | Element | Form | Notes |
//! |---------|------|-------|
//! | clause | `(column:operator:literal)` | column may carry one alias qualifier |
//! | connector | `and` / `or` | case-insensitive |
//! | operator | `=` `!=` `<` `>` `<=` `>=` `like` | fixed set, nothing else |
//! | literal | `'text'` or bare numeric | `\(` `\)` `\:` `\'` `\\` escapes in text |
//!
//! Anything outside the grammar fails with [`FilterError`] before a query
//! is built; literal text only ever reaches the bound-parameter list.

mod dialect;
mod grammar;
mod page;
mod select;
mod types;
mod validate;

pub use dialect::{Dialect, Postgres, Sqlite};
pub use grammar::{Clause, Connector, FilterError, FilterExpr};
pub use page::Page;
pub use select::ListQuery;
pub use types::{Operator, QueryResult, SortDir, SortSpec, Value};
pub use validate::{
    assert_valid_column_ref, assert_valid_sql_identifier, is_valid_column_ref,
    is_valid_sql_identifier,
};

/// Prelude module for convenient imports.
///
/// ```
/// use taxa_sql::prelude::*;
///
/// let result = ListQuery::new(Sqlite, "category", "t").build();
/// assert_eq!(result.sql, "SELECT t.id FROM category t");
/// ```
pub mod prelude {
    pub use crate::{
        Clause, Connector, Dialect, FilterError, FilterExpr, ListQuery, Operator, Page, Postgres,
        QueryResult, SortDir, SortSpec, Sqlite, Value,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
