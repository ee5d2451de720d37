// =============================================================================
// CRATE-LEVEL QUALITY LINTS
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
#![allow(clippy::must_use_candidate)] // Not all returned values need must_use
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design

//! # taxa-api - Category resource over a relational store
//!
//! CRUD and filtered listing for a taxonomy node ("category") usable to tag
//! products, customers, suppliers, members, contacts, and accounts. The
//! interesting fragment is the listing protocol: a safelisted query
//! language (sort field, sort order, pagination, typed sub-selection,
//! filter expressions) translated into one bounded, injection-safe query by
//! [`taxa-sql`](taxa_sql), combined with per-record authorization applied
//! after retrieval.
//!
//! HTTP routing and the store itself stay outside: the host wires a
//! [`CategoryStore`] implementation in, routes decoded requests to
//! [`Categories`], and maps [`ApiError::status`] onto wire responses.
//!
//! ```
//! use taxa_api::prelude::*;
//! # use taxa_api::{Category, CategoryId, StoreError};
//! # use taxa_sql::QueryResult;
//! # struct NullStore;
//! # impl CategoryStore for NullStore {
//! #     fn fetch(&self, _: CategoryId) -> Result<Option<Category>, StoreError> { Ok(None) }
//! #     fn create(&self, _: &Category, _: &Actor) -> Result<CategoryId, StoreError> {
//! #         Ok(CategoryId(1))
//! #     }
//! #     fn update(&self, _: &Category, _: &Actor) -> Result<(), StoreError> { Ok(()) }
//! #     fn delete(&self, _: CategoryId, _: &Actor) -> Result<(), StoreError> { Ok(()) }
//! #     fn select_ids(&self, _: &QueryResult) -> Result<Vec<CategoryId>, StoreError> {
//! #         Ok(vec![])
//! #     }
//! # }
//! # let store = NullStore;
//! let actor = Actor::new("api_user", vec![1], Permissions::read_only());
//! let resource = Categories::new(&store, Postgres);
//!
//! let params = ListParams::default()
//!     .with_type("customer")
//!     .with_filter("(t.label:like:'VIP%')")
//!     .with_page(20, 0);
//!
//! match resource.list(&actor, &params) {
//!     Ok(categories) => { /* sanitized records */ },
//!     Err(err) => assert_eq!(err.status(), 404), // zero matches surface as NotFound
//! }
//! ```

mod access;
mod category;
mod error;
mod listing;
mod params;
mod resource;
mod sanitize;
mod store;

pub use access::{Actor, Permissions, Verb};
pub use category::{Category, CategoryId, CategoryType, LinkTarget};
pub use error::ApiError;
pub use params::ListParams;
pub use resource::{Ack, Categories, DeleteAck};
pub use sanitize::{INTERNAL_FIELDS, sanitize};
pub use store::{CategoryStore, StoreError};

// The query-building types a store implementation needs
pub use taxa_sql::{Dialect, Postgres, QueryResult, Sqlite, Value};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Actor, ApiError, Categories, Category, CategoryStore, CategoryType, ListParams,
        Permissions, Postgres, Sqlite, Verb,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
