//! The relational store as an external collaborator.
//!
//! Persistence of the entity's fields is out of scope here; the resource
//! handler drives whatever backend the host wires in through this trait.
//! Each method maps to a single statement; no transactions, retries, or
//! caching are layered on top.

use crate::access::Actor;
use crate::category::{Category, CategoryId};
use std::fmt;
use taxa_sql::QueryResult;

/// Opaque store failure, carrying the backend's own message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    message: String,
}

impl StoreError {
    /// Wrap a backend message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StoreError {}

/// The backing store contract for category records.
pub trait CategoryStore {
    /// Fetch a record by id; `Ok(None)` when absent.
    fn fetch(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// Persist a fresh record, stamped with the acting caller.
    /// Returns the assigned id.
    fn create(&self, category: &Category, actor: &Actor) -> Result<CategoryId, StoreError>;

    /// Persist a field overwrite of an existing record.
    fn update(&self, category: &Category, actor: &Actor) -> Result<(), StoreError>;

    /// Delete a record. Linking-table cleanup is the store's concern.
    fn delete(&self, id: CategoryId, actor: &Actor) -> Result<(), StoreError>;

    /// Execute a listing query and return the selected id column.
    fn select_ids(&self, query: &QueryResult) -> Result<Vec<CategoryId>, StoreError>;
}
