//! Per-call access control.
//!
//! Every operation receives an explicit [`Actor`] capability object; there
//! is no ambient caller state. Two checks run in a fixed order: the coarse
//! verb permission first (cheap, rejects before any I/O), then, for
//! single-record operations once the record is known to exist, the
//! record-level scope check.

use crate::category::Category;
use crate::error::ApiError;

/// The four operation verbs covered by coarse permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Read a record or run a listing.
    Read,
    /// Create a record.
    Create,
    /// Update a record.
    Update,
    /// Delete a record.
    Delete,
}

/// Coarse per-verb permissions on the category capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    /// May read and list.
    pub read: bool,
    /// May create.
    pub create: bool,
    /// May update.
    pub update: bool,
    /// May delete.
    pub delete: bool,
}

impl Permissions {
    /// All four verbs granted.
    #[must_use]
    pub fn all() -> Self {
        Self {
            read: true,
            create: true,
            update: true,
            delete: true,
        }
    }

    /// Read-only access.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Self::default()
        }
    }

    fn allows(self, verb: Verb) -> bool {
        match verb {
            Verb::Read => self.read,
            Verb::Create => self.create,
            Verb::Update => self.update,
            Verb::Delete => self.delete,
        }
    }
}

/// The acting caller: identity, authorized entity set, and permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Login naming this caller in record-level denials and audit logs.
    pub login: String,
    /// Entity (tenant) identifiers this caller may see.
    pub entities: Vec<i64>,
    /// Coarse verb permissions.
    pub permissions: Permissions,
}

impl Actor {
    /// Create an actor.
    pub fn new(login: impl Into<String>, entities: Vec<i64>, permissions: Permissions) -> Self {
        Self {
            login: login.into(),
            entities,
            permissions,
        }
    }

    /// Coarse permission check for a verb.
    ///
    /// Fails with an [`ApiError::Unauthorized`] carrying no detail.
    pub fn require(&self, verb: Verb) -> Result<(), ApiError> {
        if self.permissions.allows(verb) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized { login: None })
        }
    }

    /// Record-level scope check, run after the record is known to exist.
    ///
    /// Fails with an [`ApiError::Unauthorized`] naming this login.
    pub fn check_record(&self, category: &Category) -> Result<(), ApiError> {
        if self.entities.contains(&category.entity) {
            Ok(())
        } else {
            log::warn!(
                "record access denied: login={} category entity={}",
                self.login,
                category.entity
            );
            Err(ApiError::Unauthorized {
                login: Some(self.login.clone()),
            })
        }
    }

    /// The entity new records are stamped with when none is supplied.
    #[must_use]
    pub fn primary_entity(&self) -> Option<i64> {
        self.entities.first().copied()
    }
}
