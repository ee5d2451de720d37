//! Outbound record sanitization.

use crate::category::Category;
use miniserde::json::Object;

/// Attribute keys that never cross the trust boundary to a caller:
/// computed caches and credential-adjacent import material.
pub const INTERNAL_FIELDS: &[&str] = &["child_ids", "visibility_cache", "import_key"];

/// Strip internal-only attributes from an outbound copy of a record.
///
/// Side-effect-free and idempotent; the persisted record is never mutated,
/// only the copy handed back to the caller.
#[must_use]
pub fn sanitize(category: &Category) -> Category {
    let mut attributes = Object::new();
    for (key, value) in &category.attributes {
        if !INTERNAL_FIELDS.contains(&key.as_str()) {
            attributes.insert(key.clone(), value.clone());
        }
    }
    Category {
        attributes,
        ..category.clone()
    }
}
