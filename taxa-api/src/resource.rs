//! The category resource handler: four CRUD verbs and two listing variants.
//!
//! Check order is fixed for every operation: coarse verb permission first,
//! then (for single-record operations) existence, then the record-level
//! scope check, and only then the store work. Outbound records always pass
//! through the sanitizer.

use crate::access::{Actor, Verb};
use crate::category::{Category, CategoryId, CategoryType};
use crate::error::ApiError;
use crate::listing;
use crate::params::ListParams;
use crate::sanitize::sanitize;
use crate::store::CategoryStore;
use miniserde::Serialize;
use miniserde::json::Object;
use taxa_sql::Dialect;

/// Structured acknowledgment returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteAck {
    /// The success body.
    pub success: Ack,
}

/// Body of a [`DeleteAck`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    /// Status code echoed in the body.
    pub code: u16,
    /// Human-readable confirmation.
    pub message: String,
}

impl DeleteAck {
    fn category_deleted() -> Self {
        Self {
            success: Ack {
                code: 200,
                message: "Category deleted".into(),
            },
        }
    }
}

/// The category resource over a backing store.
#[derive(Debug)]
pub struct Categories<'s, D: Dialect, S: CategoryStore> {
    store: &'s S,
    dialect: D,
}

impl<'s, D: Dialect, S: CategoryStore> Categories<'s, D, S> {
    /// Wrap a store, building queries for the given dialect.
    pub fn new(store: &'s S, dialect: D) -> Self {
        Self { store, dialect }
    }

    /// Fetch one category by id.
    pub fn get(&self, actor: &Actor, id: CategoryId) -> Result<Category, ApiError> {
        actor.require(Verb::Read)?;
        let category = self
            .store
            .fetch(id)?
            .ok_or_else(|| ApiError::not_found("category not found"))?;
        actor.check_record(&category)?;
        Ok(sanitize(&category))
    }

    /// List categories visible to the actor.
    ///
    /// Zero matches surface as `NotFound`, not an empty sequence; callers
    /// relying on "empty list means no matches" must account for this.
    pub fn list(&self, actor: &Actor, params: &ListParams) -> Result<Vec<Category>, ApiError> {
        actor.require(Verb::Read)?;
        let (query, page) = listing::list_query(self.dialect, actor, params)?;
        let ids = self.store.select_ids(&query)?;
        let (ids, has_more) = page.split(ids);
        log::debug!("category listing matched {} id(s), has_more={has_more}", ids.len());
        self.hydrate(ids)
    }

    /// List categories of one type linked to a given item.
    pub fn list_for_item(
        &self,
        actor: &Actor,
        params: &ListParams,
        kind: CategoryType,
        item_id: i64,
    ) -> Result<Vec<Category>, ApiError> {
        actor.require(Verb::Read)?;
        let (query, page) = listing::item_query(self.dialect, actor, params, kind, item_id)?;
        let ids = self.store.select_ids(&query)?;
        let (ids, _) = page.split(ids);
        self.hydrate(ids)
    }

    /// Create a category from a field map. Returns the assigned id.
    pub fn create(&self, actor: &Actor, fields: &Object) -> Result<CategoryId, ApiError> {
        actor.require(Verb::Create)?;
        let default_entity = actor
            .primary_entity()
            .ok_or_else(|| ApiError::invalid("actor has no authorized entity"))?;
        let category = Category::from_fields(fields, default_entity)?;
        let id = self.store.create(&category, actor).map_err(|err| {
            ApiError::Persistence {
                detail: format!("error when creating category: {err}"),
            }
        })?;
        log::info!("category {id} created by {}", actor.login);
        Ok(id)
    }

    /// Overwrite fields of an existing category and return the fresh,
    /// sanitized record.
    pub fn update(
        &self,
        actor: &Actor,
        id: CategoryId,
        fields: &Object,
    ) -> Result<Category, ApiError> {
        actor.require(Verb::Update)?;
        let mut category = self
            .store
            .fetch(id)?
            .ok_or_else(|| ApiError::not_found("category not found"))?;
        actor.check_record(&category)?;

        category.apply_fields(fields)?;
        self.store.update(&category, actor).map_err(|err| {
            ApiError::Persistence {
                detail: format!("error when updating category: {err}"),
            }
        })?;

        let fresh = self
            .store
            .fetch(id)?
            .ok_or_else(|| ApiError::not_found("category not found"))?;
        Ok(sanitize(&fresh))
    }

    /// Delete a category. The store cascades linking-table cleanup.
    pub fn delete(&self, actor: &Actor, id: CategoryId) -> Result<DeleteAck, ApiError> {
        actor.require(Verb::Delete)?;
        let category = self
            .store
            .fetch(id)?
            .ok_or_else(|| ApiError::not_found("category not found"))?;
        actor.check_record(&category)?;

        self.store.delete(id, actor).map_err(|err| {
            log::warn!("store refused delete of category {id}: {err}");
            ApiError::Persistence {
                detail: format!("error when deleting category: {err}"),
            }
        })?;
        log::info!("category {id} deleted by {}", actor.login);
        Ok(DeleteAck::category_deleted())
    }

    /// Hydrate listed ids into sanitized records.
    ///
    /// Ids that vanished between the listing and the fetch are skipped,
    /// not errors.
    fn hydrate(&self, ids: Vec<CategoryId>) -> Result<Vec<Category>, ApiError> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(category) = self.store.fetch(id)? {
                records.push(sanitize(&category));
            }
        }
        if records.is_empty() {
            return Err(ApiError::not_found("no category found"));
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Permissions;
    use crate::store::StoreError;
    use miniserde::json::{self, Value};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use taxa_sql::{QueryResult, Sqlite};

    /// Canned in-memory store: `select_ids` returns a fixed id sequence
    /// (SQL execution itself is covered by the rusqlite integration tests).
    #[derive(Default)]
    struct MemStore {
        records: RefCell<HashMap<i64, Category>>,
        next_id: Cell<i64>,
        listed: RefCell<Vec<CategoryId>>,
        refuse_writes: bool,
    }

    impl MemStore {
        fn seeded(categories: Vec<Category>) -> Self {
            let store = Self {
                next_id: Cell::new(1),
                ..Self::default()
            };
            for category in categories {
                let id = store.next_id.get();
                store.next_id.set(id + 1);
                let mut category = category;
                category.id = Some(CategoryId(id));
                store.records.borrow_mut().insert(id, category);
            }
            store
        }

        fn list_all(&self) {
            let mut ids: Vec<_> = self.records.borrow().keys().copied().collect();
            ids.sort_unstable();
            *self.listed.borrow_mut() = ids.into_iter().map(CategoryId).collect();
        }
    }

    impl CategoryStore for MemStore {
        fn fetch(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
            Ok(self.records.borrow().get(&id.0).cloned())
        }

        fn create(&self, category: &Category, _actor: &Actor) -> Result<CategoryId, StoreError> {
            if self.refuse_writes {
                return Err(StoreError::new("write refused"));
            }
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            let mut stored = category.clone();
            stored.id = Some(CategoryId(id));
            self.records.borrow_mut().insert(id, stored);
            Ok(CategoryId(id))
        }

        fn update(&self, category: &Category, _actor: &Actor) -> Result<(), StoreError> {
            if self.refuse_writes {
                return Err(StoreError::new("write refused"));
            }
            let id = category.id.ok_or_else(|| StoreError::new("no id"))?;
            self.records.borrow_mut().insert(id.0, category.clone());
            Ok(())
        }

        fn delete(&self, id: CategoryId, _actor: &Actor) -> Result<(), StoreError> {
            if self.refuse_writes {
                return Err(StoreError::new("write refused"));
            }
            self.records.borrow_mut().remove(&id.0);
            Ok(())
        }

        fn select_ids(&self, _query: &QueryResult) -> Result<Vec<CategoryId>, StoreError> {
            Ok(self.listed.borrow().clone())
        }
    }

    fn actor() -> Actor {
        Actor::new("api_user", vec![1], Permissions::all())
    }

    fn fields(raw: &str) -> Object {
        match json::from_str::<Value>(raw).expect("valid test JSON") {
            Value::Object(obj) => obj,
            _ => panic!("test JSON must be an object"),
        }
    }

    fn vip(entity: i64) -> Category {
        Category::from_fields(&fields(r#"{"label":"VIP","type":"customer"}"#), entity)
            .expect("valid record")
    }

    #[test]
    fn test_get_sanitizes_outbound_record() {
        let store = MemStore::seeded(vec![{
            let mut c = vip(1);
            c.attributes
                .insert("import_key".into(), Value::String("x".into()));
            c
        }]);
        let resource = Categories::new(&store, Sqlite);

        let category = resource.get(&actor(), CategoryId(1)).unwrap();
        assert_eq!(category.label, "VIP");
        assert!(category.attributes.get("import_key").is_none());
        // The stored record keeps its internal field
        assert!(
            store.records.borrow()[&1].attributes.get("import_key").is_some()
        );
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = MemStore::seeded(vec![]);
        let resource = Categories::new(&store, Sqlite);
        let err = resource.get(&actor(), CategoryId(9)).unwrap_err();
        assert_eq!(err, ApiError::not_found("category not found"));
    }

    #[test]
    fn test_get_checks_coarse_permission_before_store() {
        let store = MemStore::seeded(vec![vip(1)]);
        let resource = Categories::new(&store, Sqlite);
        let no_read = Actor::new("u", vec![1], Permissions::default());
        assert_eq!(
            resource.get(&no_read, CategoryId(1)).unwrap_err(),
            ApiError::Unauthorized { login: None }
        );
    }

    #[test]
    fn test_get_record_check_names_login() {
        let store = MemStore::seeded(vec![vip(2)]);
        let resource = Categories::new(&store, Sqlite);
        let err = resource.get(&actor(), CategoryId(1)).unwrap_err();
        assert_eq!(
            err,
            ApiError::Unauthorized {
                login: Some("api_user".into())
            }
        );
    }

    #[test]
    fn test_list_empty_is_not_found() {
        let store = MemStore::seeded(vec![]);
        store.list_all();
        let resource = Categories::new(&store, Sqlite);
        let err = resource.list(&actor(), &ListParams::default()).unwrap_err();
        assert_eq!(err, ApiError::not_found("no category found"));
    }

    #[test]
    fn test_list_skips_vanished_ids() {
        let store = MemStore::seeded(vec![vip(1)]);
        *store.listed.borrow_mut() = vec![CategoryId(1), CategoryId(99)];
        let resource = Categories::new(&store, Sqlite);
        let records = resource.list(&actor(), &ListParams::default()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_list_truncates_to_limit() {
        let store = MemStore::seeded(vec![vip(1), vip(1), vip(1)]);
        store.list_all();
        let resource = Categories::new(&store, Sqlite);
        let params = ListParams::default().with_page(2, 0);
        let records = resource.list(&actor(), &params).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_create_returns_store_assigned_id() {
        let store = MemStore::seeded(vec![]);
        let resource = Categories::new(&store, Sqlite);
        let id = resource
            .create(&actor(), &fields(r#"{"label":"VIP","type":"customer"}"#))
            .unwrap();
        assert_eq!(id, CategoryId(1));
        // Stamped with the actor's primary entity
        assert_eq!(store.records.borrow()[&1].entity, 1);
    }

    #[test]
    fn test_create_missing_field_names_it() {
        let store = MemStore::seeded(vec![]);
        let resource = Categories::new(&store, Sqlite);
        let err = resource
            .create(&actor(), &fields(r#"{"type":"customer"}"#))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::MissingField {
                field: "label".into()
            }
        );
    }

    #[test]
    fn test_create_store_failure_is_persistence() {
        let store = MemStore {
            refuse_writes: true,
            next_id: Cell::new(1),
            ..MemStore::default()
        };
        let resource = Categories::new(&store, Sqlite);
        let err = resource
            .create(&actor(), &fields(r#"{"label":"VIP","type":"customer"}"#))
            .unwrap_err();
        assert_eq!(err.status(), 503);
        assert!(err.to_string().contains("write refused"));
    }

    #[test]
    fn test_update_overwrites_and_returns_fresh_record() {
        let store = MemStore::seeded(vec![vip(1)]);
        let resource = Categories::new(&store, Sqlite);

        let updated = resource
            .update(
                &actor(),
                CategoryId(1),
                &fields(r#"{"label":"Gold","color":"gold"}"#),
            )
            .unwrap();

        assert_eq!(updated.label, "Gold");
        assert_eq!(updated.kind, CategoryType::Customer);
        assert!(matches!(
            updated.attributes.get("color"),
            Some(Value::String(s)) if s == "gold"
        ));
    }

    #[test]
    fn test_update_is_idempotent() {
        let store = MemStore::seeded(vec![vip(1)]);
        let resource = Categories::new(&store, Sqlite);
        let body = fields(r#"{"label":"Gold","note":"n"}"#);

        let first = resource.update(&actor(), CategoryId(1), &body).unwrap();
        let second = resource.update(&actor(), CategoryId(1), &body).unwrap();

        assert_eq!(first.label, second.label);
        assert_eq!(
            miniserde::json::to_string(&first.to_json()),
            miniserde::json::to_string(&second.to_json())
        );
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = MemStore::seeded(vec![]);
        let resource = Categories::new(&store, Sqlite);
        let err = resource
            .update(&actor(), CategoryId(5), &fields(r#"{"label":"x"}"#))
            .unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_delete_returns_structured_ack() {
        let store = MemStore::seeded(vec![vip(1)]);
        let resource = Categories::new(&store, Sqlite);
        let ack = resource.delete(&actor(), CategoryId(1)).unwrap();
        assert_eq!(
            miniserde::json::to_string(&ack),
            r#"{"success":{"code":200,"message":"Category deleted"}}"#
        );
        assert!(store.records.borrow().is_empty());
    }

    #[test]
    fn test_delete_missing_is_not_found_not_unauthorized() {
        let store = MemStore::seeded(vec![]);
        let resource = Categories::new(&store, Sqlite);
        let err = resource.delete(&actor(), CategoryId(9)).unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_delete_store_refusal_is_persistence() {
        let store = MemStore::seeded(vec![vip(1)]);
        let store = MemStore {
            refuse_writes: true,
            records: store.records,
            next_id: store.next_id,
            listed: store.listed,
        };
        let resource = Categories::new(&store, Sqlite);
        let err = resource.delete(&actor(), CategoryId(1)).unwrap_err();
        assert_eq!(err.status(), 503);
    }
}
