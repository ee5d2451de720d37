//! The category record, its fixed type enumeration, and the link-table
//! lookup for item-scoped listings.

use crate::error::ApiError;
use miniserde::json::{Number, Object, Value};
use std::fmt;

/// Opaque category identifier, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed category type enumeration.
///
/// Declaration order is the storage representation: listing by type filters
/// on the enumeration index, never the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryType {
    /// Product categories (index 0).
    Product,
    /// Supplier categories (index 1).
    Supplier,
    /// Customer categories (index 2).
    Customer,
    /// Member categories (index 3).
    Member,
    /// Contact categories (index 4).
    Contact,
    /// Account categories (index 5).
    Account,
}

/// Link table and foreign-key column for one category type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTarget {
    /// Linking table name.
    pub table: &'static str,
    /// Foreign-key column of the linked item.
    pub column: &'static str,
}

impl CategoryType {
    /// All types, in index order.
    pub const ALL: [Self; 6] = [
        Self::Product,
        Self::Supplier,
        Self::Customer,
        Self::Member,
        Self::Contact,
        Self::Account,
    ];

    /// Parse a type label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "product" => Some(Self::Product),
            "supplier" => Some(Self::Supplier),
            "customer" => Some(Self::Customer),
            "member" => Some(Self::Member),
            "contact" => Some(Self::Contact),
            "account" => Some(Self::Account),
            _ => None,
        }
    }

    /// The label of this type.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Supplier => "supplier",
            Self::Customer => "customer",
            Self::Member => "member",
            Self::Contact => "contact",
            Self::Account => "account",
        }
    }

    /// The enumeration index stored in the `type` column.
    #[must_use]
    pub fn index(self) -> i64 {
        match self {
            Self::Product => 0,
            Self::Supplier => 1,
            Self::Customer => 2,
            Self::Member => 3,
            Self::Contact => 4,
            Self::Account => 5,
        }
    }

    /// Resolve a type from its stored index.
    #[must_use]
    pub fn from_index(index: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.index() == index)
    }

    /// Resolve a label to a storage index for listing.
    ///
    /// Unknown labels yield `-1`, an index not present in storage, so a
    /// listing filtered on it matches nothing rather than failing.
    #[must_use]
    pub fn index_for_label(label: &str) -> i64 {
        Self::from_label(label).map_or(-1, Self::index)
    }

    /// The fixed linking table and column for items of this type.
    ///
    /// Resolved from the enumeration only, never from caller strings.
    #[must_use]
    pub fn link_target(self) -> LinkTarget {
        match self {
            Self::Customer | Self::Supplier => LinkTarget {
                table: "category_company",
                column: "company_id",
            },
            Self::Member => LinkTarget {
                table: "category_member",
                column: "member_id",
            },
            Self::Contact => LinkTarget {
                table: "category_contact",
                column: "contact_person_id",
            },
            Self::Product => LinkTarget {
                table: "category_product",
                column: "product_id",
            },
            Self::Account => LinkTarget {
                table: "category_account",
                column: "account_id",
            },
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A category record.
///
/// `label`, `kind`, and `entity` are the typed fields this layer cares
/// about; everything else supplied by callers is carried verbatim in
/// `attributes` and persisted as-is.
#[derive(Clone)]
pub struct Category {
    /// Store-assigned identifier; `None` until created.
    pub id: Option<CategoryId>,
    /// Human-readable name.
    pub label: String,
    /// Category type.
    pub kind: CategoryType,
    /// Tenant/scope identifier.
    pub entity: i64,
    /// Free-form pass-through attributes.
    pub attributes: Object,
}

impl Category {
    /// Build a fresh record from a create field map.
    ///
    /// `label` and `type` are mandatory ([`ApiError::MissingField`] naming
    /// the absent one; an empty label counts as missing). The `entity`
    /// field defaults to `default_entity` when not supplied. All other
    /// keys pass through into `attributes` untouched.
    pub fn from_fields(fields: &Object, default_entity: i64) -> Result<Self, ApiError> {
        let label = match fields.get("label") {
            None => {
                return Err(ApiError::MissingField {
                    field: "label".into(),
                });
            },
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) => {
                return Err(ApiError::MissingField {
                    field: "label".into(),
                });
            },
            Some(_) => return Err(ApiError::invalid("label must be a string")),
        };

        let kind = match fields.get("type") {
            None => {
                return Err(ApiError::MissingField {
                    field: "type".into(),
                });
            },
            Some(Value::String(s)) => CategoryType::from_label(s)
                .ok_or_else(|| ApiError::invalid(format!("unknown category type '{s}'")))?,
            Some(_) => return Err(ApiError::invalid("type must be a string")),
        };

        let entity = match fields.get("entity") {
            None => default_entity,
            Some(value) => as_i64(value).ok_or_else(|| ApiError::invalid("entity must be an integer"))?,
        };

        let mut category = Self {
            id: None,
            label,
            kind,
            entity,
            attributes: Object::new(),
        };
        for (key, value) in fields {
            if !matches!(key.as_str(), "id" | "label" | "type" | "entity") {
                category.attributes.insert(key.clone(), value.clone());
            }
        }
        Ok(category)
    }

    /// Overwrite fields from an update field map.
    ///
    /// Every supplied key except `id` replaces the current value; typed
    /// fields are type-checked, everything else lands in `attributes`.
    pub fn apply_fields(&mut self, fields: &Object) -> Result<(), ApiError> {
        for (key, value) in fields {
            match key.as_str() {
                // The identifier is immutable
                "id" => {},
                "label" => match value {
                    Value::String(s) => self.label = s.clone(),
                    _ => return Err(ApiError::invalid("label must be a string")),
                },
                "type" => match value {
                    Value::String(s) => {
                        self.kind = CategoryType::from_label(s).ok_or_else(|| {
                            ApiError::invalid(format!("unknown category type '{s}'"))
                        })?;
                    },
                    _ => return Err(ApiError::invalid("type must be a string")),
                },
                "entity" => {
                    self.entity = as_i64(value)
                        .ok_or_else(|| ApiError::invalid("entity must be an integer"))?;
                },
                _ => {
                    self.attributes.insert(key.clone(), value.clone());
                },
            }
        }
        Ok(())
    }

    /// Render the record as a JSON object (typed fields win over any
    /// attribute of the same name).
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut obj = self.attributes.clone();
        if let Some(id) = self.id {
            obj.insert("id".into(), Value::Number(Number::I64(id.0)));
        }
        obj.insert("label".into(), Value::String(self.label.clone()));
        obj.insert("type".into(), Value::String(self.kind.label().into()));
        obj.insert("entity".into(), Value::Number(Number::I64(self.entity)));
        Value::Object(obj)
    }
}

// miniserde values carry no Debug impl; render attributes as JSON instead
impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Category")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("entity", &self.entity)
            .field(
                "attributes",
                &miniserde::json::to_string(&Value::Object(self.attributes.clone())),
            )
            .finish()
    }
}

/// Integer extraction across miniserde's number representations.
fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(Number::I64(n)) => Some(*n),
        Value::Number(Number::U64(n)) => i64::try_from(*n).ok(),
        _ => None,
    }
}
