//! The two listing query shapes.
//!
//! Every listing is scoped to the actor's authorized entity set before any
//! caller-supplied restriction is applied. The filter string and sort pair
//! are validated here, so a rejected expression never reaches the store.

use crate::access::Actor;
use crate::category::CategoryType;
use crate::error::ApiError;
use crate::params::ListParams;
use taxa_sql::{Dialect, FilterExpr, ListQuery, Operator, Page, QueryResult, SortSpec, Value};

/// Sort fields a caller may order listings by.
const SORT_FIELDS: &[&str] = &["id", "label", "type", "entity"];

/// Category table and its alias in listing queries.
const TABLE: &str = "category";
const ALIAS: &str = "t";
/// Alias of the joined linking table in item-scoped listings.
const LINK_ALIAS: &str = "lk";

fn scope_values(actor: &Actor) -> Vec<Value> {
    actor.entities.iter().copied().map(Value::Int).collect()
}

fn sort_spec(params: &ListParams) -> Result<SortSpec, ApiError> {
    SortSpec::parse(&params.sort_field, &params.sort_order, SORT_FIELDS)
        .map_err(ApiError::invalid)
}

/// Build the plain listing query.
///
/// An unknown `type` label filters on an index not present in storage:
/// the listing simply matches nothing.
pub(crate) fn list_query<D: Dialect>(
    dialect: D,
    actor: &Actor,
    params: &ListParams,
) -> Result<(QueryResult, Page), ApiError> {
    let sort = sort_spec(params)?;
    let page = Page::new(params.limit, params.page);

    let mut query = ListQuery::new(dialect, TABLE, ALIAS)
        .scope_in("t.entity", scope_values(actor));

    if let Some(label) = &params.kind {
        let index = CategoryType::index_for_label(label);
        query = query.filter("t.type", Operator::Eq, Value::Int(index));
    }

    if let Some(filter) = &params.filter {
        query = query.filter_expr(FilterExpr::parse(filter)?);
    }

    Ok((query.sort(sort).page(page).build(), page))
}

/// Build the item-scoped listing query.
///
/// The type is mandatory: it selects the linking table and column joined
/// against, and pins the category type index.
pub(crate) fn item_query<D: Dialect>(
    dialect: D,
    actor: &Actor,
    params: &ListParams,
    kind: CategoryType,
    item_id: i64,
) -> Result<(QueryResult, Page), ApiError> {
    let sort = sort_spec(params)?;
    let page = Page::new(params.limit, params.page);
    let link = kind.link_target();

    let query = ListQuery::new(dialect, TABLE, ALIAS)
        .join(link.table, LINK_ALIAS, "t.id", format!("{LINK_ALIAS}.category_id"))
        .scope_in("t.entity", scope_values(actor))
        .filter("t.type", Operator::Eq, Value::Int(kind.index()))
        .filter(
            format!("{LINK_ALIAS}.{}", link.column),
            Operator::Eq,
            Value::Int(item_id),
        )
        .sort(sort)
        .page(page)
        .build();

    Ok((query, page))
}
