//! Bounded listing-query builder.
//!
//! Builds the single SELECT statement behind a filtered listing: id
//! projection, optional link-table join, a mandatory parameterized scope
//! predicate, equality predicates, a validated filter expression, validated
//! ordering, and offset pagination. Table and column names are code-owned
//! and asserted; everything caller-controlled arrives pre-validated
//! ([`FilterExpr`], [`SortSpec`]) or as a parameter value.

use crate::dialect::Dialect;
use crate::grammar::FilterExpr;
use crate::page::Page;
use crate::types::{Operator, QueryResult, SortSpec, Value};
use crate::validate::{assert_valid_column_ref, assert_valid_sql_identifier};

/// Inner join against a linking table.
#[derive(Debug, Clone)]
struct Join {
    table: String,
    alias: String,
    left: String,
    right: String,
}

/// Listing query builder with dialect support.
#[derive(Debug)]
pub struct ListQuery<D: Dialect> {
    dialect: D,
    table: String,
    alias: String,
    id_column: String,
    join: Option<Join>,
    scope: Option<(String, Vec<Value>)>,
    predicates: Vec<(String, Operator, Value)>,
    filter: Option<FilterExpr>,
    sort: Option<SortSpec>,
    page: Option<Page>,
}

impl<D: Dialect> ListQuery<D> {
    /// Create a listing query over `table` aliased as `alias`, selecting
    /// `alias.id`.
    ///
    /// # Panics
    ///
    /// Panics if the table or alias is not a valid SQL identifier.
    pub fn new(dialect: D, table: impl Into<String>, alias: impl Into<String>) -> Self {
        let table = table.into();
        let alias = alias.into();
        assert_valid_sql_identifier(&table, "table");
        assert_valid_sql_identifier(&alias, "table alias");
        let id_column = format!("{alias}.id");
        Self {
            dialect,
            table,
            alias,
            id_column,
            join: None,
            scope: None,
            predicates: Vec::new(),
            filter: None,
            sort: None,
            page: None,
        }
    }

    /// Select a different id column.
    ///
    /// # Panics
    ///
    /// Panics if the reference is not a valid column reference.
    pub fn id_column(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        assert_valid_column_ref(&column, "id column");
        self.id_column = column;
        self
    }

    /// Add an inner join `JOIN table alias ON left = right`.
    ///
    /// # Panics
    ///
    /// Panics if any name is not a valid identifier/column reference.
    pub fn join(
        mut self,
        table: impl Into<String>,
        alias: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        let join = Join {
            table: table.into(),
            alias: alias.into(),
            left: left.into(),
            right: right.into(),
        };
        assert_valid_sql_identifier(&join.table, "join table");
        assert_valid_sql_identifier(&join.alias, "join alias");
        assert_valid_column_ref(&join.left, "join");
        assert_valid_column_ref(&join.right, "join");
        self.join = Some(join);
        self
    }

    /// Set the mandatory scope predicate: `column IN (…)`, parameterized.
    ///
    /// An empty value set renders as a never-matching condition rather
    /// than invalid SQL.
    ///
    /// # Panics
    ///
    /// Panics if the reference is not a valid column reference.
    pub fn scope_in(mut self, column: impl Into<String>, values: Vec<Value>) -> Self {
        let column = column.into();
        assert_valid_column_ref(&column, "scope column");
        self.scope = Some((column, values));
        self
    }

    /// Add an equality-style predicate with a parameterized value.
    ///
    /// # Panics
    ///
    /// Panics if the reference is not a valid column reference.
    pub fn filter(mut self, column: impl Into<String>, op: Operator, value: Value) -> Self {
        let column = column.into();
        assert_valid_column_ref(&column, "filter column");
        self.predicates.push((column, op, value));
        self
    }

    /// Attach a validated filter expression (wrapped in parentheses).
    pub fn filter_expr(mut self, expr: FilterExpr) -> Self {
        self.filter = Some(expr);
        self
    }

    /// Attach validated ordering.
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Attach a pagination window. Unbounded windows add no LIMIT clause.
    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    /// Build the SQL query and parameters.
    pub fn build(self) -> QueryResult {
        let mut sql = format!(
            "SELECT {} FROM {} {}",
            self.id_column, self.table, self.alias
        );
        let mut params = Vec::new();
        let mut idx = 1usize;

        if let Some(join) = &self.join {
            sql.push_str(&format!(
                " JOIN {} {} ON {} = {}",
                join.table, join.alias, join.left, join.right
            ));
        }

        let mut conditions = Vec::new();

        if let Some((column, values)) = &self.scope {
            if values.is_empty() {
                // Empty scope set matches nothing; `IN ()` would not parse
                conditions.push("1=0".to_string());
            } else {
                let placeholders: Vec<String> = (0..values.len())
                    .map(|i| self.dialect.param(idx + i))
                    .collect();
                conditions.push(format!("{} IN ({})", column, placeholders.join(", ")));
                params.extend(values.iter().cloned());
                idx += values.len();
            }
        }

        for (column, op, value) in &self.predicates {
            conditions.push(format!(
                "{} {} {}",
                column,
                op.as_sql(),
                self.dialect.param(idx)
            ));
            params.push(value.clone());
            idx += 1;
        }

        // Note: _next_idx intentionally unused - ORDER BY/LIMIT/OFFSET take no parameters
        if let Some(filter) = &self.filter {
            let (condition, filter_params, _next_idx) = filter.render(&self.dialect, idx);
            conditions.push(format!("({condition})"));
            params.extend(filter_params);
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        if let Some(sort) = &self.sort {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                sort.field(),
                sort.dir().as_sql()
            ));
        }

        if let Some(page) = &self.page
            && !page.is_unbounded()
        {
            sql.push_str(&format!(
                " LIMIT {} OFFSET {}",
                page.fetch_limit(),
                page.offset()
            ));
        }

        QueryResult { sql, params }
    }
}
