//! Core types for the listing query builder.

use crate::validate::is_valid_column_ref;
use std::fmt;

/// Comparison operators accepted by the filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equal: `=`
    Eq,
    /// Not equal: `!=`
    Ne,
    /// Less than: `<`
    Lt,
    /// Less than or equal: `<=`
    Lte,
    /// Greater than: `>`
    Gt,
    /// Greater than or equal: `>=`
    Gte,
    /// Pattern match: `LIKE`
    Like,
}

impl Operator {
    /// Parse an operator token from a filter clause.
    ///
    /// Only the fixed operator set is accepted; `like` is matched
    /// case-insensitively, the symbolic operators verbatim.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Lte),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Gte),
            _ if token.eq_ignore_ascii_case("like") => Some(Self::Like),
            _ => None,
        }
    }

    /// The SQL rendering of this operator.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Like => "LIKE",
        }
    }
}

/// SQL parameter values.
///
/// Every caller-supplied literal travels through this type into the
/// parameter list; literals never appear in the SQL text itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit integer parameter.
    Int(i64),
    /// Floating point parameter.
    Float(f64),
    /// Text parameter.
    String(String),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    /// Ascending order (the default).
    Asc,
    /// Descending order.
    Desc,
}

impl SortDir {
    /// Parse a sort order token (`ASC`/`DESC`, case-insensitive).
    #[must_use]
    pub fn parse(order: &str) -> Option<Self> {
        if order.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if order.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    /// The SQL rendering of this direction.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl Default for SortDir {
    fn default() -> Self {
        Self::Asc
    }
}

/// A validated sort field with direction.
///
/// Construction goes through [`SortSpec::parse`], which checks the field
/// against an allow-set before it can ever reach an `ORDER BY` position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    field: String,
    dir: SortDir,
}

impl SortSpec {
    /// Parse and validate a sort field/order pair against an allow-set.
    ///
    /// The field may carry a single table-alias qualifier (`t.label`);
    /// the allow-set holds bare column names. An empty allow-set allows
    /// all syntactically valid column references.
    ///
    /// # Errors
    ///
    /// Returns a description of the rejected field or order suitable for
    /// an invalid-argument response.
    ///
    /// # Examples
    ///
    /// ```
    /// use taxa_sql::{SortDir, SortSpec};
    ///
    /// let sort = SortSpec::parse("t.label", "DESC", &["id", "label"]).unwrap();
    /// assert_eq!(sort.field(), "t.label");
    /// assert_eq!(sort.dir(), SortDir::Desc);
    ///
    /// assert!(SortSpec::parse("t.passwd", "ASC", &["id", "label"]).is_err());
    /// assert!(SortSpec::parse("label", "sideways", &[]).is_err());
    /// ```
    pub fn parse(field: &str, order: &str, allowed: &[&str]) -> Result<Self, String> {
        let field = field.trim();
        if !is_valid_column_ref(field) {
            return Err(format!("Sort field '{field}' is not a valid column reference"));
        }

        // Allow-set membership is checked on the bare column name
        let bare = field.split_once('.').map_or(field, |(_, col)| col);
        if !allowed.is_empty() && !allowed.contains(&bare) {
            return Err(format!(
                "Sort field '{field}' not allowed. Allowed: {allowed:?}"
            ));
        }

        let dir = SortDir::parse(order)
            .ok_or_else(|| format!("Sort order '{order}' must be ASC or DESC"))?;

        Ok(Self {
            field: field.to_string(),
            dir,
        })
    }

    /// The validated column reference.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The sort direction.
    #[must_use]
    pub fn dir(&self) -> SortDir {
        self.dir
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.dir.as_sql())
    }
}

/// Query result with SQL string and parameters.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "QueryResult must be used to execute the query"]
pub struct QueryResult {
    /// The SQL text with positional placeholders.
    pub sql: String,
    /// The parameters, in placeholder order.
    pub params: Vec<Value>,
}
