//! Filter-expression grammar: parsing *is* validation.
//!
//! Listing endpoints accept a free-form filter string built from clauses of
//! the shape `(column:operator:literal)` joined by `and`/`or`:
//!
//! ```text
//! (t.label:like:'VIP%') and (t.type:=:2)
//! ```
//!
//! The string is attacker-controlled text headed for a SQL-backed store, so
//! nothing outside the grammar survives parsing. Column references must be
//! plain identifiers (optionally alias-qualified), operators come from a
//! fixed set, and literals are detached into the parameter list: no byte
//! of the input is ever placed in a SQL syntax position.
//!
//! Inside a quoted literal, `\(` `\)` `\:` `\'` `\\` are the only way to
//! carry those characters; an unescaped parenthesis or colon is an error,
//! not data.
//!
//! # Example
//!
//! ```
//! use taxa_sql::FilterExpr;
//!
//! let filter = FilterExpr::parse("(t.label:like:'VIP%') and (t.type:=:2)").unwrap();
//! assert_eq!(filter.len(), 2);
//!
//! // Missing colon separators: rejected before any query is built
//! assert!(FilterExpr::parse("(t.label like 'VIP%')").is_err());
//! ```

use crate::dialect::Dialect;
use crate::types::{Operator, Value};
use crate::validate::is_valid_column_ref;
use std::fmt;

/// Maximum number of clauses in one filter expression (DoS defense-in-depth).
const MAX_FILTER_CLAUSES: usize = 32;

/// Maximum byte length of a single literal.
const MAX_LITERAL_LENGTH: usize = 256;

/// Boolean connector between clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// Both clauses must match: `AND`
    And,
    /// Either clause may match: `OR`
    Or,
}

impl Connector {
    /// Parse a connector keyword (case-insensitive).
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }

    /// The SQL rendering of this connector.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// One validated filter clause: column, operator, parameter value.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Validated column reference (`label` or `t.label`).
    pub column: String,
    /// Operator from the fixed set.
    pub op: Operator,
    /// Literal, detached into the parameter list.
    pub value: Value,
}

/// A validated filter expression: one or more clauses with connectors.
///
/// The only constructor is [`FilterExpr::parse`]; holding a value of this
/// type means the input passed the grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr {
    // The first connector is `And` by convention and never rendered.
    terms: Vec<(Connector, Clause)>,
}

impl FilterExpr {
    /// Parse a filter string against the grammar.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] for any input outside the grammar; no query
    /// is built from a string that fails here.
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        let mut parser = Parser::new(input);
        parser.skip_ws();
        if parser.at_end() {
            return Err(FilterError::Empty);
        }

        let mut terms = vec![(Connector::And, parser.clause()?)];
        loop {
            parser.skip_ws();
            if parser.at_end() {
                break;
            }
            let word = parser.word();
            if word.is_empty() {
                return Err(FilterError::TrailingInput(parser.rest()));
            }
            let connector =
                Connector::parse(&word).ok_or(FilterError::UnknownConnector(word))?;
            parser.skip_ws();
            if terms.len() == MAX_FILTER_CLAUSES {
                return Err(FilterError::TooManyClauses {
                    max: MAX_FILTER_CLAUSES,
                });
            }
            terms.push((connector, parser.clause()?));
        }

        Ok(Self { terms })
    }

    /// Number of clauses in the expression.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the expression has no clauses (never true for parsed input).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Render to a SQL condition and its parameters.
    ///
    /// Placeholders start at `start_idx`; returns the condition text, the
    /// parameters in placeholder order, and the next free index.
    pub(crate) fn render<D: Dialect>(
        &self,
        dialect: &D,
        start_idx: usize,
    ) -> (String, Vec<Value>, usize) {
        let mut sql = String::new();
        let mut params = Vec::with_capacity(self.terms.len());
        let mut idx = start_idx;

        for (i, (connector, clause)) in self.terms.iter().enumerate() {
            if i > 0 {
                sql.push(' ');
                sql.push_str(connector.as_sql());
                sql.push(' ');
            }
            sql.push_str(&clause.column);
            sql.push(' ');
            sql.push_str(clause.op.as_sql());
            sql.push(' ');
            sql.push_str(&dialect.param(idx));
            params.push(clause.value.clone());
            idx += 1;
        }

        (sql, params, idx)
    }
}

/// Reasons a filter string is rejected.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FilterError {
    /// The input contained no clause at all.
    Empty,
    /// Expected an opening `(` starting a clause.
    ExpectedClause,
    /// A clause is missing one of its two `:` separators.
    MissingSeparator,
    /// A clause was not closed before the input ended.
    UnbalancedParenthesis,
    /// The column part is not a valid (optionally qualified) identifier.
    InvalidColumn(String),
    /// The operator is outside the fixed set.
    UnknownOperator(String),
    /// The word between clauses is not `and`/`or`.
    UnknownConnector(String),
    /// Input remained after the last clause.
    TrailingInput(String),
    /// The literal is neither a quoted string nor a numeric token.
    InvalidLiteral(String),
    /// A parenthesis or colon appeared unescaped inside a literal.
    UnescapedDelimiter(char),
    /// A backslash escape other than `\(` `\)` `\:` `\'` `\\`.
    UnknownEscape(char),
    /// A quoted literal was not closed.
    UnterminatedLiteral,
    /// Too many clauses in one expression.
    TooManyClauses {
        /// The clause count limit.
        max: usize,
    },
    /// A literal exceeded the length limit.
    LiteralTooLong {
        /// The literal byte-length limit.
        max: usize,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "filter expression is empty"),
            Self::ExpectedClause => write!(f, "expected a clause of the form (column:operator:literal)"),
            Self::MissingSeparator => write!(f, "clause is missing a ':' separator"),
            Self::UnbalancedParenthesis => write!(f, "clause is missing its closing parenthesis"),
            Self::InvalidColumn(col) => write!(f, "'{col}' is not a valid filter column"),
            Self::UnknownOperator(op) => write!(f, "unknown filter operator '{op}'"),
            Self::UnknownConnector(word) => {
                write!(f, "expected 'and' or 'or' between clauses, found '{word}'")
            },
            Self::TrailingInput(rest) => write!(f, "unexpected input after clause: '{rest}'"),
            Self::InvalidLiteral(lit) => write!(f, "invalid filter literal '{lit}'"),
            Self::UnescapedDelimiter(ch) => {
                write!(f, "unescaped '{ch}' inside a filter literal")
            },
            Self::UnknownEscape(ch) => write!(f, "unknown escape sequence '\\{ch}' in literal"),
            Self::UnterminatedLiteral => write!(f, "quoted literal is not terminated"),
            Self::TooManyClauses { max } => {
                write!(f, "filter expression exceeds {max} clauses")
            },
            Self::LiteralTooLong { max } => write!(f, "filter literal exceeds {max} bytes"),
        }
    }
}

impl std::error::Error for FilterError {}

/// Hand-rolled scanner over the filter string.
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Read a run of ASCII alphanumerics (connector keywords).
    fn word(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Remaining input, for error reporting.
    fn rest(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    /// Parse one `(column:operator:literal)` clause.
    fn clause(&mut self) -> Result<Clause, FilterError> {
        if self.bump() != Some('(') {
            return Err(FilterError::ExpectedClause);
        }

        let column = self.section()?;
        let column = column.trim();
        if !is_valid_column_ref(column) {
            return Err(FilterError::InvalidColumn(column.to_string()));
        }

        let op_token = self.section()?;
        let op = Operator::parse(op_token.trim())
            .ok_or_else(|| FilterError::UnknownOperator(op_token.trim().to_string()))?;

        let value = self.literal()?;

        Ok(Clause {
            column: column.to_string(),
            op,
            value,
        })
    }

    /// Read a column or operator section, up to its ':' separator.
    fn section(&mut self) -> Result<String, FilterError> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(':') => {
                    let token = self.chars[start..self.pos].iter().collect();
                    self.pos += 1;
                    return Ok(token);
                },
                // A quote, paren, or clause end before the separator means
                // the clause is not colon-delimited
                Some('(' | ')' | '\'') => return Err(FilterError::MissingSeparator),
                Some(_) => self.pos += 1,
                None => return Err(FilterError::UnbalancedParenthesis),
            }
        }
    }

    /// Parse the literal part and the closing parenthesis.
    fn literal(&mut self) -> Result<Value, FilterError> {
        self.skip_ws();
        if self.peek() == Some('\'') {
            self.pos += 1;
            let text = self.quoted()?;
            self.skip_ws();
            match self.bump() {
                Some(')') => Ok(Value::String(text)),
                Some(_) => Err(FilterError::InvalidLiteral(self.rest())),
                None => Err(FilterError::UnbalancedParenthesis),
            }
        } else {
            self.bare()
        }
    }

    /// Body of a quoted literal, applying backslash escapes.
    fn quoted(&mut self) -> Result<String, FilterError> {
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(c @ ('(' | ')' | ':' | '\'' | '\\')) => text.push(c),
                    Some(c) => return Err(FilterError::UnknownEscape(c)),
                    None => return Err(FilterError::UnterminatedLiteral),
                },
                Some('\'') => break,
                Some(c @ ('(' | ')' | ':')) => return Err(FilterError::UnescapedDelimiter(c)),
                Some(c) => text.push(c),
                None => return Err(FilterError::UnterminatedLiteral),
            }
            if text.len() > MAX_LITERAL_LENGTH {
                return Err(FilterError::LiteralTooLong {
                    max: MAX_LITERAL_LENGTH,
                });
            }
        }
        Ok(text)
    }

    /// A bare (unquoted) literal: must be numeric.
    fn bare(&mut self) -> Result<Value, FilterError> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(')') => break,
                Some(':') => return Err(FilterError::UnescapedDelimiter(':')),
                Some('(') => return Err(FilterError::UnescapedDelimiter('(')),
                Some('\'') => return Err(FilterError::InvalidLiteral(self.rest())),
                Some(_) => self.pos += 1,
                None => return Err(FilterError::UnbalancedParenthesis),
            }
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        self.pos += 1; // consume ')'

        let token = token.trim();
        if token.len() > MAX_LITERAL_LENGTH {
            return Err(FilterError::LiteralTooLong {
                max: MAX_LITERAL_LENGTH,
            });
        }
        if let Ok(n) = token.parse::<i64>() {
            return Ok(Value::Int(n));
        }
        if let Ok(x) = token.parse::<f64>() {
            return Ok(Value::Float(x));
        }
        Err(FilterError::InvalidLiteral(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Postgres, Sqlite};

    #[test]
    fn test_single_like_clause() {
        let filter = FilterExpr::parse("(t.label:like:'VIP%')").unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(
            filter.terms[0].1,
            Clause {
                column: "t.label".into(),
                op: Operator::Like,
                value: Value::String("VIP%".into()),
            }
        );
    }

    #[test]
    fn test_missing_separator_rejected() {
        // Space-delimited clause from the docs: not colon-separated
        assert_eq!(
            FilterExpr::parse("(t.label like 'VIP%')"),
            Err(FilterError::MissingSeparator)
        );
    }

    #[test]
    fn test_two_clauses_with_and() {
        let filter = FilterExpr::parse("(t.label:like:'VIP%') and (t.type:=:2)").unwrap();
        assert_eq!(filter.len(), 2);
        assert_eq!(filter.terms[1].0, Connector::And);
        assert_eq!(filter.terms[1].1.value, Value::Int(2));
    }

    #[test]
    fn test_or_connector_case_insensitive() {
        let filter = FilterExpr::parse("(t.type:=:1) OR (t.type:=:2)").unwrap();
        assert_eq!(filter.terms[1].0, Connector::Or);

        let filter = FilterExpr::parse("(t.type:=:1) And (t.type:=:2)").unwrap();
        assert_eq!(filter.terms[1].0, Connector::And);
    }

    #[test]
    fn test_all_operators() {
        for (text, op) in [
            ("=", Operator::Eq),
            ("!=", Operator::Ne),
            ("<", Operator::Lt),
            ("<=", Operator::Lte),
            (">", Operator::Gt),
            (">=", Operator::Gte),
            ("like", Operator::Like),
        ] {
            let filter = FilterExpr::parse(&format!("(t.type:{text}:5)")).unwrap();
            assert_eq!(filter.terms[0].1.op, op, "operator {text}");
        }
    }

    #[test]
    fn test_unknown_operator_rejected() {
        assert_eq!(
            FilterExpr::parse("(t.type:in:5)"),
            Err(FilterError::UnknownOperator("in".into()))
        );
        assert_eq!(
            FilterExpr::parse("(t.type:<>:5)"),
            Err(FilterError::UnknownOperator("<>".into()))
        );
    }

    #[test]
    fn test_whitespace_tolerated_around_sections() {
        let filter = FilterExpr::parse("( t.label : like : 'VIP%' )").unwrap();
        assert_eq!(filter.terms[0].1.column, "t.label");
        assert_eq!(filter.terms[0].1.value, Value::String("VIP%".into()));
    }

    #[test]
    fn test_bare_numeric_literals() {
        let filter = FilterExpr::parse("(t.type:=:2)").unwrap();
        assert_eq!(filter.terms[0].1.value, Value::Int(2));

        let filter = FilterExpr::parse("(t.weight:>=:1.5)").unwrap();
        assert_eq!(filter.terms[0].1.value, Value::Float(1.5));

        let filter = FilterExpr::parse("(t.offset_n:=:-3)").unwrap();
        assert_eq!(filter.terms[0].1.value, Value::Int(-3));
    }

    #[test]
    fn test_bare_non_numeric_rejected() {
        assert_eq!(
            FilterExpr::parse("(t.type:=:abc)"),
            Err(FilterError::InvalidLiteral("abc".into()))
        );
    }

    #[test]
    fn test_invalid_column_rejected() {
        assert_eq!(
            FilterExpr::parse("(t.label;x:=:1)"),
            Err(FilterError::InvalidColumn("t.label;x".into()))
        );
        assert_eq!(
            FilterExpr::parse("(a.b.c:=:1)"),
            Err(FilterError::InvalidColumn("a.b.c".into()))
        );
    }

    #[test]
    fn test_escaped_delimiters_in_literal() {
        let filter = FilterExpr::parse(r"(t.label:=:'a\:b')").unwrap();
        assert_eq!(filter.terms[0].1.value, Value::String("a:b".into()));

        let filter = FilterExpr::parse(r"(t.label:=:'f\(x\)')").unwrap();
        assert_eq!(filter.terms[0].1.value, Value::String("f(x)".into()));

        let filter = FilterExpr::parse(r"(t.label:=:'it\'s')").unwrap();
        assert_eq!(filter.terms[0].1.value, Value::String("it's".into()));

        let filter = FilterExpr::parse(r"(t.label:=:'a\\b')").unwrap();
        assert_eq!(filter.terms[0].1.value, Value::String(r"a\b".into()));
    }

    #[test]
    fn test_unescaped_delimiters_rejected() {
        assert_eq!(
            FilterExpr::parse("(t.label:=:'a:b')"),
            Err(FilterError::UnescapedDelimiter(':'))
        );
        assert_eq!(
            FilterExpr::parse("(t.label:=:'a(b')"),
            Err(FilterError::UnescapedDelimiter('('))
        );
        assert_eq!(
            FilterExpr::parse("(t.type:=:1:2)"),
            Err(FilterError::UnescapedDelimiter(':'))
        );
    }

    #[test]
    fn test_unknown_escape_rejected() {
        assert_eq!(
            FilterExpr::parse(r"(t.label:=:'a\nb')"),
            Err(FilterError::UnknownEscape('n'))
        );
    }

    #[test]
    fn test_unterminated_literal() {
        assert_eq!(
            FilterExpr::parse("(t.label:=:'abc"),
            Err(FilterError::UnterminatedLiteral)
        );
    }

    #[test]
    fn test_unclosed_clause() {
        assert_eq!(
            FilterExpr::parse("(t.type:=:1"),
            Err(FilterError::UnbalancedParenthesis)
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(FilterExpr::parse(""), Err(FilterError::Empty));
        assert_eq!(FilterExpr::parse("   "), Err(FilterError::Empty));
    }

    #[test]
    fn test_injection_tail_rejected() {
        // A raw SQL tail after a valid clause never reaches the query
        let err = FilterExpr::parse("(t.label:=:'x') OR 1=1 --").unwrap_err();
        assert_eq!(err, FilterError::ExpectedClause);

        let err = FilterExpr::parse("(t.label:=:'x'); DROP TABLE category").unwrap_err();
        assert!(matches!(err, FilterError::TrailingInput(_)));
    }

    #[test]
    fn test_injection_inside_literal_is_parameterized() {
        // Hostile text inside a properly quoted literal is data, not SQL
        let filter = FilterExpr::parse("(t.label:=:'x; DROP TABLE category--')").unwrap();
        let (sql, params, next) = filter.render(&Postgres, 1);
        assert_eq!(sql, "t.label = $1");
        assert_eq!(params, vec![Value::String("x; DROP TABLE category--".into())]);
        assert_eq!(next, 2);
    }

    #[test]
    fn test_clause_count_cap() {
        let many = (0..40)
            .map(|i| format!("(t.type:=:{i})"))
            .collect::<Vec<_>>()
            .join(" and ");
        assert_eq!(
            FilterExpr::parse(&many),
            Err(FilterError::TooManyClauses { max: 32 })
        );
    }

    #[test]
    fn test_literal_length_cap() {
        let long = "x".repeat(300);
        assert_eq!(
            FilterExpr::parse(&format!("(t.label:=:'{long}')")),
            Err(FilterError::LiteralTooLong { max: 256 })
        );
    }

    #[test]
    fn test_render_with_connectors_and_indices() {
        let filter =
            FilterExpr::parse("(t.label:like:'V%') and (t.type:=:2) or (t.type:=:3)").unwrap();
        let (sql, params, next) = filter.render(&Sqlite, 3);
        assert_eq!(sql, "t.label LIKE ?3 AND t.type = ?4 OR t.type = ?5");
        assert_eq!(params.len(), 3);
        assert_eq!(next, 6);
    }

    #[test]
    fn test_error_display() {
        let err = FilterError::UnknownOperator("regexp".into());
        assert!(err.to_string().contains("regexp"));

        let err = FilterError::TooManyClauses { max: 32 };
        assert!(err.to_string().contains("32"));
    }
}
