//! Identifier validation for SQL injection prevention.

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate that a string is a safe SQL identifier.
///
/// A valid SQL identifier:
/// - Starts with a letter (a-z, A-Z) or underscore
/// - Contains only letters, digits (0-9), and underscores
/// - Is not empty and not longer than 63 characters
///
/// Everything else is rejected: quotes, semicolons, whitespace, dots,
/// comment markers, and any non-ASCII character.
///
/// # Examples
///
/// ```
/// use taxa_sql::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("category"));
/// assert!(is_valid_sql_identifier("company_id"));
/// assert!(is_valid_sql_identifier("_hidden"));
///
/// assert!(!is_valid_sql_identifier(""));            // empty
/// assert!(!is_valid_sql_identifier("1abc"));        // starts with digit
/// assert!(!is_valid_sql_identifier("t.label"));     // qualified (see column refs)
/// assert!(!is_valid_sql_identifier("x; DROP"));     // special chars
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();

    // First character must be letter or underscore
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    // Rest must be letters, digits, or underscores
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a column reference: a bare identifier or one qualified by a
/// single table alias (`label` or `t.label`).
///
/// # Examples
///
/// ```
/// use taxa_sql::is_valid_column_ref;
///
/// assert!(is_valid_column_ref("label"));
/// assert!(is_valid_column_ref("t.label"));
///
/// assert!(!is_valid_column_ref("a.b.c"));       // at most one qualifier
/// assert!(!is_valid_column_ref("t.label--"));   // comment marker
/// assert!(!is_valid_column_ref("t."));          // empty column part
/// ```
#[inline]
#[must_use]
pub fn is_valid_column_ref(s: &str) -> bool {
    match s.split_once('.') {
        None => is_valid_sql_identifier(s),
        Some((qualifier, column)) => {
            is_valid_sql_identifier(qualifier) && is_valid_sql_identifier(column)
        },
    }
}

/// Assert that a string is a valid SQL identifier.
///
/// # Panics
///
/// Panics with a descriptive error if the identifier is invalid. This is
/// intended for programmer errors (invalid table/column names in code),
/// not for user input validation.
#[inline]
pub fn assert_valid_sql_identifier(s: &str, context: &str) {
    assert!(
        is_valid_sql_identifier(s),
        "Invalid SQL {context} name '{s}': must start with letter/underscore, \
             contain only ASCII alphanumeric/underscore, and be 1-63 chars"
    );
}

/// Assert that a string is a valid column reference.
///
/// # Panics
///
/// Panics with a descriptive error if the reference is invalid. Like
/// [`assert_valid_sql_identifier`], this guards code-owned names only.
#[inline]
pub fn assert_valid_column_ref(s: &str, context: &str) {
    assert!(
        is_valid_column_ref(s),
        "Invalid SQL {context} reference '{s}': expected `column` or `alias.column`"
    );
}
