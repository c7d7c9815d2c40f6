//! Identifier validation
//!
//! Anything interpolated into SQL as structure (not bound as an argument) must
//! pass through here first.

use std::fmt;

/// Validation errors for SQL identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name contains invalid characters (only alphanumeric and underscore allowed)
    InvalidCharacters(String),
    /// Name is too long (PostgreSQL limit is 63 characters)
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    /// Name is empty
    Empty,
    /// Name starts with invalid character (must start with letter or underscore)
    InvalidStartCharacter(String),
    /// Name is a reserved SQL keyword
    ReservedKeyword(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidCharacters(name) => {
                write!(f, "invalid characters in '{}': only ASCII letters, digits and underscores are allowed", name)
            }
            ValidationError::TooLong {
                name,
                length,
                max_length,
            } => {
                write!(
                    f,
                    "'{}' is too long: {} characters (max {})",
                    name, length, max_length
                )
            }
            ValidationError::Empty => write!(f, "name cannot be empty"),
            ValidationError::InvalidStartCharacter(name) => {
                write!(f, "'{}' must start with a letter or underscore", name)
            }
            ValidationError::ReservedKeyword(name) => {
                write!(f, "'{}' is a reserved SQL keyword", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// An identifier (result alias, mostly) that is safe to splice into a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedIdentifier(String);

impl ValidatedIdentifier {
    /// PostgreSQL identifier length limit
    pub const MAX_LENGTH: usize = 63;

    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;

    if name.len() > ValidatedIdentifier::MAX_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: ValidatedIdentifier::MAX_LENGTH,
        });
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    if is_reserved_keyword(name) {
        return Err(ValidationError::ReservedKeyword(name.to_string()));
    }

    Ok(())
}

fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "ALL", "AND", "ANY", "ARRAY", "AS", "ASC", "BETWEEN", "BOTH", "CASE", "CAST", "CHECK",
        "COLUMN", "CONSTRAINT", "CREATE", "CROSS", "CURRENT_DATE", "CURRENT_USER", "DEFAULT",
        "DELETE", "DESC", "DISTINCT", "DO", "DROP", "ELSE", "END", "EXCEPT", "FALSE", "FETCH",
        "FOR", "FOREIGN", "FROM", "FULL", "GRANT", "GROUP", "HAVING", "ILIKE", "IN", "INNER",
        "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "LEADING", "LEFT", "LIKE", "LIMIT", "NOT",
        "NULL", "OFFSET", "ON", "ONLY", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES",
        "RETURNING", "RIGHT", "SELECT", "SESSION_USER", "SOME", "TABLE", "THEN", "TO",
        "TRUE", "UNION", "UNIQUE", "UPDATE", "USER", "USING", "WHEN", "WHERE", "WINDOW",
        "WITH",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}
