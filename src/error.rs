//! Error types for finder.

use thiserror::Error;

/// The main error type for finder operations.
#[derive(Debug, Error)]
pub enum FinderError {
    /// The called name does not look like `find<Word>...`.
    ///
    /// Not a failure of the compiler itself: callers route this to their
    /// own unknown-method handling.
    #[error("Not a finder method: '{0}'")]
    NotAFinderMethod(String),

    /// A keyword required a keyword continuation and got a field instead.
    #[error("Unknown find method including {0}.")]
    UnknownFindMethod(String),

    /// `ordered` without a following `by <field>`.
    #[error("Malformed ordered clause: expected 'OrderedBy<Field>'")]
    MalformedOrderedClause,

    /// Neither a registered method, the compiler, nor a fallback handled the call.
    #[error("Call to undefined method '{0}'")]
    NoSuchMethod(String),

    /// Placeholder count in `where` differs from the number of bound values.
    #[error("Bind mismatch: query expects {expected} value(s), got {got}")]
    BindMismatch { expected: usize, got: usize },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FinderError {
    /// Create an unknown find method error for the offending token.
    pub fn unknown(token: impl Into<String>) -> Self {
        Self::UnknownFindMethod(token.into())
    }

    /// True for the errors produced by a malformed finder name.
    pub fn is_grammar_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownFindMethod(_) | Self::MalformedOrderedClause
        )
    }
}

/// Result type alias for finder operations.
pub type FinderResult<T> = Result<T, FinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinderError::unknown("xyz");
        assert_eq!(err.to_string(), "Unknown find method including xyz.");

        let err = FinderError::BindMismatch {
            expected: 2,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "Bind mismatch: query expects 2 value(s), got 1"
        );
    }

    #[test]
    fn test_grammar_errors() {
        assert!(FinderError::MalformedOrderedClause.is_grammar_error());
        assert!(FinderError::unknown("x").is_grammar_error());
        assert!(!FinderError::NotAFinderMethod("save".into()).is_grammar_error());
    }
}
