//! Resolution error types.
//!
//! A rule that simply does not apply is not an error: lookups report it as
//! `Ok(None)` so callers can decide per object whether a missing location is
//! fatal.

use thiserror::Error;

use crate::attrs::Value;

/// Errors raised while merging attributes, registering rules or building paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Two attribute sources disagree on a key one of them pinned.
    #[error("conflicting values for `{key}`: fixed to `{fixed}`, given `{given}`")]
    Conflict {
        key: String,
        fixed: Value,
        given: Value,
    },

    /// A rule failed registration-time validation.
    #[error("malformed rule: {0}")]
    MalformedRule(String),

    /// A component was asked to build a path without one of its attributes.
    #[error("missing attribute `{0}`")]
    MissingAttribute(String),

    /// A bound component saw a different value than the one it is bound to.
    #[error("attribute `{key}` must be `{expected}`, got `{actual}`")]
    BoundMismatch {
        key: String,
        expected: Value,
        actual: Value,
    },

    /// A format template or path segment could not be parsed.
    #[error("invalid pattern `{pattern}`: {reason}")]
    Template { pattern: String, reason: String },
}

impl RouteError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRule(message.into())
    }

    pub(crate) fn template(pattern: &str, reason: impl Into<String>) -> Self {
        Self::Template {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for resolution operations.
pub type Result<T, E = RouteError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_display() {
        let err = RouteError::Conflict {
            key: "type".into(),
            fixed: Value::from("post"),
            given: Value::from("tag"),
        };
        assert_eq!(
            err.to_string(),
            "conflicting values for `type`: fixed to `post`, given `tag`"
        );
    }

    #[test]
    fn test_template_display() {
        let err = RouteError::template("/{oops", "unclosed `{`");
        assert_eq!(err.to_string(), "invalid pattern `/{oops`: unclosed `{`");
    }
}
