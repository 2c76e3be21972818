//! Normalization error types.

use thiserror::Error;

/// Errors raised while normalizing a markup document.
///
/// A document either normalizes completely or the conversion is abandoned;
/// every variant names the group, attribute or key that failed.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("markup parse error: {0}")]
    Parse(String),

    #[error("top-level `{element}` has no `x:Key`")]
    MissingKey { element: String },

    #[error("key `{key}` already used by {existing}, requested again by {requested}")]
    KeyCollision {
        key: String,
        existing: String,
        requested: String,
    },

    #[error("unsupported resource kind `{0}` (expected color, brush or opacity)")]
    UnsupportedKind(String),

    #[error("`{attribute}` in `{group}` references missing resource `{key}`")]
    DanglingReference {
        group: String,
        attribute: String,
        key: String,
    },
}
