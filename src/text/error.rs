use thiserror::Error;

/// Errors returned by the post text operations.
///
/// All of them are caller contract violations. Unusual text on its own
/// (empty, whitespace only, no URLs, oversized URLs) is never an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostTextError {
    /// The weighted-length limit must be at least 1.
    #[error("Invalid limit: {0} (must be greater than zero)")]
    InvalidLimit(usize),

    /// The ellipsis would be removed or collapsed by normalization.
    #[error("Invalid ellipsis: {0:?} is whitespace or invisible")]
    InvalidEllipsis(char),

    /// The link passed for composition is not a usable http(s) URL.
    #[error("Invalid link '{link}': {reason}")]
    InvalidLink { link: String, reason: String },
}
