use super::error::PostTextError;
use super::links::validate_link;
use super::normalize::normalize;
use super::truncate::{truncate_detailed, Truncation};
use super::validate::ValidateOptions;

/// Builds a post from a summary body and an article link.
///
/// The link goes on its own line after the body and is treated as the
/// trailing URL, so when the post is too long it is the body that gets cut
/// and ellipsized while the link survives intact.
///
/// # Errors
///
/// Returns [`PostTextError::InvalidLink`] when `link` is not an absolute
/// http(s) URL, and [`PostTextError::InvalidLimit`] for a zero limit.
pub fn compose_post(
    body: &str,
    link: &str,
    options: &ValidateOptions,
) -> Result<Truncation, PostTextError> {
    options.check()?;
    validate_link(link)?;

    let body = normalize(body);
    let post = if body.is_empty() {
        link.to_owned()
    } else {
        format!("{body}\n{link}")
    };

    let fitted = truncate_detailed(&post, options)?;
    tracing::debug!(
        weighted = fitted.weighted_length,
        limit = options.limit,
        truncated = fitted.was_truncated,
        "Composed post"
    );
    Ok(fitted)
}
