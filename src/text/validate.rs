use std::fmt;

use serde::Serialize;

use super::error::PostTextError;
use super::normalize::{is_invisible, normalize};
use super::scan::{scan, WeightBreakdown};
use super::weight::{WeightClass, DEFAULT_LIMIT, ELLIPSIS};

/// Per-call settings for validation and truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Maximum weighted length, at least 1.
    pub limit: usize,
    /// Marker appended to truncated text.
    pub ellipsis: char,
    /// Log a human-readable report for every validation.
    pub debug: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            ellipsis: ELLIPSIS,
            debug: false,
        }
    }
}

impl ValidateOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub(crate) fn check(&self) -> Result<(), PostTextError> {
        if self.limit == 0 {
            return Err(PostTextError::InvalidLimit(self.limit));
        }
        let ellipsis = self.ellipsis;
        if ellipsis.is_whitespace() || ellipsis == '\u{200D}' || is_invisible(ellipsis) {
            return Err(PostTextError::InvalidEllipsis(self.ellipsis));
        }
        Ok(())
    }
}

/// Outcome of validating one candidate post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub weighted_length: usize,
    pub limit: usize,
    pub breakdown: WeightBreakdown,
    pub urls_found: Vec<String>,
    pub normalized_text: String,
}

impl ValidationResult {
    /// How far the text is over the limit, 0 when it fits.
    pub fn chars_over(&self) -> usize {
        self.weighted_length.saturating_sub(self.limit)
    }

    /// Whether the text is fit to publish as-is: within the limit and not
    /// empty after normalization.
    pub fn should_publish(&self) -> bool {
        self.is_valid && !self.normalized_text.is_empty()
    }

    /// Human-readable breakdown for operator debugging.
    pub fn report(&self) -> Report<'_> {
        Report(self)
    }
}

/// Display adapter produced by [`ValidationResult::report`].
pub struct Report<'a>(&'a ValidationResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        let preview: String = r.normalized_text.chars().take(50).collect();
        let more = if r.normalized_text.chars().nth(50).is_some() {
            "..."
        } else {
            ""
        };
        writeln!(f, "Text: {preview}{more}")?;
        writeln!(f, "Weighted length: {}/{}", r.weighted_length, r.limit)?;
        writeln!(f, "Valid: {}", r.is_valid)?;
        if !r.is_valid {
            writeln!(f, "Over by: {} weighted characters", r.chars_over())?;
        }
        writeln!(
            f,
            "Character breakdown: weight_1={} weight_2={} urls={} ({} weighted)",
            r.breakdown.standard,
            r.breakdown.wide,
            r.breakdown.urls,
            r.breakdown.weighted(WeightClass::Url),
        )?;
        write!(f, "URLs found: {}", r.urls_found.len())?;
        for url in &r.urls_found {
            write!(f, "\n  {url}")?;
        }
        Ok(())
    }
}

/// Validates `text` against `options.limit`.
///
/// The text is normalized first; the returned `normalized_text` is what was
/// measured. Pure apart from the optional debug log line.
///
/// # Errors
///
/// Returns [`PostTextError::InvalidLimit`] when the limit is zero.
pub fn validate_with(
    text: &str,
    options: &ValidateOptions,
) -> Result<ValidationResult, PostTextError> {
    options.check()?;

    let normalized_text = normalize(text);
    let scanned = scan(&normalized_text);
    let weighted_length = scanned.total();
    let urls_found = scanned
        .urls
        .iter()
        .map(|span| span.as_str(&normalized_text).to_owned())
        .collect();

    let result = ValidationResult {
        is_valid: weighted_length <= options.limit,
        weighted_length,
        limit: options.limit,
        breakdown: scanned.breakdown,
        urls_found,
        normalized_text,
    };

    if options.debug {
        tracing::info!(
            weighted = result.weighted_length,
            limit = result.limit,
            valid = result.is_valid,
            "Post validation\n{}",
            result.report()
        );
    }

    Ok(result)
}

/// Validates `text` against `limit` with default options.
///
/// # Errors
///
/// Returns [`PostTextError::InvalidLimit`] when `limit` is zero.
pub fn validate(text: &str, limit: usize) -> Result<ValidationResult, PostTextError> {
    validate_with(text, &ValidateOptions::with_limit(limit))
}

/// Weighted length of `text` after normalization.
pub fn weighted_length(text: &str) -> usize {
    scan(&normalize(text)).total()
}

/// Whether `text` exceeds `limit` after normalization.
///
/// # Errors
///
/// Returns [`PostTextError::InvalidLimit`] when `limit` is zero.
pub fn is_too_long(text: &str, limit: usize) -> Result<bool, PostTextError> {
    Ok(!validate(text, limit)?.is_valid)
}
