//! URL-preserving truncation.
//!
//! Text that is over the limit is cut at a grapheme boundary (preferably a
//! word boundary), an ellipsis is appended, and a trailing link is put back
//! verbatim. URL spans are atomic: they are either kept whole or dropped.
//!
//! The cut point comes from a binary search over the running weight of the
//! scanned units, which is non-decreasing, so long inputs cost one scan plus
//! a logarithmic search.
use std::iter;

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use super::error::PostTextError;
use super::links::{find_urls, trailing_url};
use super::normalize::normalize;
use super::scan::{measure, scan, Scan, ScanUnit};
use super::validate::ValidateOptions;
use super::weight::{classify_char, WeightClass, URL_WEIGHT};

/// Outcome of fitting text to a limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truncation {
    /// Normalized text guaranteed to be within the limit.
    pub text: String,
    /// False when the normalized input already fit.
    pub was_truncated: bool,
    pub weighted_length: usize,
}

/// Where to cut the normalized text and what to append after the cut.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TruncationPlan<'a> {
    /// Byte offset into the normalized text; everything before it is kept.
    cut: usize,
    ellipsis: Option<char>,
    /// Separator and link re-attached verbatim at the end.
    tail: Option<&'a str>,
}

impl TruncationPlan<'_> {
    fn render(&self, text: &str) -> String {
        let tail = self.tail.unwrap_or("");
        let mut out = String::with_capacity(self.cut + 4 + tail.len());
        out.push_str(&text[..self.cut]);
        if let Some(ellipsis) = self.ellipsis {
            out.push(ellipsis);
        }
        out.push_str(tail);
        out
    }
}

/// Fits `text` to `options.limit`, keeping a trailing URL when possible.
///
/// Text that already fits comes back normalized with `was_truncated` unset.
/// Otherwise the body before a trailing URL is cut, followed by the
/// ellipsis, the separator found in the input and the URL. When the URL and ellipsis
/// leave no room for any body text only the URL is returned, and when the
/// URL alone is over the limit it is dropped instead.
///
/// The result is always re-measured; if it were still over the limit the
/// longest plain prefix that fits is returned instead.
///
/// # Errors
///
/// Returns [`PostTextError::InvalidLimit`] when the limit is zero. Text
/// content never causes an error.
pub fn truncate_detailed(
    text: &str,
    options: &ValidateOptions,
) -> Result<Truncation, PostTextError> {
    options.check()?;
    let limit = options.limit;

    let normalized = normalize(text);
    let scanned = scan(&normalized);
    let total = scanned.total();
    if total <= limit {
        return Ok(Truncation {
            text: normalized,
            was_truncated: false,
            weighted_length: total,
        });
    }

    let plan = plan_truncation(&normalized, &scanned, options);
    let candidate = normalize(&plan.render(&normalized));
    let weighted_length = measure(&candidate);
    if weighted_length <= limit {
        tracing::debug!(
            from = total,
            to = weighted_length,
            limit,
            kept_url = plan.tail.is_some(),
            "Truncated post text"
        );
        return Ok(Truncation {
            text: candidate,
            was_truncated: true,
            weighted_length,
        });
    }

    tracing::warn!(
        weighted = weighted_length,
        limit,
        "Truncated text still over limit, falling back to plain prefix"
    );
    let cut = safe_prefix(&normalized, &scanned.units, limit);
    let text = normalized[..cut].to_owned();
    let weighted_length = measure(&text);
    Ok(Truncation {
        text,
        was_truncated: true,
        weighted_length,
    })
}

/// Fits `text` to `limit` with the default ellipsis, returning only the text.
///
/// # Errors
///
/// Returns [`PostTextError::InvalidLimit`] when `limit` is zero.
pub fn truncate(text: &str, limit: usize) -> Result<String, PostTextError> {
    truncate_detailed(text, &ValidateOptions::with_limit(limit)).map(|t| t.text)
}

fn plan_truncation<'a>(
    text: &'a str,
    scanned: &Scan,
    options: &ValidateOptions,
) -> TruncationPlan<'a> {
    let limit = options.limit;
    let units = scanned.units.as_slice();

    let Some(url) = trailing_url(text, &scanned.urls) else {
        return plan_plain(text, units, options);
    };
    let Some(url_index) = units.iter().rposition(|u| u.range == url.range) else {
        return plan_plain(text, units, options);
    };

    // Body before the URL, minus the whitespace separating it from the URL
    let body = &units[..url_index];
    let content_len = body
        .iter()
        .rposition(|u| !u.is_whitespace(text))
        .map_or(0, |i| i + 1);
    let content = &body[..content_len];

    if URL_WEIGHT > limit {
        tracing::debug!(limit, "Trailing URL alone exceeds limit, dropping it");
        return plan_plain(text, content, options);
    }

    let separator_start = content.last().map_or(url.range.start, |u| u.range.end);
    let tail = &text[separator_start..url.range.end];
    let reserved = measure(tail) + classify_char(options.ellipsis).weight();

    let kept = limit
        .checked_sub(reserved)
        .map_or(0, |budget| fitting_units(text, content, budget));
    let cut = settle_cut(text, content, kept, Some(options.ellipsis));
    if cut == 0 {
        tracing::debug!(
            limit,
            "No room for text before trailing URL, keeping URL only"
        );
        return TruncationPlan {
            cut: 0,
            ellipsis: None,
            tail: Some(url.as_str(text)),
        };
    }

    TruncationPlan {
        cut,
        ellipsis: Some(options.ellipsis),
        tail: Some(tail),
    }
}

/// Plan for text without a preserved URL: prefix plus ellipsis, or a bare
/// prefix when the ellipsis leaves no room for content.
fn plan_plain<'a>(
    text: &str,
    units: &[ScanUnit],
    options: &ValidateOptions,
) -> TruncationPlan<'a> {
    let ellipsis_weight = classify_char(options.ellipsis).weight();
    let kept = options
        .limit
        .checked_sub(ellipsis_weight)
        .map_or(0, |budget| fitting_units(text, units, budget));
    let cut = settle_cut(text, units, kept, Some(options.ellipsis));
    if cut > 0 {
        return TruncationPlan {
            cut,
            ellipsis: Some(options.ellipsis),
            tail: None,
        };
    }

    tracing::debug!(
        limit = options.limit,
        "No room for ellipsis, keeping plain prefix"
    );
    TruncationPlan {
        cut: safe_prefix(text, units, options.limit),
        ellipsis: None,
        tail: None,
    }
}

/// Number of leading units whose combined weight is within `budget`.
fn units_within(units: &[ScanUnit], budget: usize) -> usize {
    let running: Vec<usize> = units
        .iter()
        .scan(0, |acc, unit| {
            *acc += unit.weight();
            Some(*acc)
        })
        .collect();
    running.partition_point(|&weight| weight <= budget)
}

/// Like [`units_within`] but backs off to the last word boundary, unless
/// that would discard more than half of what fits.
fn fitting_units(text: &str, units: &[ScanUnit], budget: usize) -> usize {
    let fitted = units_within(units, budget);
    if fitted == 0 || fitted == units.len() {
        return fitted;
    }

    let scope = &text[..units[units.len() - 1].range.end];
    let bounds: Vec<usize> = scope
        .split_word_bound_indices()
        .map(|(offset, _)| offset)
        .chain(iter::once(scope.len()))
        .collect();

    let mut kept = fitted;
    while kept > 0 && bounds.binary_search(&units[kept - 1].range.end).is_err() {
        kept -= 1;
    }
    if kept * 2 >= fitted {
        kept
    } else {
        fitted
    }
}

/// Byte offset to cut at after keeping `kept` units, dropping trailing
/// whitespace. When a marker will follow the cut, trailing URLs are dropped
/// too, as is any unit that would let the marker complete a new link.
fn settle_cut(
    text: &str,
    units: &[ScanUnit],
    mut kept: usize,
    marker: Option<char>,
) -> usize {
    while let Some(last) = kept.checked_sub(1).map(|i| &units[i]) {
        let droppable = last.is_whitespace(text)
            || marker.is_some_and(|marker| {
                last.class == WeightClass::Url || forms_url(&text[..last.range.end], marker)
            });
        if !droppable {
            return last.range.end;
        }
        kept -= 1;
    }
    0
}

/// Whether appending `marker` turns the last word of `prefix` into a link,
/// as `www.` followed by `…` would be.
fn forms_url(prefix: &str, marker: char) -> bool {
    let last_word = prefix.rsplit(char::is_whitespace).next().unwrap_or(prefix);
    let mut candidate = String::with_capacity(last_word.len() + marker.len_utf8());
    candidate.push_str(last_word);
    candidate.push(marker);
    !find_urls(&candidate).is_empty()
}

/// Longest prefix within `limit` with nothing appended.
fn safe_prefix(text: &str, units: &[ScanUnit], limit: usize) -> usize {
    settle_cut(text, units, units_within(units, limit), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::weight::ELLIPSIS;

    const LINK: &str = "https://example.com/a/b/c";

    fn fit(text: &str, limit: usize) -> Truncation {
        truncate_detailed(text, &ValidateOptions::with_limit(limit)).unwrap()
    }

    // ========================================================================
    // No truncation needed
    // ========================================================================

    #[test]
    fn test_fitting_text_returned_normalized() {
        let result = fit("  Hello\u{200B} world  ", 280);
        assert_eq!(result.text, "Hello world");
        assert!(!result.was_truncated);
        assert_eq!(result.weighted_length, 11);
    }

    #[test]
    fn test_empty_text() {
        let result = fit("", 1);
        assert_eq!(result.text, "");
        assert!(!result.was_truncated);
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert_eq!(truncate("abc", 0), Err(PostTextError::InvalidLimit(0)));
    }

    // ========================================================================
    // Plain text
    // ========================================================================

    #[test]
    fn test_ascii_cut_on_word_boundary() {
        let result = fit("hello world again", 10);
        // budget 8 fits "hello wo", backs off to "hello"
        assert_eq!(result.text, "hello\u{2026}");
        assert_eq!(result.weighted_length, 7);
    }

    #[test]
    fn test_long_word_cut_at_grapheme() {
        let text = "a".repeat(300);
        let result = fit(&text, 280);
        assert_eq!(result.text, format!("{}{ELLIPSIS}", "a".repeat(278)));
        assert_eq!(result.weighted_length, 280);
    }

    #[test]
    fn test_cjk_prefix_plus_ellipsis() {
        let text = "あ".repeat(150);
        let result = fit(&text, 280);
        assert_eq!(result.text, format!("{}{ELLIPSIS}", "あ".repeat(139)));
        assert_eq!(result.weighted_length, 280);
    }

    #[test]
    fn test_emoji_sequence_not_split() {
        let technologist = "\u{1F468}\u{200D}\u{1F4BB}";
        let text = format!("{}{technologist}{technologist}", "a".repeat(277));
        let result = fit(&text, 280);
        assert_eq!(result.text, format!("{}{ELLIPSIS}", "a".repeat(277)));
        assert!(!result.text.contains('\u{200D}'));
    }

    #[test]
    fn test_emoji_sequence_kept_whole() {
        let technologist = "\u{1F468}\u{200D}\u{1F4BB}";
        let woman = "\u{1F469}\u{200D}\u{1F4BB}";
        let text = format!("{}{technologist}{woman}b", "a".repeat(276));
        let result = fit(&text, 280);
        assert!(result.text.ends_with(&format!("{technologist}{ELLIPSIS}")));
        assert_eq!(result.weighted_length, 280);
    }

    #[test]
    fn test_mid_text_url_is_atomic() {
        let result = fit("ab https://example.com/path cd", 20);
        assert_eq!(result.text, "ab\u{2026}");
    }

    #[test]
    fn test_ellipsis_never_glued_to_url() {
        let result = fit("ab https://example.com cd efgh", 30);
        assert!(!result.text.contains("example.com\u{2026}"));
        assert!(result.weighted_length <= 30);
    }

    #[test]
    fn test_ellipsis_does_not_complete_www_link() {
        let result = fit("go www. more text here", 10);
        assert_eq!(result.text, "go www\u{2026}");
        assert_eq!(result.weighted_length, 8);
        assert!(find_urls(&result.text).is_empty());
    }

    #[test]
    fn test_ellipsis_does_not_complete_scheme_link() {
        let result = fit("see x:// more words here", 11);
        assert_eq!(result.text, "see x:/\u{2026}");
        assert_eq!(result.weighted_length, 9);
        assert!(find_urls(&result.text).is_empty());
    }

    #[test]
    fn test_tiny_limit_drops_ellipsis() {
        let result = fit("あいう", 3);
        assert_eq!(result.text, "あ");
        let result = fit("あいう", 1);
        assert_eq!(result.text, "");
    }

    // ========================================================================
    // Trailing URL
    // ========================================================================

    #[test]
    fn test_trailing_url_preserved() {
        let text = format!("{} {LINK}", "a".repeat(270));
        let result = fit(&text, 280);
        assert_eq!(result.text, format!("{}{ELLIPSIS} {LINK}", "a".repeat(254)));
        assert_eq!(result.weighted_length, 280);
    }

    #[test]
    fn test_trailing_url_newline_separator_kept() {
        let body = "本日のAIニュースをお届けします。".repeat(12);
        let text = format!("{body}\n{LINK}");
        let result = fit(&text, 280);
        assert!(result.text.ends_with(&format!("{ELLIPSIS}\n{LINK}")));
        assert!(result.weighted_length <= 280);
    }

    #[test]
    fn test_trailing_url_word_boundary() {
        let text = format!("{}{LINK}", "word ".repeat(54));
        let result = fit(&text, 280);
        let expected_body = format!("{}word", "word ".repeat(50));
        assert_eq!(result.text, format!("{expected_body}{ELLIPSIS} {LINK}"));
    }

    #[test]
    fn test_no_room_for_body_keeps_url_only() {
        let result = fit(&format!("some text here {LINK}"), 25);
        assert_eq!(result.text, LINK);
        assert_eq!(result.weighted_length, 23);
    }

    #[test]
    fn test_url_over_limit_is_dropped() {
        let result = fit(&format!("hello world {LINK}"), 10);
        assert_eq!(result.text, "hello\u{2026}");
        assert!(!result.text.contains("https"));
    }

    #[test]
    fn test_url_only_over_limit() {
        let result = fit(LINK, 5);
        assert_eq!(result.text, "");
        assert!(result.was_truncated);
    }

    #[test]
    fn test_two_urls_keeps_trailing_one() {
        let result = fit("https://a.com https://b.com", 30);
        assert_eq!(result.text, "https://b.com");
        assert_eq!(result.weighted_length, 23);
    }

    // ========================================================================
    // Options
    // ========================================================================

    #[test]
    fn test_custom_ascii_ellipsis_weighs_one() {
        let options = ValidateOptions {
            limit: 10,
            ellipsis: '~',
            debug: false,
        };
        let result = truncate_detailed(&"x".repeat(20), &options).unwrap();
        assert_eq!(result.text, format!("{}~", "x".repeat(9)));
        assert_eq!(result.weighted_length, 10);
    }

    #[test]
    fn test_idempotent() {
        for (text, limit) in [
            (format!("{} {LINK}", "a".repeat(270)), 280),
            ("あ".repeat(150), 280),
            ("hello world again".to_string(), 10),
            (LINK.to_string(), 5),
        ] {
            let once = truncate(&text, limit).unwrap();
            assert_eq!(truncate(&once, limit).unwrap(), once);
        }
    }
}
