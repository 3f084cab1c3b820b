//! Platform weight table for post length counting.
//!
//! The table mirrors the platform's published counting configuration: a short
//! list of code point ranges weigh 1, everything else weighs 2, and every URL
//! counts as a fixed 23 regardless of its literal length. Corrections to the
//! table belong here; the scanner only ever asks [`classify_char`].
use serde::Serialize;

/// Default weighted-length ceiling for a single post.
pub const DEFAULT_LIMIT: usize = 280;

/// Weight contributed by every detected URL span.
pub const URL_WEIGHT: usize = 23;

/// Truncation marker appended when text is cut.
pub const ELLIPSIS: char = '\u{2026}';

/// Inclusive code point ranges that weigh 1.
const STANDARD_RANGES: &[(u32, u32)] = &[
    (0x0000, 0x10FF), // Latin, Greek, Cyrillic, Hebrew, Arabic, ... Georgian
    (0x2000, 0x200D), // Spaces and joiners
    (0x2010, 0x201F), // Dashes and quotation marks
    (0x2032, 0x2037), // Primes
];

/// Classification of a scanned unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightClass {
    /// Weight 1: ASCII and the other ranges in the standard table.
    Standard,
    /// Weight 2: CJK, emoji and everything outside the standard table.
    Wide,
    /// A whole URL span, weight 23.
    Url,
}

impl WeightClass {
    /// Weight contributed by one unit of this class.
    pub const fn weight(self) -> usize {
        match self {
            WeightClass::Standard => 1,
            WeightClass::Wide => 2,
            WeightClass::Url => URL_WEIGHT,
        }
    }
}

/// Classifies a single code point against the standard range table.
pub fn classify_char(c: char) -> WeightClass {
    let cp = c as u32;
    if STANDARD_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&cp))
    {
        WeightClass::Standard
    } else {
        WeightClass::Wide
    }
}

/// Classifies an extended grapheme cluster by its leading code point.
///
/// A multi-code-point emoji sequence or a base letter with combining marks
/// is a single unit, so it contributes the weight of its base exactly once.
pub fn classify_cluster(cluster: &str) -> WeightClass {
    cluster
        .chars()
        .next()
        .map(classify_char)
        .unwrap_or(WeightClass::Standard)
}
