//! Text normalization ahead of weighted counting.
//!
//! Candidate text arrives from summarizers and scraped feeds and routinely
//! carries zero-width characters, bidi marks, soft hyphens and stray
//! controls. None of them render, but all of them are counted by the
//! platform, so they are removed before anything is measured.
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

const ZERO_WIDTH_JOINER: char = '\u{200D}';

/// Inclusive ranges of format (Cf), separator (Zl/Zp) and private use code
/// points that are always removed.
const INVISIBLE_RANGES: &[(u32, u32)] = &[
    (0x00AD, 0x00AD),     // Soft hyphen
    (0x0600, 0x0605),     // Arabic number signs
    (0x061C, 0x061C),     // Arabic letter mark
    (0x06DD, 0x06DD),     // Arabic end of ayah
    (0x070F, 0x070F),     // Syriac abbreviation mark
    (0x0890, 0x0891),     // Arabic pound/piastre mark above
    (0x08E2, 0x08E2),     // Arabic disputed end of ayah
    (0x180E, 0x180E),     // Mongolian vowel separator
    (0x200B, 0x200C),     // ZWSP, ZWNJ
    (0x200E, 0x200F),     // LRM, RLM
    (0x2028, 0x2029),     // Line and paragraph separators
    (0x202A, 0x202E),     // Bidi embeddings and overrides
    (0x2060, 0x2064),     // Word joiner, invisible operators
    (0x2066, 0x206F),     // Bidi isolates, deprecated format chars
    (0xE000, 0xF8FF),     // Private use area
    (0xFEFF, 0xFEFF),     // BOM / zero width no-break space
    (0xFFF9, 0xFFFB),     // Interlinear annotation
    (0x110BD, 0x110BD),   // Kaithi number sign
    (0x110CD, 0x110CD),   // Kaithi number sign above
    (0x13430, 0x1343F),   // Egyptian hieroglyph format controls
    (0x1BCA0, 0x1BCA3),   // Shorthand format controls
    (0x1D173, 0x1D17A),   // Musical symbol format controls
    (0xE0001, 0xE0001),   // Language tag
    (0xF0000, 0xFFFFD),   // Supplementary private use area A
    (0x100000, 0x10FFFD), // Supplementary private use area B
];

/// Returns true for code points that carry no visible content and are
/// stripped unconditionally. The zero width joiner is handled separately.
pub fn is_invisible(c: char) -> bool {
    if c.is_control() {
        return !matches!(c, '\n' | '\r' | '\t');
    }
    let cp = c as u32;
    INVISIBLE_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&cp))
}

/// Removes invisible code points.
///
/// A zero width joiner survives only where it actually joins, as inside the
/// emoji sequence 👩‍💻. One left dangling at the end of a grapheme cluster
/// (between letters, after a flag, before a space) is dropped.
pub fn strip_invisible(s: &str) -> String {
    let visible: String = s.chars().filter(|&c| !is_invisible(c)).collect();
    if !visible.contains(ZERO_WIDTH_JOINER) {
        return visible;
    }

    let mut out = String::with_capacity(visible.len());
    for cluster in visible.graphemes(true) {
        out.push_str(cluster.trim_end_matches(ZERO_WIDTH_JOINER));
    }
    out
}

/// Collapses whitespace runs and trims both ends.
///
/// A run containing a line break becomes a single `\n`; any other run
/// becomes a single space.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending: Option<char> = None;

    for c in s.chars() {
        if c.is_whitespace() {
            let is_break = matches!(c, '\n' | '\r');
            pending = match pending {
                Some('\n') => Some('\n'),
                _ if is_break => Some('\n'),
                _ => Some(' '),
            };
            continue;
        }
        if let Some(ws) = pending.take() {
            if !out.is_empty() {
                out.push(ws);
            }
        }
        out.push(c);
    }

    out
}

/// Produces the canonical form of candidate post text.
///
/// Invisible code points are stripped first so that a mark hidden behind a
/// zero-width space still composes with its base, then the text is put in
/// NFC and whitespace is collapsed. The result is a fixed point:
/// `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let visible = strip_invisible(text);
    let composed: String = visible.nfc().collect();
    collapse_whitespace(&composed)
}
