//! Post text measurement and fitting.
//!
//! This module implements the platform's weighted character count and the
//! truncation that keeps posts under it:
//!
//! - **Normalization**: NFC composition, invisible character stripping and
//!   whitespace cleanup
//! - **Scanning**: URL detection and per-grapheme weighting into a breakdown
//! - **Validation**: limit checks with an optional diagnostic report
//! - **Truncation**: binary-searched, grapheme-safe cuts that keep a
//!   trailing link
//!
//! # Examples
//!
//! ```
//! use postfit::text::{truncate, validate};
//!
//! let post = format!("{}\nhttps://example.com/article", "あ".repeat(150));
//! let result = validate(&post, 280).unwrap();
//! assert!(!result.is_valid);
//!
//! let fitted = truncate(&post, 280).unwrap();
//! assert!(validate(&fitted, 280).unwrap().is_valid);
//! assert!(fitted.ends_with("…\nhttps://example.com/article"));
//! ```

mod compose;
mod error;
mod links;
mod normalize;
mod scan;
mod truncate;
mod validate;
mod weight;

pub use compose::compose_post;
pub use error::PostTextError;
pub use links::{find_urls, trailing_url, validate_link, UrlSpan};
pub use normalize::{is_invisible, normalize};
pub use scan::{measure, scan, Scan, ScanUnit, WeightBreakdown};
pub use truncate::{truncate, truncate_detailed, Truncation};
pub use validate::{
    is_too_long, validate, validate_with, weighted_length, Report, ValidateOptions,
    ValidationResult,
};
pub use weight::{
    classify_char, classify_cluster, WeightClass, DEFAULT_LIMIT, ELLIPSIS, URL_WEIGHT,
};
