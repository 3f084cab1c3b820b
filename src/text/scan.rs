use std::ops::Range;

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use super::links::{find_urls, UrlSpan};
use super::weight::{classify_cluster, WeightClass};

/// Unit counts per weight class for one scanned text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeightBreakdown {
    /// Grapheme clusters weighing 1
    pub standard: usize,
    /// Grapheme clusters weighing 2
    pub wide: usize,
    /// URL spans, 23 each
    pub urls: usize,
}

impl WeightBreakdown {
    pub fn count(&self, class: WeightClass) -> usize {
        match class {
            WeightClass::Standard => self.standard,
            WeightClass::Wide => self.wide,
            WeightClass::Url => self.urls,
        }
    }

    /// Weighted contribution of a single class (count × class weight).
    pub fn weighted(&self, class: WeightClass) -> usize {
        self.count(class) * class.weight()
    }

    /// Sum of every class contribution.
    pub fn total(&self) -> usize {
        [WeightClass::Standard, WeightClass::Wide, WeightClass::Url]
            .into_iter()
            .map(|class| self.weighted(class))
            .sum()
    }

    fn record(&mut self, class: WeightClass) {
        match class {
            WeightClass::Standard => self.standard += 1,
            WeightClass::Wide => self.wide += 1,
            WeightClass::Url => self.urls += 1,
        }
    }
}

/// One counted unit: a grapheme cluster or a whole URL span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanUnit {
    pub range: Range<usize>,
    pub class: WeightClass,
}

impl ScanUnit {
    pub fn weight(&self) -> usize {
        self.class.weight()
    }

    pub fn is_whitespace(&self, text: &str) -> bool {
        text[self.range.clone()].chars().all(char::is_whitespace)
    }
}

/// Result of a single pass over already-normalized text.
///
/// `units` tile the text exactly: consecutive, non-overlapping, covering
/// every byte, in order.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub units: Vec<ScanUnit>,
    pub urls: Vec<UrlSpan>,
    pub breakdown: WeightBreakdown,
}

impl Scan {
    pub fn total(&self) -> usize {
        self.breakdown.total()
    }
}

/// Walks `text` once, weighing URLs first and then every remaining
/// grapheme cluster. Accepts any input; empty text yields an empty scan.
pub fn scan(text: &str) -> Scan {
    let urls = find_urls(text);
    let mut units = Vec::with_capacity(text.len());
    let mut breakdown = WeightBreakdown::default();
    let mut pos = 0;

    for span in &urls {
        push_clusters(text, pos..span.range.start, &mut units, &mut breakdown);
        breakdown.record(WeightClass::Url);
        units.push(ScanUnit {
            range: span.range.clone(),
            class: WeightClass::Url,
        });
        pos = span.range.end;
    }
    push_clusters(text, pos..text.len(), &mut units, &mut breakdown);

    Scan {
        units,
        urls,
        breakdown,
    }
}

fn push_clusters(
    text: &str,
    gap: Range<usize>,
    units: &mut Vec<ScanUnit>,
    breakdown: &mut WeightBreakdown,
) {
    let from = gap.start;
    for (offset, cluster) in text[gap].grapheme_indices(true) {
        let class = classify_cluster(cluster);
        breakdown.record(class);
        let start = from + offset;
        units.push(ScanUnit {
            range: start..start + cluster.len(),
            class,
        });
    }
}

/// Weighted length of `text` exactly as given, without normalization.
pub fn measure(text: &str) -> usize {
    scan(text).total()
}
