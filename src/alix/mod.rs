// ALIX - Structural Complexity Scoring for MathML
//
// ALIX counts occurrences of a closed set of MathML tags and combines them
// with a fixed weight table into a single scalar. Hosts use the score to
// decide how much visual or textual material to present for an expression.
//
// score = 100 × Σ count[tag] × weight[tag]

use crate::mathml::lookup::{ALIX_TAGS, ALIX_WEIGHTS};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;
use tracing::debug;

/// ALIX complexity score
pub type ComplexityScore = f64;

/// Per-tag occurrence counts for one fragment
///
/// The tag set is closed and every tag starts at zero. Counts are kept as
/// `f64`: a count that is not a number is still carried into the weighted
/// sum, where it turns the score into `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementCountTable {
    counts: [f64; ALIX_TAGS.len()],
}

impl ElementCountTable {
    /// Create a table with every tag of the closed set at zero
    pub fn new() -> Self {
        Self {
            counts: [0.0; ALIX_TAGS.len()],
        }
    }

    #[inline]
    fn index(tag: &str) -> Option<usize> {
        ALIX_TAGS.iter().position(|known| *known == tag)
    }

    /// Count one occurrence of `tag`.
    ///
    /// Returns `false` (and changes nothing) for tags outside the closed set.
    pub fn increment(&mut self, tag: &str) -> bool {
        match Self::index(tag) {
            Some(i) => {
                self.counts[i] += 1.0;
                true
            },
            None => false,
        }
    }

    /// Overwrite the count for `tag`; ignored for tags outside the closed set
    pub fn set(&mut self, tag: &str, count: f64) -> bool {
        match Self::index(tag) {
            Some(i) => {
                self.counts[i] = count;
                true
            },
            None => false,
        }
    }

    /// Count for `tag`, or `None` for tags outside the closed set
    pub fn get(&self, tag: &str) -> Option<f64> {
        Self::index(tag).map(|i| self.counts[i])
    }

    /// Iterate `(tag, count)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        ALIX_TAGS.iter().copied().zip(self.counts.iter().copied())
    }

    /// Sum of all counts
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }
}

impl Default for ElementCountTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tag ALIX weights
///
/// A process-wide constant; the standard table is the only one in use.
#[derive(Debug, Clone, Copy)]
pub struct WeightTable {
    weights: &'static phf::Map<&'static str, f64>,
}

impl WeightTable {
    /// The fixed ALIX weight table
    pub fn standard() -> Self {
        Self {
            weights: &ALIX_WEIGHTS,
        }
    }

    /// Weight of `tag`; zero for tags outside the closed set
    #[inline]
    pub fn weight(&self, tag: &str) -> f64 {
        self.weights.get(tag).copied().unwrap_or(0.0)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Combine counts and weights into an ALIX score.
///
/// A tag contributes `count × weight` when its count is positive, when its
/// count is not a number, or when its weight is positive. The last case adds
/// zero for a zero count but is part of the inclusion rule all the same.
///
/// # Example
/// ```
/// use mathalt::alix::{ElementCountTable, WeightTable, score};
///
/// let mut counts = ElementCountTable::new();
/// counts.set("mn", 2.0);
/// counts.set("mo", 1.0);
/// let alix = score(&counts, &WeightTable::standard());
/// assert!((alix - 7.0).abs() < 1e-9);
/// ```
pub fn score(counts: &ElementCountTable, weights: &WeightTable) -> ComplexityScore {
    let mut sum = 0.0;
    for (tag, count) in counts.iter() {
        let weight = weights.weight(tag);
        if count > 0.0 || count.is_nan() || weight > 0.0 {
            sum += count * weight;
        }
    }
    sum * 100.0
}

/// Count the closed-set tags occurring in a fragment.
///
/// Prefixes are ignored (`m:mi` counts as `mi`). Counting is total: if the
/// markup turns out to be malformed, the walk stops and the counts gathered
/// up to that point are returned.
pub fn count_elements(fragment: &str) -> ElementCountTable {
    let mut table = ElementCountTable::new();
    let mut reader = Reader::from_str(fragment);
    reader.config_mut().check_end_names = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if let Ok(name) = std::str::from_utf8(e.local_name().as_ref()) {
                    table.increment(name);
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!(
                    position = reader.buffer_position(),
                    error = %e,
                    "stopped counting elements in malformed markup"
                );
                break;
            },
            _ => {},
        }
    }

    table
}

/// Count and score a fragment with the standard weight table
pub fn complexity(fragment: &str) -> ComplexityScore {
    score(&count_elements(fragment), &WeightTable::standard())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_reference_score() {
        let mut counts = ElementCountTable::new();
        counts.set("mn", 2.0);
        counts.set("mo", 1.0);
        assert!(approx(score(&counts, &WeightTable::standard()), 7.0));
    }

    #[test]
    fn test_empty_table_scores_zero() {
        assert_eq!(score(&ElementCountTable::new(), &WeightTable::standard()), 0.0);
    }

    #[test]
    fn test_nan_count_propagates() {
        let mut counts = ElementCountTable::new();
        counts.set("mn", f64::NAN);
        assert!(score(&counts, &WeightTable::standard()).is_nan());
    }

    #[test]
    fn test_structural_tags_weigh_nothing() {
        let mut counts = ElementCountTable::new();
        counts.set("mrow", 40.0);
        counts.set("mtd", 12.0);
        assert_eq!(score(&counts, &WeightTable::standard()), 0.0);
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        let mut counts = ElementCountTable::new();
        assert!(!counts.increment("semantics"));
        assert!(!counts.set("annotation", 3.0));
        assert_eq!(counts.get("semantics"), None);
        assert_eq!(counts.total(), 0.0);
    }

    #[test]
    fn test_count_elements() {
        let counts = count_elements(
            "<math><mrow><mn>1</mn><mo>+</mo><mfrac><mn>2</mn><mi>x</mi></mfrac></mrow></math>",
        );
        assert_eq!(counts.get("mn"), Some(2.0));
        assert_eq!(counts.get("mo"), Some(1.0));
        assert_eq!(counts.get("mi"), Some(1.0));
        assert_eq!(counts.get("mfrac"), Some(1.0));
        assert_eq!(counts.get("mrow"), Some(1.0));
        assert_eq!(counts.total(), 6.0);
    }

    #[test]
    fn test_count_elements_with_prefix() {
        let counts = count_elements(
            r#"<m:math xmlns:m="http://www.w3.org/1998/Math/MathML"><m:msqrt><m:mn>4</m:mn></m:msqrt><m:mspace/></m:math>"#,
        );
        assert_eq!(counts.get("msqrt"), Some(1.0));
        assert_eq!(counts.get("mn"), Some(1.0));
    }

    #[test]
    fn test_complexity_of_fragment() {
        // 2 × mn + 1 × mo
        let alix = complexity("<math><mn>1</mn><mo>+</mo><mn>2</mn></math>");
        assert!(approx(alix, 7.0));

        // mfrac + 2 × mn
        let alix = complexity("<mfrac><mn>1</mn><mn>2</mn></mfrac>");
        assert!(approx(alix, 22.0));
    }

    #[test]
    fn test_malformed_markup_keeps_partial_counts() {
        let counts = count_elements("<math><mn>1</mn><mo>+<</math>");
        assert_eq!(counts.get("mn"), Some(1.0));
        assert!(score(&counts, &WeightTable::standard()) >= 1.0 - 1e-9);
    }

    #[test]
    fn test_iter_is_in_table_order() {
        let tags: Vec<_> = ElementCountTable::new().iter().map(|(tag, _)| tag).collect();
        assert_eq!(tags, ALIX_TAGS);
    }
}
