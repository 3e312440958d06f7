// Cache key derivation
//
// key = normalize(fragment) + KEY_SEPARATOR + canonical(scoring configuration)

use crate::mathml::normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separator between the normalized fragment and the configuration.
/// NUL cannot occur in XML text, so the two halves never run together.
pub const KEY_SEPARATOR: char = '\u{0}';

/// Threshold above which the image rendering is suppressed
pub const SUPPRESS_IMAGE_ABOVE: &str = "suppress_image_above";

/// Threshold below which the text rendering is suppressed
pub const SUPPRESS_TEXT_BELOW: &str = "suppress_text_below";

/// Named numeric thresholds supplied with a request
///
/// Part of the cache key: the same fragment under different thresholds can
/// lead to different presentation decisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringConfiguration {
    thresholds: BTreeMap<String, f64>,
}

impl ScoringConfiguration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a threshold, builder style
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.thresholds.insert(name.into(), value);
        self
    }

    /// Set or replace a threshold
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.thresholds.insert(name.into(), value);
    }

    /// Look up a threshold
    pub fn get(&self, name: &str) -> Option<f64> {
        self.thresholds.get(name).copied()
    }

    /// Threshold above which images are suppressed
    pub fn suppress_image_above(&self) -> Option<f64> {
        self.get(SUPPRESS_IMAGE_ABOVE)
    }

    /// Threshold below which text is suppressed
    pub fn suppress_text_below(&self) -> Option<f64> {
        self.get(SUPPRESS_TEXT_BELOW)
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Deterministic serialization: `"name"=value` pairs in name order,
    /// joined by `;`. Insertion order never matters.
    ///
    /// Names are quoted with `"`, `\` and NUL escaped, so no name can
    /// imitate a separator. Zero is written without a sign, matching
    /// `0.0 == -0.0`.
    pub fn canonical(&self) -> String {
        let mut out = String::with_capacity(self.thresholds.len() * 24);
        let mut buffer = ryu::Buffer::new();
        for (i, (name, value)) in self.thresholds.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            push_quoted(&mut out, name);
            out.push('=');
            let value = if *value == 0.0 { 0.0 } else { *value };
            out.push_str(buffer.format(value));
        }
        out
    }
}

fn push_quoted(out: &mut String, name: &str) {
    out.push('"');
    for c in name.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0}' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

impl FromIterator<(String, f64)> for ScoringConfiguration {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            thresholds: iter.into_iter().collect(),
        }
    }
}

/// Cache key for a fragment under a scoring configuration
///
/// # Example
/// ```
/// use mathalt::cache::{ScoringConfiguration, cache_key};
///
/// let loose = ScoringConfiguration::new().with("suppress_image_above", 50.0);
/// let strict = ScoringConfiguration::new().with("suppress_image_above", 10.0);
/// assert_ne!(cache_key("<mn>1</mn>", &loose), cache_key("<mn>1</mn>", &strict));
/// ```
pub fn cache_key(fragment: &str, config: &ScoringConfiguration) -> String {
    let normalized = normalize(fragment);
    let canonical = config.canonical();
    let mut key = String::with_capacity(normalized.len() + 1 + canonical.len());
    key.push_str(&normalized);
    key.push(KEY_SEPARATOR);
    key.push_str(&canonical);
    key
}
