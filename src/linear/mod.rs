// Linear Text Module - MathML to ASCII-math Conversion
//
// Converts a MathML fragment into a flat notation string (`x^2`, `1/2`,
// `sqrt(4)`) for assistive technology. The converter supports a finite set
// of structural shapes, tried in a fixed priority order:
//
// 1. `msubsup` over leaves             → `b_s^p`
// 2. `mfrac` over a leaf fraction      → `a/(b/c)`
// 3. `mfrac` over leaves               → `a/b`
// 4. `msub` over leaves                → `b_s`
// 5. `msup` over leaves                → `b^p`
// 6. `msqrt`/`mroot`, leaf or `a+b`    → `sqrt(…)`
// 7. `mo` with a known glyph           → the glyph
// 8. `mn`/`mi`                         → their text
//
// Anything else has its tags stripped and its content concatenated, then
// all whitespace is removed.

mod converter;
/// Structural rewrite rules and their priority
pub mod rules;

pub use converter::LinearConverter;
pub use rules::{RULE_PRIORITY, Rule};

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

thread_local! {
    static CONVERTER: RefCell<LinearConverter> = RefCell::new(LinearConverter::new());
}

/// Outcome of a linear-text conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinearText {
    /// A non-empty linear form
    Converted(String),
    /// No confident linear form for this fragment
    Unavailable,
}

impl LinearText {
    /// The linear form, or `""` when unavailable
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            LinearText::Converted(text) => text,
            LinearText::Unavailable => "",
        }
    }

    /// Whether a linear form was produced
    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, LinearText::Converted(_))
    }

    /// The linear form as an `Option`
    pub fn into_option(self) -> Option<String> {
        match self {
            LinearText::Converted(text) => Some(text),
            LinearText::Unavailable => None,
        }
    }
}

impl std::fmt::Display for LinearText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a MathML fragment to linear text
///
/// Uses a converter kept per thread, so its buffer is reused across calls.
///
/// # Example
/// ```
/// use mathalt::linear::to_linear_text;
///
/// assert_eq!(to_linear_text("<mfrac><mn>1</mn><mn>2</mn></mfrac>").as_str(), "1/2");
/// assert_eq!(to_linear_text("<msqrt><mn>4</mn></msqrt>").as_str(), "sqrt(4)");
/// ```
pub fn to_linear_text(fragment: &str) -> LinearText {
    CONVERTER.with(|converter| converter.borrow_mut().convert(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_reads_as_empty() {
        assert_eq!(LinearText::Unavailable.as_str(), "");
        assert_eq!(LinearText::Unavailable.to_string(), "");
        assert_eq!(LinearText::Unavailable.into_option(), None);
    }

    #[test]
    fn test_converted() {
        let text = to_linear_text("<msup><mi>x</mi><mn>2</mn></msup>");
        assert!(text.is_available());
        assert_eq!(text.to_string(), "x^2");
        assert_eq!(text.into_option().as_deref(), Some("x^2"));
    }

    #[test]
    fn test_repeated_calls_share_the_thread_converter() {
        assert_eq!(to_linear_text("<mfrac><mn>1</mn><mn>2</mn></mfrac>").as_str(), "1/2");
        assert_eq!(to_linear_text("<mn>7</mn>").as_str(), "7");
        let capacity = CONVERTER.with(|converter| converter.borrow().buffer_capacity());
        assert!(capacity >= 256);

        let handle = std::thread::spawn(|| to_linear_text("<msqrt><mn>4</mn></msqrt>"));
        assert_eq!(handle.join().unwrap().as_str(), "sqrt(4)");
    }

    #[test]
    fn test_priority_order_is_specific_first() {
        let position = |rule| RULE_PRIORITY.iter().position(|r| *r == rule).unwrap();
        assert!(position(Rule::SubSup) < position(Rule::Sub));
        assert!(position(Rule::NestedFraction) < position(Rule::Fraction));
        assert!(position(Rule::Root) < position(Rule::Operator));
        assert_eq!(RULE_PRIORITY.last(), Some(&Rule::Leaf));
    }
}
