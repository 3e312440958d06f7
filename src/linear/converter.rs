// Linear-text converter implementation
//
// Walks the parsed fragment once. An element whose shape is in the rule
// table is replaced by its linear form; any other element contributes the
// concatenated conversion of its children, which is how unsupported shapes
// degrade to their leaf text. Unbalanced tags are recovered by the lenient
// parser; input that cannot be tokenized at all falls back to a textual
// pass that maps operator glyphs and strips every tag.

use super::LinearText;
use super::rules::apply_first;
use crate::mathml::lookup::OPERATOR_GLYPHS;
use crate::mathml::{Element, Node, parse_fragment_lenient};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

static OPERATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:m:)?mo(?:\s[^>]*)?>([^<]*)</(?:m:)?mo\s*>").expect("valid pattern")
});

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid pattern"));

/// Converter from MathML fragments to linear (ASCII-math) text
///
/// Keeps its output buffer between conversions to avoid reallocating for
/// every fragment.
#[derive(Debug)]
pub struct LinearConverter {
    buffer: String,
}

impl LinearConverter {
    /// Create a converter with a default buffer capacity
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a converter with a custom initial buffer capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Convert a fragment to linear text.
    ///
    /// Never fails. Malformed markup degrades to its concatenated leaf text;
    /// only markup that converts to nothing comes back as
    /// [`LinearText::Unavailable`].
    pub fn convert(&mut self, fragment: &str) -> LinearText {
        self.buffer.clear();

        match parse_fragment_lenient(fragment) {
            Ok(nodes) => {
                for node in &nodes {
                    self.write_node(node);
                }
            },
            Err(e) => {
                debug!(error = %e, "converting untokenizable fragment as plain text");
                self.write_stripped(fragment);
            },
        }

        self.buffer.retain(|c| !c.is_whitespace());
        if self.buffer.is_empty() {
            LinearText::Unavailable
        } else {
            LinearText::Converted(self.buffer.clone())
        }
    }

    /// Capacity of the retained output buffer
    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    fn write_stripped(&mut self, fragment: &str) {
        let operators = OPERATOR.replace_all(fragment, |caps: &Captures| {
            let content = &caps[1];
            OPERATOR_GLYPHS
                .get(content.trim())
                .copied()
                .unwrap_or(content)
                .to_string()
        });
        self.buffer.push_str(&ANY_TAG.replace_all(&operators, ""));
    }

    fn write_node(&mut self, node: &Node) {
        match node {
            Node::Text(text) => self.buffer.push_str(text),
            Node::Element(element) => self.write_element(element),
        }
    }

    fn write_element(&mut self, element: &Element) {
        match apply_first(element) {
            Some(linear) => self.buffer.push_str(&linear),
            None => {
                for child in &element.children {
                    self.write_node(child);
                }
            },
        }
    }
}

impl Default for LinearConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(xml: &str) -> String {
        LinearConverter::new().convert(xml).as_str().to_string()
    }

    #[test]
    fn test_reference_shapes() {
        assert_eq!(linear("<mfrac><mn>1</mn><mn>2</mn></mfrac>"), "1/2");
        assert_eq!(linear("<msup><mi>x</mi><mn>2</mn></msup>"), "x^2");
        assert_eq!(linear("<msqrt><mn>4</mn></msqrt>"), "sqrt(4)");
    }

    #[test]
    fn test_expression_in_math_root() {
        let xml = r#"<math xmlns="http://www.w3.org/1998/Math/MathML">
            <mrow>
                <msup><mi>x</mi><mn>2</mn></msup>
                <mo>+</mo>
                <mfrac><mn>1</mn><mn>2</mn></mfrac>
                <mo>=</mo>
                <mn>3</mn>
            </mrow>
        </math>"#;
        assert_eq!(linear(xml), "x^2+1/2=3");
    }

    #[test]
    fn test_prefixed_markup() {
        let xml = r#"<m:math xmlns:m="http://www.w3.org/1998/Math/MathML"><m:msub><m:mi>a</m:mi><m:mn>1</m:mn></m:msub></m:math>"#;
        assert_eq!(linear(xml), "a_1");
    }

    #[test]
    fn test_unrecognized_shape_degrades_to_leaf_text() {
        let xml = "<math><msup><mrow><mo>(</mo><mi>a</mi><mo>+</mo><mi>b</mi><mo>)</mo></mrow>\
                   <mfrac><mn>1</mn><mn>2</mn></mfrac></msup></math>";
        assert_eq!(linear(xml), "(a+b)1/2");
    }

    #[test]
    fn test_deeply_nested_unknown_shape() {
        let xml = "<math><munderover><mo>&#x2211;</mo><mrow><mi>i</mi><mo>=</mo><mn>1</mn></mrow>\
                   <mi>n</mi></munderover><mtable><mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr></mtable></math>";
        assert_eq!(linear(xml), "&#x2211;i=1nab");
    }

    #[test]
    fn test_unknown_operator_keeps_raw_text() {
        assert_eq!(linear("<mrow><mi>a</mi><mo>&#x2062;</mo><mi>b</mi></mrow>"), "a&#x2062;b");
    }

    #[test]
    fn test_whitespace_is_removed() {
        assert_eq!(linear("<mtext>for all  x</mtext>"), "forallx");
    }

    #[test]
    fn test_unbalanced_markup_degrades_to_leaf_text() {
        assert_eq!(linear("<mi>x</mn>"), "x");
        assert_eq!(linear("<math><mfrac><mn>1</mn><mn>2</mn></math>"), "12");
        assert_eq!(linear("<math><mi>x</mi><mo>&lt;</mo><mn>1</mn>"), "x&lt;1");
        // Complete shapes inside an unclosed root still convert.
        assert_eq!(linear("<math><msup><mi>x</mi><mn>2</mn></msup>"), "x^2");
    }

    #[test]
    fn test_untokenizable_markup_is_stripped() {
        assert_eq!(linear("<mi>a</mi> & <mi>b</mi>"), "a&b");
        assert_eq!(linear("<mo>&#x2212;</mo><mn>2</mn> & <mn>1</mn>"), "-2&1");
    }

    #[test]
    fn test_tags_only_markup_is_unavailable() {
        assert_eq!(LinearConverter::new().convert("<math><mrow>"), LinearText::Unavailable);
        assert_eq!(LinearConverter::new().convert("<mrow> & </mrow>").as_str(), "&");
    }

    #[test]
    fn test_empty_markup_is_unavailable() {
        assert!(!LinearConverter::new().convert("<math></math>").is_available());
        assert!(!LinearConverter::new().convert("").is_available());
    }

    #[test]
    fn test_converter_is_reusable() {
        let mut converter = LinearConverter::new();
        assert_eq!(converter.convert("<mn>1</mn>").as_str(), "1");
        assert_eq!(converter.convert("<mi>y</mi>").as_str(), "y");
    }

    #[test]
    fn test_buffer_grows_and_is_kept() {
        let mut converter = LinearConverter::with_capacity(4);
        let long = format!("<mtext>{}</mtext>", "w".repeat(1000));
        assert_eq!(converter.convert(&long).as_str().len(), 1000);
        let grown = converter.buffer_capacity();
        assert!(grown >= 1000);
        converter.convert("<mn>1</mn>");
        assert_eq!(converter.buffer_capacity(), grown);
    }
}
