// Shape rules for linear-text conversion
//
// Each rule recognizes one structural shape: an element name plus the exact
// kinds of its immediate children. Rules are tried in RULE_PRIORITY order so
// that the more specific nested shapes are seen before the generic ones.

use crate::mathml::Element;
use crate::mathml::lookup::OPERATOR_GLYPHS;
use smallvec::SmallVec;

/// A structural rewrite rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `<msubsup>` over three leaves → `b_s^p`
    SubSup,
    /// `<mfrac>` whose denominator is a leaf fraction → `a/(b/c)`
    NestedFraction,
    /// `<mfrac>` over two leaves → `a/b`
    Fraction,
    /// `<msub>` over two leaves → `b_s`
    Sub,
    /// `<msup>` over two leaves → `b^p`
    Sup,
    /// `<msqrt>` or single-argument `<mroot>` over a leaf or binary sum → `sqrt(…)`
    Root,
    /// `<mo>` holding a known glyph → the glyph
    Operator,
    /// `<mn>` or `<mi>` → its text
    Leaf,
}

/// Rules in the order they are tried
pub const RULE_PRIORITY: [Rule; 8] = [
    Rule::SubSup,
    Rule::NestedFraction,
    Rule::Fraction,
    Rule::Sub,
    Rule::Sup,
    Rule::Root,
    Rule::Operator,
    Rule::Leaf,
];

impl Rule {
    /// Linear form of `element` if it has this rule's shape
    pub fn apply(self, element: &Element) -> Option<String> {
        match self {
            Rule::SubSup => {
                if !element.is("msubsup") {
                    return None;
                }
                let [base, sub, sup] = leaf_args::<3>(element)?;
                Some(format!("{}_{}^{}", base, sub, sup))
            },
            Rule::NestedFraction => {
                if !element.is("mfrac") {
                    return None;
                }
                let [numerator, denominator] = element_args::<2>(element)?;
                let numerator = leaf(numerator)?;
                if !denominator.is("mfrac") {
                    return None;
                }
                let [inner_numerator, inner_denominator] = leaf_args::<2>(denominator)?;
                Some(format!("{}/({}/{})", numerator, inner_numerator, inner_denominator))
            },
            Rule::Fraction => {
                if !element.is("mfrac") {
                    return None;
                }
                let [numerator, denominator] = leaf_args::<2>(element)?;
                Some(format!("{}/{}", numerator, denominator))
            },
            Rule::Sub => {
                if !element.is("msub") {
                    return None;
                }
                let [base, sub] = leaf_args::<2>(element)?;
                Some(format!("{}_{}", base, sub))
            },
            Rule::Sup => {
                if !element.is("msup") {
                    return None;
                }
                let [base, sup] = leaf_args::<2>(element)?;
                Some(format!("{}^{}", base, sup))
            },
            Rule::Root => root_argument(element).map(|argument| format!("sqrt({})", argument)),
            Rule::Operator => {
                if !element.is("mo") {
                    return None;
                }
                operator_glyph(element).map(str::to_string)
            },
            Rule::Leaf => leaf(element).map(str::to_string),
        }
    }
}

/// First rule in priority order that matches `element`
pub fn apply_first(element: &Element) -> Option<String> {
    RULE_PRIORITY.iter().find_map(|rule| rule.apply(element))
}

/// Text of an `<mn>` or `<mi>` that holds only non-empty text
pub fn leaf(element: &Element) -> Option<&str> {
    if element.is("mn") || element.is("mi") {
        element.text().filter(|text| !text.trim().is_empty())
    } else {
        None
    }
}

/// Glyph of an `<mo>` whose content is in the operator table
pub fn operator_glyph(element: &Element) -> Option<&'static str> {
    element
        .text()
        .and_then(|text| OPERATOR_GLYPHS.get(text.trim()))
        .copied()
}

// Exactly N element children and no interleaved text.
fn element_args<const N: usize>(element: &Element) -> Option<[&Element; N]> {
    if element.has_text() {
        return None;
    }
    let children: SmallVec<[&Element; 4]> = element.elements().collect();
    <[&Element; N]>::try_from(children.as_slice()).ok()
}

// Exactly N children, every one a leaf.
fn leaf_args<const N: usize>(element: &Element) -> Option<[&str; N]> {
    let children = element_args::<N>(element)?;
    let mut texts: [&str; N] = [""; N];
    for (slot, child) in texts.iter_mut().zip(children) {
        *slot = leaf(child)?;
    }
    Some(texts)
}

// `a + b` over three sibling elements.
fn binary_sum(children: &[&Element]) -> Option<String> {
    match children {
        [left, plus, right] if operator_glyph(plus) == Some("+") && plus.is("mo") => {
            Some(format!("{}+{}", leaf(left)?, leaf(right)?))
        },
        _ => None,
    }
}

fn root_argument(element: &Element) -> Option<String> {
    let is_sqrt = element.is("msqrt");
    if !is_sqrt && !element.is("mroot") {
        return None;
    }
    if element.has_text() {
        return None;
    }
    let children: SmallVec<[&Element; 4]> = element.elements().collect();
    match children.as_slice() {
        [single] if single.is("mrow") && !single.has_text() => {
            let terms: SmallVec<[&Element; 4]> = single.elements().collect();
            binary_sum(&terms)
        },
        [single] => leaf(single).map(str::to_string),
        // `<msqrt>` wraps its content in an inferred row
        [_, _, _] if is_sqrt => binary_sum(&children),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mathml::{Node, parse_fragment};

    fn element(xml: &str) -> Element {
        match parse_fragment(xml).unwrap().into_iter().next() {
            Some(Node::Element(element)) => element,
            other => panic!("expected an element, got {:?}", other),
        }
    }

    #[test]
    fn test_subsup_all_leaf_combinations() {
        for (xml, expected) in [
            ("<msubsup><mi>x</mi><mn>1</mn><mn>2</mn></msubsup>", "x_1^2"),
            ("<msubsup><mi>x</mi><mi>i</mi><mn>2</mn></msubsup>", "x_i^2"),
            ("<msubsup><mi>x</mi><mn>1</mn><mi>n</mi></msubsup>", "x_1^n"),
            ("<msubsup><mi>x</mi><mi>i</mi><mi>n</mi></msubsup>", "x_i^n"),
        ] {
            assert_eq!(Rule::SubSup.apply(&element(xml)).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_nested_fraction_before_simple_fraction() {
        let frac = element("<mfrac><mn>1</mn><mfrac><mi>a</mi><mn>2</mn></mfrac></mfrac>");
        assert_eq!(Rule::Fraction.apply(&frac), None);
        assert_eq!(apply_first(&frac).as_deref(), Some("1/(a/2)"));
    }

    #[test]
    fn test_fraction_combinations() {
        for (xml, expected) in [
            ("<mfrac><mn>1</mn><mn>2</mn></mfrac>", "1/2"),
            ("<mfrac><mi>a</mi><mn>2</mn></mfrac>", "a/2"),
            ("<mfrac><mn>1</mn><mi>b</mi></mfrac>", "1/b"),
            ("<mfrac><mi>a</mi><mi>b</mi></mfrac>", "a/b"),
        ] {
            assert_eq!(apply_first(&element(xml)).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_scripts() {
        assert_eq!(apply_first(&element("<msub><mi>a</mi><mn>0</mn></msub>")).as_deref(), Some("a_0"));
        assert_eq!(apply_first(&element("<msup><mi>x</mi><mn>2</mn></msup>")).as_deref(), Some("x^2"));
    }

    #[test]
    fn test_roots() {
        for (xml, expected) in [
            ("<msqrt><mn>4</mn></msqrt>", "sqrt(4)"),
            ("<msqrt><mi>x</mi><mo>+</mo><mn>1</mn></msqrt>", "sqrt(x+1)"),
            ("<msqrt><mrow><mi>a</mi><mo>+</mo><mi>b</mi></mrow></msqrt>", "sqrt(a+b)"),
            ("<mroot><mrow><mi>a</mi><mo>+</mo><mi>b</mi></mrow></mroot>", "sqrt(a+b)"),
            ("<mroot><mn>8</mn></mroot>", "sqrt(8)"),
        ] {
            assert_eq!(apply_first(&element(xml)).as_deref(), Some(expected), "{xml}");
        }
    }

    #[test]
    fn test_unsupported_roots_do_not_match() {
        // Indexed root and a difference are outside the rule table.
        assert_eq!(Rule::Root.apply(&element("<mroot><mn>8</mn><mn>3</mn></mroot>")), None);
        assert_eq!(
            Rule::Root.apply(&element("<msqrt><mi>x</mi><mo>-</mo><mn>1</mn></msqrt>")),
            None
        );
    }

    #[test]
    fn test_operator_glyphs() {
        assert_eq!(apply_first(&element("<mo>&#x2212;</mo>")).as_deref(), Some("-"));
        assert_eq!(apply_first(&element("<mo>&times;</mo>")).as_deref(), Some("\u{00D7}"));
        assert_eq!(apply_first(&element("<mo>=</mo>")).as_deref(), Some("="));
        assert_eq!(apply_first(&element("<mo>&#x2062;</mo>")), None);
    }

    #[test]
    fn test_script_with_structured_base_does_not_match() {
        let sup = element("<msup><mrow><mi>x</mi></mrow><mn>2</mn></msup>");
        assert_eq!(apply_first(&sup), None);
    }

    #[test]
    fn test_mixed_text_does_not_match() {
        assert_eq!(apply_first(&element("<mfrac>q<mn>1</mn><mn>2</mn></mfrac>")), None);
    }

    #[test]
    fn test_empty_leaf_does_not_match() {
        assert_eq!(leaf(&element("<mi></mi>")), None);
        assert_eq!(apply_first(&element("<mfrac><mi/><mn>2</mn></mfrac>")), None);
    }
}
