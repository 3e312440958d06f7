use phf::phf_map;

/// The closed set of tags ALIX scores, in reporting order.
pub const ALIX_TAGS: [&str; 18] = [
    "mrow",
    "mtr",
    "mtd",
    "mn",
    "mtext",
    "mi",
    "mo",
    "mfenced",
    "msub",
    "msup",
    "munder",
    "mover",
    "mfrac",
    "msqrt",
    "mroot",
    "msubsup",
    "munderover",
    "mtable",
];

/// ALIX per-tag weights
pub static ALIX_WEIGHTS: phf::Map<&'static str, f64> = phf_map! {
    // Structural wrappers
    "mrow" => 0.0,
    "mtr" => 0.0,
    "mtd" => 0.0,

    // Leaf content
    "mn" => 0.01,
    "mtext" => 0.02,
    "mi" => 0.03,
    "mo" => 0.05,
    "mfenced" => 0.09,

    // Scripts and fractions
    "msub" => 0.15,
    "msup" => 0.15,
    "munder" => 0.15,
    "mover" => 0.15,
    "mfrac" => 0.2,

    // Roots, combined scripts and tables
    "msqrt" => 0.25,
    "mroot" => 0.3,
    "msubsup" => 0.3,
    "munderover" => 0.3,
    "mtable" => 0.5,
};

/// Operator glyphs recognized by the linear-text converter, keyed by the raw
/// `<mo>` content (entity references are kept unresolved by the tree parser).
pub static OPERATOR_GLYPHS: phf::Map<&'static str, &'static str> = phf_map! {
    // Plus
    "+" => "+",
    "&#43;" => "+",
    "&#x2B;" => "+",
    "&plus;" => "+",

    // Minus
    "-" => "-",
    "\u{2212}" => "-",
    "&#x2212;" => "-",
    "&#8722;" => "-",
    "&minus;" => "-",

    // Equals
    "=" => "=",
    "&#61;" => "=",
    "&#x3D;" => "=",
    "&equals;" => "=",

    // Parentheses
    "(" => "(",
    "&#40;" => "(",
    "&#x28;" => "(",
    "&lpar;" => "(",
    ")" => ")",
    "&#41;" => ")",
    "&#x29;" => ")",
    "&rpar;" => ")",

    // Times
    "\u{00D7}" => "\u{00D7}",
    "&#215;" => "\u{00D7}",
    "&#xD7;" => "\u{00D7}",
    "&#x00D7;" => "\u{00D7}",
    "&times;" => "\u{00D7}",

    // Divide
    "\u{00F7}" => "\u{00F7}",
    "&#247;" => "\u{00F7}",
    "&#xF7;" => "\u{00F7}",
    "&#x00F7;" => "\u{00F7}",
    "&divide;" => "\u{00F7}",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_table_covers_closed_tag_set() {
        assert_eq!(ALIX_WEIGHTS.len(), ALIX_TAGS.len());
        for tag in ALIX_TAGS {
            let weight = ALIX_WEIGHTS.get(tag).copied();
            assert!(matches!(weight, Some(w) if w >= 0.0), "missing weight for {tag}");
        }
    }

    fn weight(tag: &str) -> f64 {
        ALIX_WEIGHTS.get(tag).copied().unwrap_or(f64::NAN)
    }

    #[test]
    fn test_weight_bands() {
        for tag in ["mrow", "mtr", "mtd"] {
            assert_eq!(weight(tag), 0.0);
        }
        for tag in ["mn", "mtext", "mi", "mo", "mfenced"] {
            assert!((0.01..=0.09).contains(&weight(tag)));
        }
        for tag in ["msub", "msup", "mfrac"] {
            assert!((0.15..=0.2).contains(&weight(tag)));
        }
        for tag in ["msqrt", "mroot", "msubsup", "mtable"] {
            assert!((0.25..=0.5).contains(&weight(tag)));
        }
    }

    #[test]
    fn test_entity_glyphs() {
        assert_eq!(OPERATOR_GLYPHS.get("&#x2212;"), Some(&"-"));
        assert_eq!(OPERATOR_GLYPHS.get("&times;"), Some(&"\u{00D7}"));
        assert_eq!(OPERATOR_GLYPHS.get("&divide;"), Some(&"\u{00F7}"));
        assert_eq!(OPERATOR_GLYPHS.get("&#x2062;"), None);
    }
}
