// MathML Module - Markup Handling Shared by the Pipeline
//
// This module owns everything that looks at raw MathML text:
//
// - **normalize**: canonical textual form used for identity and caching
// - **tree**: strict streaming parse into a small element tree
// - **lookup**: static tag, weight and operator glyph tables

/// Canonical normalization of MathML fragments
///
/// Produces a whitespace-, prefix- and namespace-placement-independent
/// string. The result is only ever compared for equality.
pub mod normalize;
/// MathML element tree
///
/// Parses a fragment with quick-xml into owned [`Node`]s, strictly or with
/// recovery from unbalanced tags, keeping entity references in their raw
/// `&name;` form.
pub mod tree;
/// Static lookup tables
///
/// Perfect-hash tables for ALIX weights and operator glyphs.
pub mod lookup;

pub use normalize::{LEGACY_PREFIX, MATHML_NAMESPACE, normalize};
pub use tree::{Element, MAX_DEPTH, Node, parse_fragment, parse_fragment_lenient};
