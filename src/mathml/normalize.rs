// Canonical normalization of MathML fragments
//
// The rewrite steps run in a fixed order: prefix stripping has to happen
// before declaration removal so the declarations can be matched textually,
// and the namespace check has to see the fragment after both removals.

use memchr::memmem;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Canonical MathML namespace URI injected into fragments that declare none
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Legacy namespace prefix stripped from element names
pub const LEGACY_PREFIX: &str = "m";

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid pattern"));

static INTER_TAG_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").expect("valid pattern"));

static PREFIXED_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)(?:m:)+").expect("valid pattern"));

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").expect("valid pattern"));

static LEGACY_NS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s+xmlns:m\s*=\s*(?:"[^"]*"|'[^']*')"#).expect("valid pattern")
});

static DEFAULT_NS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s+xmlns\s*=\s*(?:"[^"]*"|'[^']*')"#).expect("valid pattern")
});

static ROOT_TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[A-Za-z_][\w.:\-]*").expect("valid pattern"));

static SPACE_BEFORE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+>").expect("valid pattern"));

/// Normalize a MathML fragment into its canonical key form.
///
/// Two fragments that differ only in whitespace layout, use of the legacy
/// `m:` prefix, or where (and whether) the namespace is declared produce the
/// same output. Input that does not look like markup passes through the
/// steps that do not apply. `normalize(normalize(x)) == normalize(x)`.
///
/// # Example
/// ```
/// use mathalt::mathml::normalize;
///
/// let prefixed = normalize(r#"<m:math xmlns:m="http://www.w3.org/1998/Math/MathML"> <m:mn>1</m:mn> </m:math>"#);
/// let plain = normalize(r#"<math xmlns="http://www.w3.org/1998/Math/MathML"><mn>1</mn></math>"#);
/// assert_eq!(prefixed, plain);
/// ```
pub fn normalize(fragment: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(fragment, " ");
    let joined = INTER_TAG_SPACE.replace_all(&collapsed, "><");
    let trimmed = joined.trim();

    let unprefixed = strip_legacy_prefixes(trimmed);

    // Declarations are only removed inside tags, never from character data.
    let undeclared = TAG.replace_all(&unprefixed, |caps: &Captures| {
        strip_declarations(&caps[0])
    });

    let declared = if memmem::find(undeclared.as_bytes(), b"xmlns").is_none() {
        ROOT_TAG_NAME
            .replace(&undeclared, |caps: &Captures| {
                format!("{} xmlns=\"{}\"", &caps[0], MATHML_NAMESPACE)
            })
            .into_owned()
    } else {
        undeclared.into_owned()
    };

    SPACE_BEFORE_CLOSE.replace_all(&declared, ">").into_owned()
}

/// Strip `m:` from opening and closing tags until none remain.
fn strip_legacy_prefixes(text: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(text);
    while PREFIXED_TAG.is_match(&current) {
        current = Cow::Owned(PREFIXED_TAG.replace_all(&current, "<$1").into_owned());
    }
    current
}

/// Remove `xmlns:m` declarations, then bare `xmlns` declarations, from one tag.
fn strip_declarations(tag: &str) -> String {
    let legacy_free = LEGACY_NS_DECL.replace_all(tag, "");
    DEFAULT_NS_DECL.replace_all(&legacy_free, "").into_owned()
}
