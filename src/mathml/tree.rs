use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Nesting limit for parsed fragments
pub const MAX_DEPTH: usize = 1000;

/// A node of a parsed MathML fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Element with its local (unprefixed) name
    Element(Element),
    /// Character data, with entity references kept as `&name;`
    Text(String),
}

/// A MathML element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Whether this element has the given local name
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Character content of an element whose only child is text
    pub fn text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Node::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// Child elements, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Whether the element has text children mixed in with elements
    pub fn has_text(&self) -> bool {
        self.children.iter().any(|child| matches!(child, Node::Text(_)))
    }
}

/// Parse a MathML fragment into a list of top-level nodes.
///
/// Element names are reduced to their local part, so `m:mfrac` and `mfrac`
/// parse identically. Entity and character references are not resolved;
/// they stay in the text as written (`&times;`, `&#x2212;`).
///
/// # Errors
/// Fails on XML that quick-xml rejects, on unclosed elements, and on nesting
/// deeper than [`MAX_DEPTH`].
pub fn parse_fragment(xml: &str) -> Result<Vec<Node>> {
    parse(xml, false)
}

/// Parse a fragment, recovering from unbalanced tags.
///
/// An element that is never closed, or that is closed implicitly by the end
/// tag of an ancestor, is dissolved: its children take its place in the
/// parent and its own tags are dropped. End tags that match no open element
/// are ignored.
///
/// # Errors
/// Fails only on input quick-xml cannot tokenize (a bare `&`, an unterminated
/// tag) and on nesting deeper than [`MAX_DEPTH`].
pub fn parse_fragment_lenient(xml: &str) -> Result<Vec<Node>> {
    parse(xml, true)
}

fn parse(xml: &str, lenient: bool) -> Result<Vec<Node>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    if lenient {
        reader.config_mut().check_end_names = false;
    }

    let mut stack: Vec<Element> = Vec::with_capacity(16);
    let mut roots = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::DepthLimitExceeded(MAX_DEPTH));
                }
                let name = std::str::from_utf8(e.local_name().as_ref())?.to_string();
                stack.push(Element::new(name));
            },
            Ok(Event::End(ref e)) if lenient => {
                let local = e.local_name();
                let name = std::str::from_utf8(local.as_ref())?;
                let Some(open) = stack.iter().rposition(|element| element.is(name)) else {
                    continue;
                };
                while stack.len() > open + 1 {
                    if let Some(unclosed) = stack.pop() {
                        dissolve(&mut stack, &mut roots, unclosed);
                    }
                }
                if let Some(done) = stack.pop() {
                    attach(&mut stack, &mut roots, Node::Element(done));
                }
            },
            Ok(Event::End(_)) => {
                let Some(done) = stack.pop() else {
                    return Err(Error::Malformed("closing tag without opening tag".to_string()));
                };
                attach(&mut stack, &mut roots, Node::Element(done));
            },
            Ok(Event::Empty(ref e)) => {
                let name = std::str::from_utf8(e.local_name().as_ref())?.to_string();
                attach(&mut stack, &mut roots, Node::Element(Element::new(name)));
            },
            Ok(Event::Text(ref e)) => {
                let text = std::str::from_utf8(e)?;
                push_text(&mut stack, &mut roots, text);
            },
            Ok(Event::CData(ref e)) => {
                let text = std::str::from_utf8(e)?;
                push_text(&mut stack, &mut roots, text);
            },
            Ok(Event::GeneralRef(ref e)) => {
                let name = std::str::from_utf8(e)?;
                push_text(&mut stack, &mut roots, &format!("&{};", name));
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "XML parsing error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            },
            _ => {}, // Comments, processing instructions, declarations
        }
    }

    if lenient {
        while let Some(unclosed) = stack.pop() {
            dissolve(&mut stack, &mut roots, unclosed);
        }
    } else if !stack.is_empty() {
        return Err(Error::Malformed(format!("{} unclosed element(s)", stack.len())));
    }

    Ok(roots)
}

// Move an unclosed element's children up into its parent.
fn dissolve(stack: &mut [Element], roots: &mut Vec<Node>, element: Element) {
    for child in element.children {
        match child {
            Node::Text(text) => push_text(stack, roots, &text),
            node => attach(stack, roots, node),
        }
    }
}

fn attach(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

// Adjacent text and references merge into one node so `<mo>&#x2212;</mo>`
// and `<mn>1&#x2009;000</mn>` both read back through `Element::text`.
fn push_text(stack: &mut [Element], roots: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => roots,
    };
    match siblings.last_mut() {
        Some(Node::Text(previous)) => previous.push_str(text),
        _ => siblings.push(Node::Text(text.to_string())),
    }
}
