//! Build-description elements.
//!
//! The build description hands items to this crate as elements: a name in a
//! namespace, named attributes, and ordered children that are either nested
//! elements or text. This is the minimal element model the item entities
//! need — read a named attribute or same-namespace child, and construct new
//! elements when an item has diverged from its parsed form. Reading and
//! writing the build-description file itself happens elsewhere.

use std::fmt;

/// The conventional namespace of build-description elements.
pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// An element of the build description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Element content: a nested element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data.
    Text(String),
}

impl Element {
    /// Create an empty element with the given name and namespace.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// The child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Set a named attribute, replacing any existing value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Read a named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Append a child element.
    pub fn add_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append a same-namespace child element containing only text.
    pub fn add_text_child(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let mut child = Self::new(name, self.namespace.clone());
        child.children.push(Node::Text(text.into()));
        self.children.push(Node::Element(child));
    }

    /// The first child element with the given name in this element's
    /// namespace.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|node| match node {
            Node::Element(e) if e.name == name && e.namespace == self.namespace => Some(e),
            _ => None,
        })
    }

    /// The concatenated text content of this element and its descendants.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(child) => child.collect_text(out),
            }
        }
    }

    /// Text value of a named same-namespace child, if present.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(Element::text)
    }

    /// Boolean value of a named same-namespace child, if present.
    ///
    /// Build descriptions spell booleans in assorted casings (`true`,
    /// `True`); text that is neither true nor false reads as absent.
    #[must_use]
    pub fn child_bool(&self, name: &str) -> Option<bool> {
        match self.child_text(name)?.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

/// Deterministic XML-shaped rendering, for diagnostics and tests. Namespace
/// declarations are not rendered; the on-disk build description is written
/// by its owning layer, not here.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{value}\"")?;
        }
        if self.children.is_empty() {
            return write!(f, " />");
        }
        write!(f, ">")?;
        for node in &self.children {
            match node {
                Node::Element(child) => write!(f, "{child}")?,
                Node::Text(text) => write!(f, "{text}")?,
            }
        }
        write!(f, "</{}>", self.name)
    }
}
