//! Document tree consumed by the translator.
//!
//! A post body is parsed once into an owned tree of [`Node`]s and then only
//! read. Child order is the document order; attribute names are unique per
//! element and keep their source order so raw passthrough re-serializes them
//! as written.

mod parse;
mod serialize;

pub use parse::parse_root;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Decoded text (entities already resolved).
    Text(String),
    /// Comment body without the `<!--` / `-->` delimiters.
    Comment(String),
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, keeping keys unique.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attrs(&self) -> bool {
        !self.attrs.is_empty()
    }

    /// Iterate over direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First direct child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.name == name)
    }

    /// Check whether any descendant element has the given tag name.
    pub fn contains(&self, name: &str) -> bool {
        self.child_elements()
            .any(|e| e.name == name || e.contains(name))
    }
}

impl Node {
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Tag whose presence forces subordinate headings one level deeper.
const LEVEL_THREE_HEADING: &str = "h3";

/// Scan a document once for level-3 headings.
///
/// When a post already uses `h3`, its `h4`/`h5` headings are demoted one
/// extra level so both kinds keep a consistent hierarchy.
pub fn needs_header_demotion(root: &Element) -> bool {
    root.contains(LEVEL_THREE_HEADING)
}

#[cfg(test)]
impl Element {
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .map(|child| match child {
                Node::Text(t) => t.clone(),
                Node::Element(e) => e.text_content(),
                Node::Comment(_) => String::new(),
            })
            .collect()
    }
}
