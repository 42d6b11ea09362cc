//! Owned element tree produced by [`crate::parse_fragment`].
//!
//! All traversal here is iterative: an explicit stack of child iterators
//! replaces recursion, so walking a deep tree cannot exhaust the call stack.

use std::slice;

/// A node in the fragment tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data with entities already decoded
    Text(String),
}

/// An HTML element with lowercase name and decoded attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// A parsed HTML fragment: the sequence of top-level nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub children: Vec<Node>,
}

impl Fragment {
    /// Top-level elements in document order. Top-level text is not included.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Value of the first attribute called `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a declaration in the inline `style` attribute.
    ///
    /// Property names compare case-insensitively; a later declaration of the
    /// same property wins, as in CSS.
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.attr("style")?
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .filter(|(name, _)| name.trim().eq_ignore_ascii_case(property))
            .map(|(_, value)| value.trim())
            .last()
    }

    /// Direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// All nodes below this element in pre-order, excluding the element itself.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            stack: vec![self.children.iter()],
        }
    }

    /// All elements below this element in pre-order.
    pub fn descendants(&self) -> impl Iterator<Item = &Element> {
        self.nodes().filter_map(Node::as_element)
    }

    /// First descendant whose name is one of `names`.
    pub fn find(&self, names: &[&str]) -> Option<&Element> {
        self.descendants()
            .find(|el| names.contains(&el.name.as_str()))
    }

    /// This element if its name is one of `names`, otherwise the first matching descendant.
    pub fn find_self_or_descendant(&self, names: &[&str]) -> Option<&Element> {
        if names.contains(&self.name.as_str()) {
            Some(self)
        } else {
            self.find(names)
        }
    }

    /// Concatenated character data of every descendant text node.
    pub fn text_content(&self) -> String {
        self.nodes()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Pre-order iterator over descendant nodes.
pub struct Nodes<'a> {
    stack: Vec<slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(node) => {
                    if let Node::Element(el) = node {
                        self.stack.push(el.children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
