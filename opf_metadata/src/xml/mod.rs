//! A small ordered XML tree.
//!
//! OPF cares about things most generic XML trees throw away: the order
//! attributes were written in, the order repeated elements appear in, and
//! attribute namespace prefixes. This tree keeps all three, which is what
//! lets a document round-trip byte-for-byte.
//!
//! Children are grouped by tag name, since OPF addresses repeated elements
//! as a unit ("all the `dc:title` entries"). Group order is first-appearance
//! order; order inside a group is document order.

pub mod error;
pub mod read;
pub mod write;

pub use error::XmlError;
pub use read::parse;
pub use write::render;

/// One attribute, with its namespace prefix already split off.
///
/// The split happens once, at parse time: a name shaped like
/// `word-chars ':' non-space-chars` is treated as `namespace:name`, and
/// anything else is a bare attribute. Namespace declarations (`xmlns:dc`)
/// get no special treatment; they ride along like any other attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    /// The namespace prefix, like `opf` in `opf:role`.
    pub namespace: Option<String>,

    /// The attribute's name, without any prefix.
    pub name: String,

    /// The attribute's (unescaped) value.
    pub value: String,
}

impl Attribute {
    /// Makes an attribute from a possibly-prefixed name.
    pub fn new(qualified: &str, value: impl Into<String>) -> Self {
        match split_namespace(qualified) {
            Some((namespace, name)) => Attribute {
                namespace: Some(namespace.to_string()),
                name: name.to_string(),
                value: value.into(),
            },
            None => Attribute {
                namespace: None,
                name: qualified.to_string(),
                value: value.into(),
            },
        }
    }

    /// The name as it appears on the wire, prefix included.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}:{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Splits `prefix:name` into its parts.
///
/// The prefix must be word characters only, and the rest must be non-empty
/// with no whitespace. Anything else doesn't count as namespaced.
pub(crate) fn split_namespace(qualified: &str) -> Option<(&str, &str)> {
    let (prefix, rest) = qualified.split_once(':')?;

    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    if rest.is_empty() || rest.chars().any(char::is_whitespace) {
        return None;
    }

    Some((prefix, rest))
}

/// Children sharing one tag name, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildGroup {
    /// The (qualified) tag name, like `dc:title`.
    pub name: String,

    /// Every child with that name.
    pub elements: Vec<Element>,
}

/// One XML element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// The (qualified) tag name.
    pub name: String,

    /// Attributes, in written order.
    pub attributes: Vec<Attribute>,

    /// Text content, if any. Whitespace-only content doesn't count.
    pub text: Option<String>,

    /// Child elements, grouped by tag name.
    pub groups: Vec<ChildGroup>,
}

impl Element {
    /// Makes an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Element::default()
        }
    }

    /// Makes an element holding only text.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            text: Some(text.into()),
            ..Element::default()
        }
    }

    /// The element's text, or `""` when it has none.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Grabs an attribute's value by its qualified name.
    pub fn attr(&self, qualified: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.qualified_name() == qualified)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute, replacing an existing one of the same name or
    /// appending a new one at the end.
    pub fn set_attr(&mut self, qualified: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.qualified_name() == qualified)
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute::new(qualified, value)),
        }
    }

    /// Grabs the child group for a tag name.
    pub fn group(&self, name: &str) -> Option<&ChildGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Grabs the child group for a tag name, mutably.
    pub fn group_mut(&mut self, name: &str) -> Option<&mut ChildGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// All children with the given tag name, or `None` when there aren't
    /// any.
    pub fn children(&self, name: &str) -> Option<&[Element]> {
        self.group(name).map(|g| g.elements.as_slice())
    }

    /// Same as [`Element::children`], but mutable.
    pub fn children_mut(&mut self, name: &str) -> Option<&mut Vec<Element>> {
        self.group_mut(name).map(|g| &mut g.elements)
    }

    /// The first child with the given tag name.
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children(name).and_then(|c| c.first())
    }

    /// Replaces the whole child group for a tag name.
    ///
    /// An existing group keeps its position among the other groups; a new
    /// one is appended after them. An empty `elements` removes the group
    /// entirely, so a group never exists with nothing in it.
    pub fn set_children(&mut self, name: &str, elements: Vec<Element>) {
        if elements.is_empty() {
            self.remove_children(name);
            return;
        }

        match self.group_mut(name) {
            Some(group) => group.elements = elements,
            None => self.groups.push(ChildGroup {
                name: name.to_string(),
                elements,
            }),
        }
    }

    /// Drops the whole child group for a tag name, if present.
    pub fn remove_children(&mut self, name: &str) {
        self.groups.retain(|g| g.name != name);
    }

    /// Appends one child into its tag's group, creating the group at the
    /// end if this is the first child with that name.
    pub fn push_child(&mut self, child: Element) {
        match self.group_mut(&child.name) {
            Some(group) => group.elements.push(child),
            None => self.groups.push(ChildGroup {
                name: child.name.clone(),
                elements: vec![child],
            }),
        }
    }
}
