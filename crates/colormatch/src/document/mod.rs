//! Utility module with a minimal, typed model of color-bearing documents.
//!
//! A document is a tree of [`Element`]s, each with a tag, insertion-ordered
//! [`Attributes`], and an ordered sequence of children. Only three kinds of
//! elements matter for colors, as determined by [`Element::kind`]:
//!
//!   * **color definitions** are elements tagged `color` whose attributes
//!     encode a white level or RGB components in a supported color space;
//!   * the **resource container** is the element tagged `resources` holding
//!     the document's named resources;
//!   * all other elements are **generic**.
//!
//! Color definitions are always enumerated in the same order: pre-order,
//! depth-first, children in document order, without descending into resource
//! containers. [`color_definitions`] and [`walk`] both implement that
//! traversal, which is what makes positional correspondence between extracted
//! colors and rewritten color definitions work.

mod colors;
mod xml;

pub use colors::{color_definitions, extract_colors, ColorDefinitions, ColorEncoding};
pub use xml::{DocumentSink, XmlWriter};

/// The tag of color elements.
pub const COLOR_TAG: &str = "color";

/// The tag of the resource container.
pub const RESOURCES_TAG: &str = "resources";

/// The tag of named color resources.
pub const NAMED_COLOR_TAG: &str = "namedColor";

/// The attribute linking an element to its parent's property.
pub const KEY_ATTRIBUTE: &str = "key";

/// The attribute naming a resource or referencing one.
pub const NAME_ATTRIBUTE: &str = "name";

// --------------------------------------------------------------------------------------------------------------------

/// An element's attributes.
///
/// Attributes preserve insertion order. Setting an existing attribute updates
/// its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create a new, empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Determine whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the value of the attribute with the given name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set the attribute with the given name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Remove the attribute with the given name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Retain only the attributes for which the predicate holds.
    pub fn retain<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.entries.retain(|(key, value)| predicate(key, value))
    }

    /// Iterate over the attribute names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}

// --------------------------------------------------------------------------------------------------------------------

/// The kind of an element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    /// A color definition with its encoded color.
    ColorDefinition(ColorEncoding),
    /// A resource container.
    ResourceContainer,
    /// Any other element, including color elements without a recognized
    /// encoding.
    Generic,
}

/// A document element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Attributes,
    children: Vec<Element>,
}

impl Element {
    /// Create a new element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Add the attribute to this element.
    #[must_use = "method returns the updated element"]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(name, value);
        self
    }

    /// Add the child to this element.
    #[must_use = "method returns the updated element"]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Get the tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Get the attributes for modification.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Replace all attributes.
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    /// Get the children.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Get the children for modification.
    pub fn children_mut(&mut self) -> &mut [Element] {
        &mut self.children
    }

    /// Append a child, returning a mutable reference to it.
    pub fn push(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let index = self.children.len() - 1;
        &mut self.children[index]
    }

    /// Find the first child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Find the first child with the given tag, creating one if necessary.
    pub fn child_or_insert(&mut self, tag: &str) -> &mut Element {
        match self.children.iter().position(|child| child.tag == tag) {
            Some(index) => &mut self.children[index],
            None => self.push(Element::new(tag)),
        }
    }

    /// Classify this element.
    pub fn kind(&self) -> NodeKind {
        if self.tag == RESOURCES_TAG {
            NodeKind::ResourceContainer
        } else if self.tag == COLOR_TAG {
            ColorEncoding::from_attributes(&self.attributes)
                .map_or(NodeKind::Generic, NodeKind::ColorDefinition)
        } else {
            NodeKind::Generic
        }
    }
}

// --------------------------------------------------------------------------------------------------------------------

/// A visitor of color definitions.
pub trait Visitor {
    /// The error type.
    type Error;

    /// Visit the color definition with the given encoding.
    fn visit_color(
        &mut self,
        element: &mut Element,
        encoding: ColorEncoding,
    ) -> Result<(), Self::Error>;

    /// Visit a color element without recognized encoding.
    ///
    /// Such elements are not color definitions. By default, they are ignored.
    fn skip_color(&mut self, element: &Element) {
        let _ = element;
    }
}

/// Walk the tree rooted in the element, visiting all color definitions.
///
/// The traversal is pre-order, depth-first, visits children in order, and
/// does not descend into resource containers. It stops with the first error.
pub fn walk<V>(element: &mut Element, visitor: &mut V) -> Result<(), V::Error>
where
    V: Visitor + ?Sized,
{
    match element.kind() {
        NodeKind::ResourceContainer => return Ok(()),
        NodeKind::ColorDefinition(encoding) => visitor.visit_color(element, encoding)?,
        NodeKind::Generic if element.tag == COLOR_TAG => visitor.skip_color(element),
        NodeKind::Generic => (),
    }

    for child in element.children.iter_mut() {
        walk(child, visitor)?;
    }

    Ok(())
}
