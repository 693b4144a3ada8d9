//! Attribute items: definitions, local declarations and groups

use super::elements::Item;
use super::{AttributeId, SchemaId};

/// A top-level named attribute declaration
#[derive(Debug, Clone)]
pub struct AttributeDef {
    /// Shared item state
    pub item: Item,
}

impl AttributeDef {
    /// Create a skeleton top-level attribute
    pub fn new(schema: SchemaId, name: impl Into<String>) -> Self {
        Self {
            item: Item::new(schema, name),
        }
    }
}

/// A local attribute declaration. Attribute references resolve to the
/// referenced [`AttributeDef`] directly and add it to the container.
#[derive(Debug, Clone)]
pub struct LocalAttribute {
    /// Shared item state
    pub item: Item,
    /// The `use` attribute verbatim (`optional`, `required`, `prohibited`)
    pub use_: Option<String>,
    /// Whether references must be namespace-qualified
    pub qualified: bool,
    /// Whether the declaration accepts `xsi:nil`
    pub nil: bool,
    /// Whether the declaration is nested rather than top-level
    pub local: bool,
}

impl LocalAttribute {
    /// Create a skeleton local attribute
    pub fn new(schema: SchemaId, name: impl Into<String>) -> Self {
        Self {
            item: Item::new(schema, name),
            use_: None,
            qualified: false,
            nil: false,
            local: false,
        }
    }
}

/// A named, reusable set of attribute declarations
#[derive(Debug, Clone)]
pub struct AttributeGroup {
    schema: SchemaId,
    name: String,
    /// Documentation text
    pub doc: String,
    attributes: Vec<AttributeId>,
}

impl AttributeGroup {
    /// Create a skeleton attribute group
    pub fn new(schema: SchemaId, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
            doc: String::new(),
            attributes: Vec::new(),
        }
    }

    /// The owning schema
    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    /// The group's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered member attributes
    pub fn attributes(&self) -> &[AttributeId] {
        &self.attributes
    }

    /// Append a member attribute
    pub fn add_attribute(&mut self, attribute: AttributeId) {
        self.attributes.push(attribute);
    }
}

/// An attribute item: the closed set of variants
#[derive(Debug, Clone)]
pub enum AttributeNode {
    /// Top-level named attribute
    Def(AttributeDef),
    /// Local attribute declaration
    Local(LocalAttribute),
    /// Named attribute group
    Group(AttributeGroup),
}

impl AttributeNode {
    /// Whether the declaration is nested rather than top-level
    pub fn is_local(&self) -> bool {
        match self {
            AttributeNode::Local(a) => a.local,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_keeps_member_order() {
        let mut group = AttributeGroup::new(SchemaId(0), "specialAttrs");
        group.add_attribute(AttributeId(2));
        group.add_attribute(AttributeId(0));
        assert_eq!(group.attributes(), &[AttributeId(2), AttributeId(0)]);
    }

    #[test]
    fn test_def_is_not_local() {
        let def = AttributeNode::Def(AttributeDef::new(SchemaId(0), "lang"));
        assert!(!def.is_local());
    }
}
