//! A single compiled schema document

use super::{AttributeId, ElementId, ItemKind, SchemaId, SchemaItem, TypeId};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashMap;

type CacheKey = (ItemKind, String, Option<String>);

/// One compiled schema: the name tables for its own target namespace plus
/// the outgoing links the resolver walks.
///
/// Links are ordered and may repeat a target; each carries the namespace
/// key it was registered under (`None` for positional appends). The lookup
/// cache is interior-mutable so resolution can memoize through shared
/// references.
#[derive(Debug, Default)]
pub struct Schema {
    target_namespace: Option<String>,
    elements_qualified: bool,
    attributes_qualified: bool,
    doc: Option<String>,
    types: IndexMap<String, TypeId>,
    elements: IndexMap<String, ElementId>,
    groups: IndexMap<String, ElementId>,
    attributes: IndexMap<String, AttributeId>,
    attribute_groups: IndexMap<String, AttributeId>,
    links: Vec<(Option<String>, SchemaId)>,
    cache: RefCell<HashMap<CacheKey, SchemaItem>>,
}

impl Schema {
    /// Create an empty schema for `target_namespace`
    pub fn new(target_namespace: Option<String>) -> Self {
        Self {
            target_namespace,
            ..Self::default()
        }
    }

    /// The schema's target namespace, if any
    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    /// Set the target namespace
    pub fn set_target_namespace(&mut self, namespace: Option<String>) {
        self.target_namespace = namespace;
    }

    /// Whether `elementFormDefault` is `qualified`
    pub fn elements_qualified(&self) -> bool {
        self.elements_qualified
    }

    /// Set element qualification
    pub fn set_elements_qualified(&mut self, qualified: bool) {
        self.elements_qualified = qualified;
    }

    /// Whether `attributeFormDefault` is `qualified`
    pub fn attributes_qualified(&self) -> bool {
        self.attributes_qualified
    }

    /// Set attribute qualification
    pub fn set_attributes_qualified(&mut self, qualified: bool) {
        self.attributes_qualified = qualified;
    }

    /// Schema-level documentation
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Set schema-level documentation
    pub fn set_doc(&mut self, doc: String) {
        self.doc = Some(doc);
    }

    /// Named types, in declaration order
    pub fn types(&self) -> &IndexMap<String, TypeId> {
        &self.types
    }

    /// Register a named type
    pub fn add_type(&mut self, name: String, type_: TypeId) {
        self.types.insert(name, type_);
    }

    /// Top-level elements, in declaration order
    pub fn elements(&self) -> &IndexMap<String, ElementId> {
        &self.elements
    }

    /// Register a top-level element
    pub fn add_element(&mut self, name: String, element: ElementId) {
        self.elements.insert(name, element);
    }

    /// Named element groups, in declaration order
    pub fn groups(&self) -> &IndexMap<String, ElementId> {
        &self.groups
    }

    /// Register a named element group
    pub fn add_group(&mut self, name: String, group: ElementId) {
        self.groups.insert(name, group);
    }

    /// Top-level attributes, in declaration order
    pub fn attributes(&self) -> &IndexMap<String, AttributeId> {
        &self.attributes
    }

    /// Register a top-level attribute
    pub fn add_attribute(&mut self, name: String, attribute: AttributeId) {
        self.attributes.insert(name, attribute);
    }

    /// Named attribute groups, in declaration order
    pub fn attribute_groups(&self) -> &IndexMap<String, AttributeId> {
        &self.attribute_groups
    }

    /// Register a named attribute group
    pub fn add_attribute_group(&mut self, name: String, group: AttributeId) {
        self.attribute_groups.insert(name, group);
    }

    /// Outgoing links in registration order, with their namespace keys
    pub fn links(&self) -> &[(Option<String>, SchemaId)] {
        &self.links
    }

    /// The keyed link registered under `namespace`, if any
    pub fn keyed_link(&self, namespace: &str) -> Option<SchemaId> {
        self.links
            .iter()
            .find(|(key, _)| key.as_deref() == Some(namespace))
            .map(|(_, id)| *id)
    }

    /// Append a positional link
    pub fn add_link(&mut self, target: SchemaId) {
        self.links.push((None, target));
    }

    /// Append a link registered under a namespace key
    pub fn add_keyed_link(&mut self, namespace: String, target: SchemaId) {
        self.links.push((Some(namespace), target));
    }

    /// Look up a name in this schema's own tables
    pub fn local_item(&self, kind: ItemKind, name: &str) -> Option<SchemaItem> {
        match kind {
            ItemKind::Type => self.types.get(name).copied().map(SchemaItem::Type),
            ItemKind::Element => self.elements.get(name).copied().map(SchemaItem::Element),
            ItemKind::Group => self.groups.get(name).copied().map(SchemaItem::Group),
            ItemKind::Attribute => self.attributes.get(name).copied().map(SchemaItem::Attribute),
            ItemKind::AttributeGroup => self
                .attribute_groups
                .get(name)
                .copied()
                .map(SchemaItem::AttributeGroup),
        }
    }

    /// Consult the lookup memoization cache
    pub fn cached(&self, kind: ItemKind, name: &str, namespace: Option<&str>) -> Option<SchemaItem> {
        self.cache
            .borrow()
            .get(&(kind, name.to_string(), namespace.map(str::to_string)))
            .copied()
    }

    /// Record a successful lookup in the memoization cache
    pub fn remember(&self, kind: ItemKind, name: &str, namespace: Option<&str>, item: SchemaItem) {
        self.cache.borrow_mut().insert(
            (kind, name.to_string(), namespace.map(str::to_string)),
            item,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_item_per_table() {
        let mut schema = Schema::new(Some("urn:test".into()));
        schema.add_type("color".into(), TypeId(1));
        schema.add_element("color".into(), ElementId(2));

        assert_eq!(
            schema.local_item(ItemKind::Type, "color"),
            Some(SchemaItem::Type(TypeId(1)))
        );
        assert_eq!(
            schema.local_item(ItemKind::Element, "color"),
            Some(SchemaItem::Element(ElementId(2)))
        );
        assert_eq!(schema.local_item(ItemKind::Group, "color"), None);
    }

    #[test]
    fn test_cache_round_trip() {
        let schema = Schema::new(None);
        assert_eq!(schema.cached(ItemKind::Type, "t", Some("urn:a")), None);
        schema.remember(ItemKind::Type, "t", Some("urn:a"), SchemaItem::Type(TypeId(9)));
        assert_eq!(
            schema.cached(ItemKind::Type, "t", Some("urn:a")),
            Some(SchemaItem::Type(TypeId(9)))
        );
        assert_eq!(schema.cached(ItemKind::Type, "t", None), None);
    }

    #[test]
    fn test_keyed_link_lookup() {
        let mut schema = Schema::new(None);
        schema.add_link(SchemaId(0));
        schema.add_keyed_link("urn:b".into(), SchemaId(1));
        assert_eq!(schema.keyed_link("urn:b"), Some(SchemaId(1)));
        assert_eq!(schema.keyed_link("urn:c"), None);
        assert_eq!(schema.links().len(), 2);
    }
}
