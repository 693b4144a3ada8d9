//! The arena owning every compiled entity, plus name resolution over the
//! schema graph

use super::{
    AttributeId, AttributeNode, ElementId, ElementNode, ItemKind, Occurs, Schema, SchemaId,
    SchemaItem, TypeId, TypeNode,
};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Where a compiled element particle gets attached
#[derive(Debug, Clone, Copy)]
pub enum ElementContainerId {
    /// A complex type's content model
    Type(TypeId),
    /// A named element group
    Element(ElementId),
}

/// Where a compiled attribute gets attached
#[derive(Debug, Clone, Copy)]
pub enum AttributeContainerId {
    /// A complex type's attribute set
    Type(TypeId),
    /// A named attribute group
    Attribute(AttributeId),
}

/// Arena owning all schemas, types, element items and attribute items.
///
/// Everything is addressed by typed index handles; handle equality is
/// entity identity, which is what the resolver's visited-set and the
/// import deduplication rely on.
#[derive(Debug, Default)]
pub struct SchemaSet {
    schemas: Vec<Schema>,
    types: Vec<TypeNode>,
    elements: Vec<ElementNode>,
    attributes: Vec<AttributeNode>,
}

impl SchemaSet {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a schema
    pub fn alloc_schema(&mut self, schema: Schema) -> SchemaId {
        self.schemas.push(schema);
        SchemaId(self.schemas.len() - 1)
    }

    /// Allocate a type
    pub fn alloc_type(&mut self, type_: TypeNode) -> TypeId {
        self.types.push(type_);
        TypeId(self.types.len() - 1)
    }

    /// Allocate an element item
    pub fn alloc_element(&mut self, element: ElementNode) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    /// Allocate an attribute item
    pub fn alloc_attribute(&mut self, attribute: AttributeNode) -> AttributeId {
        self.attributes.push(attribute);
        AttributeId(self.attributes.len() - 1)
    }

    /// Access a schema
    pub fn schema(&self, id: SchemaId) -> &Schema {
        &self.schemas[id.0]
    }

    /// Access a schema, mutably
    pub fn schema_mut(&mut self, id: SchemaId) -> &mut Schema {
        &mut self.schemas[id.0]
    }

    /// Access a type
    pub fn type_node(&self, id: TypeId) -> &TypeNode {
        &self.types[id.0]
    }

    /// Access a type, mutably
    pub fn type_node_mut(&mut self, id: TypeId) -> &mut TypeNode {
        &mut self.types[id.0]
    }

    /// Access an element item
    pub fn element_node(&self, id: ElementId) -> &ElementNode {
        &self.elements[id.0]
    }

    /// Access an element item, mutably
    pub fn element_node_mut(&mut self, id: ElementId) -> &mut ElementNode {
        &mut self.elements[id.0]
    }

    /// Access an attribute item
    pub fn attribute_node(&self, id: AttributeId) -> &AttributeNode {
        &self.attributes[id.0]
    }

    /// Access an attribute item, mutably
    pub fn attribute_node_mut(&mut self, id: AttributeId) -> &mut AttributeNode {
        &mut self.attributes[id.0]
    }

    /// Number of schemas allocated so far
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// All schema handles, in allocation order
    pub fn schema_ids(&self) -> impl Iterator<Item = SchemaId> {
        (0..self.schemas.len()).map(SchemaId)
    }

    /// Link `child` into `parent`, optionally under a namespace key.
    ///
    /// A keyed registration checks the child's target namespace against the
    /// key. When the parent already holds a schema under that key, the
    /// child chains into the existing schema instead of displacing it, so
    /// repeated imports of one namespace accumulate.
    pub fn add_schema(
        &mut self,
        parent: SchemaId,
        child: SchemaId,
        namespace: Option<&str>,
    ) -> Result<()> {
        if let Some(namespace) = namespace {
            let actual = self.schema(child).target_namespace().map(str::to_string);
            if actual.as_deref() != Some(namespace) {
                return Err(Error::NamespaceMismatch {
                    expected: namespace.to_string(),
                    actual,
                });
            }
            if let Some(existing) = self.schema(parent).keyed_link(namespace) {
                if existing != child {
                    self.add_schema(existing, child, None)?;
                }
                return Ok(());
            }
            self.schema_mut(parent)
                .add_keyed_link(namespace.to_string(), child);
            return Ok(());
        }

        self.schema_mut(parent).add_link(child);
        Ok(())
    }

    /// Resolve a name starting from `from`, walking links depth-first.
    ///
    /// Cycles between schemas are broken by a visited-set shared across the
    /// whole search. Successful lookups are memoized on every schema along
    /// the path, so later resolutions short-circuit.
    pub fn find_item(
        &self,
        from: SchemaId,
        kind: ItemKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Option<SchemaItem> {
        let mut visited = HashSet::new();
        self.find_in(from, kind, name, namespace, &mut visited)
    }

    fn find_in(
        &self,
        current: SchemaId,
        kind: ItemKind,
        name: &str,
        namespace: Option<&str>,
        visited: &mut HashSet<SchemaId>,
    ) -> Option<SchemaItem> {
        if !visited.insert(current) {
            return None;
        }

        let schema = self.schema(current);
        if let Some(item) = schema.cached(kind, name, namespace) {
            return Some(item);
        }

        if schema.target_namespace() == namespace {
            if let Some(item) = schema.local_item(kind, name) {
                schema.remember(kind, name, namespace, item);
                return Some(item);
            }
        }

        let links: Vec<SchemaId> = schema.links().iter().map(|(_, id)| *id).collect();
        for link in links {
            if visited.contains(&link) {
                continue;
            }
            if let Some(item) = self.find_in(link, kind, name, namespace, visited) {
                self.schema(current).remember(kind, name, namespace, item);
                return Some(item);
            }
        }

        None
    }

    fn not_found(kind: ItemKind, name: &str, namespace: Option<&str>) -> Error {
        Error::NotFound {
            kind: kind.as_str(),
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
        }
    }

    /// Resolve a named type
    pub fn find_type(
        &self,
        from: SchemaId,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<TypeId> {
        match self.find_item(from, ItemKind::Type, name, namespace) {
            Some(SchemaItem::Type(id)) => Ok(id),
            _ => Err(Self::not_found(ItemKind::Type, name, namespace)),
        }
    }

    /// Resolve a top-level element
    pub fn find_element(
        &self,
        from: SchemaId,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<ElementId> {
        match self.find_item(from, ItemKind::Element, name, namespace) {
            Some(SchemaItem::Element(id)) => Ok(id),
            _ => Err(Self::not_found(ItemKind::Element, name, namespace)),
        }
    }

    /// Resolve a named element group
    pub fn find_group(
        &self,
        from: SchemaId,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<ElementId> {
        match self.find_item(from, ItemKind::Group, name, namespace) {
            Some(SchemaItem::Group(id)) => Ok(id),
            _ => Err(Self::not_found(ItemKind::Group, name, namespace)),
        }
    }

    /// Resolve a top-level attribute
    pub fn find_attribute(
        &self,
        from: SchemaId,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<AttributeId> {
        match self.find_item(from, ItemKind::Attribute, name, namespace) {
            Some(SchemaItem::Attribute(id)) => Ok(id),
            _ => Err(Self::not_found(ItemKind::Attribute, name, namespace)),
        }
    }

    /// Resolve a named attribute group
    pub fn find_attribute_group(
        &self,
        from: SchemaId,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<AttributeId> {
        match self.find_item(from, ItemKind::AttributeGroup, name, namespace) {
            Some(SchemaItem::AttributeGroup(id)) => Ok(id),
            _ => Err(Self::not_found(ItemKind::AttributeGroup, name, namespace)),
        }
    }

    /// The effective name of an element item, following references
    pub fn element_name(&self, id: ElementId) -> Option<&str> {
        match self.element_node(id) {
            ElementNode::Def(e) => Some(e.item.name()),
            ElementNode::Local(e) => Some(e.item.name()),
            ElementNode::Ref(e) => self.element_name(e.referenced),
            ElementNode::Group(g) => Some(g.name()),
            ElementNode::GroupRef(g) => self.element_name(g.referenced),
        }
    }

    /// The effective type of an element item, following references
    pub fn element_type(&self, id: ElementId) -> Option<TypeId> {
        match self.element_node(id) {
            ElementNode::Def(e) => e.item.item_type(),
            ElementNode::Local(e) => e.item.item_type(),
            ElementNode::Ref(e) => self.element_type(e.referenced),
            _ => None,
        }
    }

    /// The member particles of a group item, following group references
    pub fn group_elements(&self, id: ElementId) -> &[ElementId] {
        match self.element_node(id) {
            ElementNode::Group(g) => g.elements(),
            ElementNode::GroupRef(g) => self.group_elements(g.referenced),
            _ => &[],
        }
    }

    /// The effective name of an attribute item
    pub fn attribute_name(&self, id: AttributeId) -> Option<&str> {
        match self.attribute_node(id) {
            AttributeNode::Def(a) => Some(a.item.name()),
            AttributeNode::Local(a) => Some(a.item.name()),
            AttributeNode::Group(g) => Some(g.name()),
        }
    }

    /// Mutable occurrence bounds of an element item, when it carries any
    pub fn element_occurs_mut(&mut self, id: ElementId) -> Option<&mut Occurs> {
        self.element_node_mut(id).occurs_mut()
    }

    /// Attach an element particle to its container
    pub fn add_element_to(&mut self, container: ElementContainerId, element: ElementId) {
        match container {
            ElementContainerId::Type(id) => {
                self.type_node_mut(id).add_element(element);
            }
            ElementContainerId::Element(id) => {
                if let ElementNode::Group(group) = self.element_node_mut(id) {
                    group.add_element(element);
                }
            }
        }
    }

    /// Attach an attribute to its container
    pub fn add_attribute_to(&mut self, container: AttributeContainerId, attribute: AttributeId) {
        match container {
            AttributeContainerId::Type(id) => {
                self.type_node_mut(id).add_attribute(attribute);
            }
            AttributeContainerId::Attribute(id) => {
                if let AttributeNode::Group(group) = self.attribute_node_mut(id) {
                    group.add_attribute(attribute);
                }
            }
        }
    }

    /// The schema an element container belongs to
    pub fn element_container_schema(&self, container: ElementContainerId) -> SchemaId {
        match container {
            ElementContainerId::Type(id) => self.type_node(id).schema(),
            ElementContainerId::Element(id) => match self.element_node(id) {
                ElementNode::Group(g) => g.schema(),
                ElementNode::Def(e) => e.item.schema(),
                ElementNode::Local(e) => e.item.schema(),
                ElementNode::Ref(e) => e.schema,
                ElementNode::GroupRef(g) => self.element_container_schema(
                    ElementContainerId::Element(g.referenced),
                ),
            },
        }
    }

    /// The schema an attribute container belongs to
    pub fn attribute_container_schema(&self, container: AttributeContainerId) -> SchemaId {
        match container {
            AttributeContainerId::Type(id) => self.type_node(id).schema(),
            AttributeContainerId::Attribute(id) => match self.attribute_node(id) {
                AttributeNode::Group(g) => g.schema(),
                AttributeNode::Def(a) => a.item.schema(),
                AttributeNode::Local(a) => a.item.schema(),
            },
        }
    }
}
