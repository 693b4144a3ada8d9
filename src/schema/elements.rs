//! Element items: definitions, local declarations, references and groups

use super::{ElementId, SchemaId, TypeId};

/// Sentinel for an unbounded `maxOccurs`
pub const UNBOUNDED: i32 = -1;

/// State shared by named element/attribute declarations: owning schema,
/// name, resolved type, documentation and value constraints
#[derive(Debug, Clone)]
pub struct Item {
    schema: SchemaId,
    name: String,
    type_: Option<TypeId>,
    doc: String,
    fixed: Option<String>,
    default: Option<String>,
}

impl Item {
    /// Create a skeleton item owned by `schema`
    pub fn new(schema: SchemaId, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
            type_: None,
            doc: String::new(),
            fixed: None,
            default: None,
        }
    }

    /// The owning schema (back-reference, not ownership)
    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    /// The declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved type, once pass 2 has bound it
    pub fn item_type(&self) -> Option<TypeId> {
        self.type_
    }

    /// Bind the resolved type
    pub fn set_type(&mut self, type_: TypeId) {
        self.type_ = Some(type_);
    }

    /// Documentation text
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Set the documentation text
    pub fn set_doc(&mut self, doc: String) {
        self.doc = doc;
    }

    /// The `fixed` value constraint, if declared
    pub fn fixed(&self) -> Option<&str> {
        self.fixed.as_deref()
    }

    /// Set the `fixed` value constraint
    pub fn set_fixed(&mut self, fixed: String) {
        self.fixed = Some(fixed);
    }

    /// The `default` value, if declared
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Set the `default` value
    pub fn set_default(&mut self, default: String) {
        self.default = Some(default);
    }
}

/// Occurrence bounds shared by every particle-bearing item.
///
/// `max == -1` means unbounded. The bounds are kept internally consistent:
/// `max == -1 || min <= max` holds after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    min: i32,
    max: i32,
}

impl Default for Occurs {
    fn default() -> Self {
        Self { min: 1, max: 1 }
    }
}

impl Occurs {
    /// Lower bound
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound, `-1` for unbounded
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Set the lower bound, raising `max` when it would fall below `min`
    pub fn set_min(&mut self, min: i32) {
        self.min = min;
        if self.max != UNBOUNDED && self.min > self.max {
            self.max = self.min;
        }
    }

    /// Set the upper bound (`-1` for unbounded)
    pub fn set_max(&mut self, max: i32) {
        self.max = max;
    }
}

/// Qualification and locality flags of a single element declaration
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementFlags {
    /// Whether references must be namespace-qualified
    pub qualified: bool,
    /// Whether the declaration is nested rather than top-level
    pub local: bool,
    /// Whether the element accepts `xsi:nil`
    pub nillable: bool,
}

/// A top-level named element declaration
#[derive(Debug, Clone)]
pub struct ElementDef {
    /// Shared item state
    pub item: Item,
}

impl ElementDef {
    /// Create a skeleton top-level element
    pub fn new(schema: SchemaId, name: impl Into<String>) -> Self {
        Self {
            item: Item::new(schema, name),
        }
    }
}

/// A local (inline) element declaration
#[derive(Debug, Clone)]
pub struct LocalElement {
    /// Shared item state
    pub item: Item,
    /// Occurrence bounds
    pub occurs: Occurs,
    /// Qualification/locality flags
    pub flags: ElementFlags,
}

impl LocalElement {
    /// Create a skeleton local element
    pub fn new(schema: SchemaId, name: impl Into<String>) -> Self {
        Self {
            item: Item::new(schema, name),
            occurs: Occurs::default(),
            flags: ElementFlags::default(),
        }
    }
}

/// A reference to an [`ElementDef`]: exposes the referenced definition's
/// name and type but carries its own occurrence bounds and flags
#[derive(Debug, Clone)]
pub struct ElementRef {
    /// The referenced top-level definition
    pub referenced: ElementId,
    /// The schema the reference appears in
    pub schema: SchemaId,
    /// Documentation on the referencing node
    pub doc: String,
    /// Occurrence bounds of the reference
    pub occurs: Occurs,
    /// Qualification/locality flags of the reference
    pub flags: ElementFlags,
}

impl ElementRef {
    /// Create a reference to `referenced`, appearing in `schema`
    pub fn new(schema: SchemaId, referenced: ElementId) -> Self {
        Self {
            referenced,
            schema,
            doc: String::new(),
            occurs: Occurs::default(),
            flags: ElementFlags::default(),
        }
    }
}

/// A named, reusable particle sequence: a container of element items
#[derive(Debug, Clone)]
pub struct ElementGroup {
    schema: SchemaId,
    name: String,
    /// Documentation text
    pub doc: String,
    elements: Vec<ElementId>,
}

impl ElementGroup {
    /// Create a skeleton group
    pub fn new(schema: SchemaId, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
            doc: String::new(),
            elements: Vec::new(),
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

    /// Ordered member particles
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Append a member particle
    pub fn add_element(&mut self, element: ElementId) {
        self.elements.push(element);
    }
}

/// An occurrence-bounded reference to an [`ElementGroup`]
#[derive(Debug, Clone)]
pub struct GroupRef {
    /// The referenced group (or a further reference to one)
    pub referenced: ElementId,
    /// Documentation on the referencing node
    pub doc: String,
    /// Occurrence bounds of the reference
    pub occurs: Occurs,
}

impl GroupRef {
    /// Create a reference to `referenced`
    pub fn new(referenced: ElementId) -> Self {
        Self {
            referenced,
            doc: String::new(),
            occurs: Occurs::default(),
        }
    }
}

/// An element item: the closed set of variants
#[derive(Debug, Clone)]
pub enum ElementNode {
    /// Top-level named element
    Def(ElementDef),
    /// Local (inline) element
    Local(LocalElement),
    /// Reference to a top-level element
    Ref(ElementRef),
    /// Named particle group
    Group(ElementGroup),
    /// Occurrence-bounded reference to a group
    GroupRef(GroupRef),
}

impl ElementNode {
    /// Occurrence bounds, for the variants that carry them
    pub fn occurs(&self) -> Option<&Occurs> {
        match self {
            ElementNode::Local(e) => Some(&e.occurs),
            ElementNode::Ref(e) => Some(&e.occurs),
            ElementNode::GroupRef(e) => Some(&e.occurs),
            _ => None,
        }
    }

    /// Occurrence bounds, mutably
    pub fn occurs_mut(&mut self) -> Option<&mut Occurs> {
        match self {
            ElementNode::Local(e) => Some(&mut e.occurs),
            ElementNode::Ref(e) => Some(&mut e.occurs),
            ElementNode::GroupRef(e) => Some(&mut e.occurs),
            _ => None,
        }
    }

    /// Whether the declaration is nested rather than top-level
    pub fn is_local(&self) -> bool {
        match self {
            ElementNode::Local(e) => e.flags.local,
            ElementNode::Ref(e) => e.flags.local,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurs_defaults() {
        let occurs = Occurs::default();
        assert_eq!(occurs.min(), 1);
        assert_eq!(occurs.max(), 1);
    }

    #[test]
    fn test_set_min_raises_max() {
        let mut occurs = Occurs::default();
        occurs.set_min(5);
        assert_eq!(occurs.min(), 5);
        assert_eq!(occurs.max(), 5);
    }

    #[test]
    fn test_set_min_keeps_unbounded_max() {
        let mut occurs = Occurs::default();
        occurs.set_max(UNBOUNDED);
        occurs.set_min(3);
        assert_eq!(occurs.min(), 3);
        assert_eq!(occurs.max(), UNBOUNDED);
    }

    #[test]
    fn test_top_level_def_is_not_local() {
        let def = ElementNode::Def(ElementDef::new(SchemaId(0), "order"));
        assert!(!def.is_local());
        assert!(def.occurs().is_none());
    }
}
