//! Type variants: simple types, complex types, complex types with simple
//! content

use super::inheritance::{Extension, Restriction};
use super::{AttributeId, ElementId, SchemaId, TypeId};

/// State shared by every type variant
#[derive(Debug, Clone)]
pub struct TypeCommon {
    schema: SchemaId,
    /// `None` for anonymous (inline) types, which are owned exclusively by
    /// the item that declares them and never placed in a name table
    name: Option<String>,
    doc: String,
    abstract_: bool,
    restriction: Option<Restriction>,
    extension: Option<Extension>,
}

impl TypeCommon {
    fn new(schema: SchemaId, name: Option<String>) -> Self {
        Self {
            schema,
            name,
            doc: String::new(),
            abstract_: false,
            restriction: None,
            extension: None,
        }
    }
}

/// A simple type: restriction, union or list
#[derive(Debug, Clone)]
pub struct SimpleType {
    common: TypeCommon,
    unions: Vec<TypeId>,
    list: Option<TypeId>,
}

impl SimpleType {
    /// Create a skeleton simple type
    pub fn new(schema: SchemaId, name: Option<String>) -> Self {
        Self {
            common: TypeCommon::new(schema, name),
            unions: Vec::new(),
            list: None,
        }
    }

    /// Append a union member type
    pub fn add_union(&mut self, member: TypeId) {
        self.unions.push(member);
    }

    /// Ordered union member types
    pub fn unions(&self) -> &[TypeId] {
        &self.unions
    }

    /// The list item type, if this is a list type
    pub fn list(&self) -> Option<TypeId> {
        self.list
    }

    /// Set the list item type
    pub fn set_list(&mut self, item: TypeId) {
        self.list = Some(item);
    }
}

/// A complex type with element content: attribute members plus an ordered
/// set of child particles
#[derive(Debug, Clone)]
pub struct ComplexType {
    common: TypeCommon,
    attributes: Vec<AttributeId>,
    elements: Vec<ElementId>,
}

impl ComplexType {
    /// Create a skeleton complex type
    pub fn new(schema: SchemaId, name: Option<String>) -> Self {
        Self {
            common: TypeCommon::new(schema, name),
            attributes: Vec::new(),
            elements: Vec::new(),
        }
    }
}

/// A complex type whose content model is simple (`simpleContent`), so it
/// carries attributes but no child particles
#[derive(Debug, Clone)]
pub struct ComplexTypeSimpleContent {
    common: TypeCommon,
    attributes: Vec<AttributeId>,
}

impl ComplexTypeSimpleContent {
    /// Create a skeleton simple-content complex type
    pub fn new(schema: SchemaId, name: Option<String>) -> Self {
        Self {
            common: TypeCommon::new(schema, name),
            attributes: Vec::new(),
        }
    }
}

/// A compiled type: the closed set of variants
#[derive(Debug, Clone)]
pub enum TypeNode {
    /// A simple type
    Simple(SimpleType),
    /// A complex type with element content
    Complex(ComplexType),
    /// A complex type with simple content
    ComplexSimpleContent(ComplexTypeSimpleContent),
}

impl TypeNode {
    fn common(&self) -> &TypeCommon {
        match self {
            TypeNode::Simple(t) => &t.common,
            TypeNode::Complex(t) => &t.common,
            TypeNode::ComplexSimpleContent(t) => &t.common,
        }
    }

    fn common_mut(&mut self) -> &mut TypeCommon {
        match self {
            TypeNode::Simple(t) => &mut t.common,
            TypeNode::Complex(t) => &mut t.common,
            TypeNode::ComplexSimpleContent(t) => &mut t.common,
        }
    }

    /// The owning schema
    pub fn schema(&self) -> SchemaId {
        self.common().schema
    }

    /// The type's name; `None` for anonymous types
    pub fn name(&self) -> Option<&str> {
        self.common().name.as_deref()
    }

    /// Documentation text
    pub fn doc(&self) -> &str {
        &self.common().doc
    }

    /// Set the documentation text
    pub fn set_doc(&mut self, doc: String) {
        self.common_mut().doc = doc;
    }

    /// Whether the type is declared `abstract`
    pub fn is_abstract(&self) -> bool {
        self.common().abstract_
    }

    /// Set the `abstract` flag
    pub fn set_abstract(&mut self, abstract_: bool) {
        self.common_mut().abstract_ = abstract_;
    }

    /// The restriction derivation, if any
    pub fn restriction(&self) -> Option<&Restriction> {
        self.common().restriction.as_ref()
    }

    /// Set the restriction derivation
    pub fn set_restriction(&mut self, restriction: Restriction) {
        self.common_mut().restriction = Some(restriction);
    }

    /// The extension derivation, if any
    pub fn extension(&self) -> Option<&Extension> {
        self.common().extension.as_ref()
    }

    /// Set the extension derivation
    pub fn set_extension(&mut self, extension: Extension) {
        self.common_mut().extension = Some(extension);
    }

    /// The parent type: the restriction base if one is set, else the
    /// extension base
    pub fn parent(&self) -> Option<TypeId> {
        self.restriction()
            .and_then(Restriction::base)
            .or_else(|| self.extension().and_then(Extension::base))
    }

    /// Attribute members (empty for simple types)
    pub fn attributes(&self) -> &[AttributeId] {
        match self {
            TypeNode::Simple(_) => &[],
            TypeNode::Complex(t) => &t.attributes,
            TypeNode::ComplexSimpleContent(t) => &t.attributes,
        }
    }

    /// Append an attribute member; `false` when the variant cannot hold
    /// attributes (simple types)
    pub fn add_attribute(&mut self, attribute: AttributeId) -> bool {
        match self {
            TypeNode::Simple(_) => false,
            TypeNode::Complex(t) => {
                t.attributes.push(attribute);
                true
            }
            TypeNode::ComplexSimpleContent(t) => {
                t.attributes.push(attribute);
                true
            }
        }
    }

    /// Ordered child particles (empty unless element-bearing complex)
    pub fn elements(&self) -> &[ElementId] {
        match self {
            TypeNode::Complex(t) => &t.elements,
            _ => &[],
        }
    }

    /// Append a child particle; `false` when the variant has no element
    /// content
    pub fn add_element(&mut self, element: ElementId) -> bool {
        match self {
            TypeNode::Complex(t) => {
                t.elements.push(element);
                true
            }
            _ => false,
        }
    }

    /// View as a simple type
    pub fn as_simple(&self) -> Option<&SimpleType> {
        match self {
            TypeNode::Simple(t) => Some(t),
            _ => None,
        }
    }

    /// View as a simple type, mutably
    pub fn as_simple_mut(&mut self) -> Option<&mut SimpleType> {
        match self {
            TypeNode::Simple(t) => Some(t),
            _ => None,
        }
    }

    /// Whether this is a complex variant (either content model)
    pub fn is_complex(&self) -> bool {
        matches!(self, TypeNode::Complex(_) | TypeNode::ComplexSimpleContent(_))
    }
}
