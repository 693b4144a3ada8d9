//! The compiled schema model
//!
//! Every compiled entity (schemas, types, element items, attribute items)
//! lives in a single arena, [`SchemaSet`], and is referenced by a copyable
//! typed handle. Handle identity is the identity used by the resolver's
//! visited-set, the memoization caches and import deduplication — schemas
//! form a graph with back-edges, and handles sidestep reference-cycle
//! ownership entirely.

mod attributes;
mod elements;
mod inheritance;
mod schemas;
mod set;
mod types;

pub use attributes::{AttributeDef, AttributeGroup, AttributeNode, LocalAttribute};
pub use elements::{
    ElementDef, ElementFlags, ElementGroup, ElementNode, ElementRef, GroupRef, Item, LocalElement,
    Occurs, UNBOUNDED,
};
pub use inheritance::{Extension, FacetCheck, FacetKind, Restriction};
pub use schemas::Schema;
pub use set::{AttributeContainerId, ElementContainerId, SchemaSet};
pub use types::{ComplexType, ComplexTypeSimpleContent, SimpleType, TypeCommon, TypeNode};

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// The raw arena index
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

define_id!(
    /// Handle to a [`Schema`] in a [`SchemaSet`]
    SchemaId
);
define_id!(
    /// Handle to a [`TypeNode`] in a [`SchemaSet`]
    TypeId
);
define_id!(
    /// Handle to an [`ElementNode`] in a [`SchemaSet`]
    ElementId
);
define_id!(
    /// Handle to an [`AttributeNode`] in a [`SchemaSet`]
    AttributeId
);

/// What kind of named entity a lookup is after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A named type
    Type,
    /// A top-level element definition
    Element,
    /// A named element group
    Group,
    /// A top-level attribute definition
    Attribute,
    /// A named attribute group
    AttributeGroup,
}

impl ItemKind {
    /// Lowercase kind name for diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Type => "type",
            ItemKind::Element => "element",
            ItemKind::Group => "group",
            ItemKind::Attribute => "attribute",
            ItemKind::AttributeGroup => "attributeGroup",
        }
    }
}

/// A resolved named entity, tagged by the table it was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaItem {
    /// A named type
    Type(TypeId),
    /// A top-level element definition
    Element(ElementId),
    /// A named element group (possibly an occurrence-carrying reference)
    Group(ElementId),
    /// A top-level attribute definition
    Attribute(AttributeId),
    /// A named attribute group
    AttributeGroup(AttributeId),
}
