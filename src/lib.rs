//! # xsdreader
//!
//! Compiles one or more interconnected XML Schema (XSD) documents into a
//! fully resolved, in-memory schema model: a graph of named and anonymous
//! types, elements, attributes and groups, with inheritance links and facet
//! constraints.
//!
//! The compiler is a two-pass engine. Pass 1 walks every reachable schema
//! document and registers skeleton entities into their owning [`Schema`]'s
//! name tables, which is what makes forward references resolvable. Pass 2
//! runs the deferred resolution tasks in production order, filling in type
//! bindings, particle content and attribute membership, loading imported
//! documents along the way. Cross-document cycles terminate because name
//! resolution threads a visited-set through the whole schema graph.
//!
//! ## Example
//!
//! ```rust,ignore
//! use xsdreader::SchemaReader;
//!
//! let mut reader = SchemaReader::new();
//! let root = reader.read_file("path/to/schema.xsd")?;
//!
//! let set = reader.schema_set();
//! let ty = set.find_type(root, "invoiceType", Some("http://example.com/ns"))?;
//! ```
//!
//! [`Schema`]: schema::Schema

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;

// Utilities
pub mod locations;
pub mod names;

// Document boundary
pub mod documentation;
pub mod documents;
pub mod loaders;

// Compiled model
pub mod schema;

// The two-pass compiler
pub mod reader;

// Re-exports for convenience
pub use error::{Error, Result};
pub use reader::SchemaReader;
pub use schema::{AttributeId, ElementId, SchemaId, SchemaSet, TypeId};

/// Version of the xsdreader library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XML Schema namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
