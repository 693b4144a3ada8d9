//! Error types for xsdreader
//!
//! This module defines all error types used throughout the library.
//! The design goal is precise, located diagnostics (file, line, what was
//! being resolved) rather than resilience: schema documents are static
//! inputs, so every error is fatal to the compilation that raised it.

use std::fmt;
use thiserror::Error;

/// Result type alias using xsdreader Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for schema compilation
#[derive(Error, Debug)]
pub enum Error {
    /// A schema document could not be fetched or parsed as well-formed XML
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// A referenced entity could not be found anywhere in the reachable
    /// schema graph; carries the source location of the reference
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// The resolver exhausted the schema graph without a match.
    ///
    /// Raised by the throwing `find_*` variants on [`SchemaSet`]; the reader
    /// wraps it into [`Error::Lookup`] with the referencing node's location.
    ///
    /// [`SchemaSet`]: crate::schema::SchemaSet
    #[error("can't find the {kind} named {{{namespace}}}#{name}", namespace = .namespace.as_deref().unwrap_or(""))]
    NotFound {
        /// Lookup kind (type, element, group, attribute, attributeGroup)
        kind: &'static str,
        /// Requested local name
        name: String,
        /// Requested namespace
        namespace: Option<String>,
    },

    /// A schema was linked under a namespace key that does not match its own
    /// declared target namespace; raised at link time
    #[error("the target namespace ('{actual}') for schema does not match the declared namespace '{expected}'", actual = .actual.as_deref().unwrap_or(""))]
    NamespaceMismatch {
        /// Namespace key the schema was registered under
        expected: String,
        /// The schema's own target namespace
        actual: Option<String>,
    },

    /// The well-known built-in schema could not be established; every
    /// compilation depends on it, so this is unrecoverable
    #[error("global schema not discovered: {0}")]
    GlobalSchema(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load failure for a schema document, with the aggregated diagnostics of
/// the underlying XML parser
#[derive(Debug, Clone)]
pub struct LoadError {
    /// Error message
    pub message: String,
    /// Location of the document that failed to load
    pub location: Option<String>,
    /// Underlying parser diagnostics
    pub diagnostics: Vec<String>,
}

impl LoadError {
    /// Create a new load error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            diagnostics: Vec::new(),
        }
    }

    /// Set the document location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Append a parser diagnostic
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostics.push(diagnostic.into());
        self
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref location) = self.location {
            write!(f, " ('{}')", location)?;
        }

        if !self.diagnostics.is_empty() {
            write!(f, ": {}", self.diagnostics.join("; "))?;
        }

        Ok(())
    }
}

impl std::error::Error for LoadError {}

/// Lookup failure with the source location of the reference that triggered it
#[derive(Debug, Clone)]
pub struct LookupError {
    /// Lookup kind (type, element, group, attribute, attributeGroup)
    pub kind: &'static str,
    /// Requested local name
    pub name: String,
    /// Requested namespace
    pub namespace: Option<String>,
    /// Document the reference appears in
    pub file: String,
    /// Line of the referencing node
    pub line: u64,
}

impl LookupError {
    /// Create a new lookup error
    pub fn new(
        kind: &'static str,
        name: impl Into<String>,
        namespace: Option<String>,
        file: impl Into<String>,
        line: u64,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace,
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "can't find {} named {{{}}}#{}, at line {} in {}",
            self.kind,
            self.namespace.as_deref().unwrap_or(""),
            self.name,
            self.line,
            self.file
        )
    }
}

impl std::error::Error for LookupError {}
