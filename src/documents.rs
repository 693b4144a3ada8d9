//! Schema document handling
//!
//! This module provides the element-tree view the compilation engine
//! consumes: local tag names, attributes, ordered element children, the
//! namespace prefixes in scope at each node, source line numbers and the
//! owning document's URI. Text and comment nodes never appear as children;
//! direct text is retained only for documentation extraction.

use crate::error::{LoadError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::rc::Rc;

/// A parsed schema document: an arena of element nodes with parent links
#[derive(Debug)]
pub struct Document {
    uri: String,
    nodes: Vec<NodeData>,
    root: usize,
}

#[derive(Debug)]
struct NodeData {
    parent: Option<usize>,
    children: Vec<usize>,
    local_name: String,
    namespace: Option<String>,
    /// Attribute local name (prefix stripped) to value, in document order
    attributes: Vec<(String, String)>,
    /// Prefix to namespace URI mappings in scope at this node
    prefixes: HashMap<String, String>,
    /// Default namespace in scope, if any
    default_namespace: Option<String>,
    /// Direct text content, concatenated
    text: String,
    line: u64,
}

impl Document {
    /// Parse a document from a string, recording `uri` as its identity
    /// for deduplication and diagnostics.
    pub fn parse(xml: &str, uri: &str) -> Result<Document> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut nodes: Vec<NodeData> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut root: Option<usize> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let id =
                        Self::open_element(&e, &mut nodes, &stack, line_at(xml, &reader), uri)?;
                    Self::attach(&mut nodes, &mut root, &stack, id);
                    stack.push(id);
                }
                Ok(Event::Empty(e)) => {
                    let id =
                        Self::open_element(&e, &mut nodes, &stack, line_at(xml, &reader), uri)?;
                    Self::attach(&mut nodes, &mut root, &stack, id);
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Text(e)) => {
                    if let Some(&current) = stack.last() {
                        let text = e.unescape().map_err(|e| {
                            LoadError::new("can't load the schema")
                                .with_location(uri)
                                .with_diagnostic(format!("failed to unescape text: {}", e))
                        })?;
                        if !nodes[current].text.is_empty() {
                            nodes[current].text.push('\n');
                        }
                        nodes[current].text.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(LoadError::new("can't load the schema")
                        .with_location(uri)
                        .with_diagnostic(format!(
                            "error at position {}: {}",
                            reader.buffer_position(),
                            e
                        ))
                        .into());
                }
                _ => {} // Comments, processing instructions, declarations
            }
            buf.clear();
        }

        let root = root.ok_or_else(|| {
            LoadError::new("can't load the schema")
                .with_location(uri)
                .with_diagnostic("no document element")
        })?;

        Ok(Document {
            uri: uri.to_string(),
            nodes,
            root,
        })
    }

    fn attach(nodes: &mut [NodeData], root: &mut Option<usize>, stack: &[usize], id: usize) {
        if let Some(&parent) = stack.last() {
            nodes[parent].children.push(id);
        } else if root.is_none() {
            *root = Some(id);
        }
    }

    /// Create a node for a start/empty tag, inheriting the namespace scope
    /// of the innermost open element and applying its own xmlns declarations.
    fn open_element(
        start: &BytesStart,
        nodes: &mut Vec<NodeData>,
        stack: &[usize],
        line: u64,
        uri: &str,
    ) -> Result<usize> {
        let parent = stack.last().copied();
        let (mut prefixes, mut default_namespace) = match parent {
            Some(p) => (nodes[p].prefixes.clone(), nodes[p].default_namespace.clone()),
            None => (HashMap::new(), None),
        };

        let bad = |detail: String| -> crate::Error {
            LoadError::new("can't load the schema")
                .with_location(uri)
                .with_diagnostic(detail)
                .into()
        };

        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| bad(format!("invalid element name: {}", e)))?
            .to_string();

        let mut attributes = Vec::new();
        for attr_result in start.attributes() {
            let attr = attr_result.map_err(|e| bad(format!("failed to parse attribute: {}", e)))?;
            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| bad(format!("invalid attribute name: {}", e)))?
                .to_string();
            let attr_value = attr
                .unescape_value()
                .map_err(|e| bad(format!("failed to unescape attribute value: {}", e)))?
                .to_string();

            if attr_name == "xmlns" {
                // xmlns="" un-declares the default namespace
                default_namespace = if attr_value.is_empty() {
                    None
                } else {
                    Some(attr_value)
                };
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                prefixes.insert(prefix.to_string(), attr_value);
            } else {
                let local = match attr_name.split_once(':') {
                    Some((_, local)) => local.to_string(),
                    None => attr_name,
                };
                attributes.push((local, attr_value));
            }
        }

        let (local_name, namespace) = match name.split_once(':') {
            Some((prefix, local)) => (local.to_string(), prefixes.get(prefix).cloned()),
            None => (name, default_namespace.clone()),
        };

        let id = nodes.len();
        nodes.push(NodeData {
            parent,
            children: Vec::new(),
            local_name,
            namespace,
            attributes,
            prefixes,
            default_namespace,
            text: String::new(),
            line,
        });
        Ok(id)
    }

    /// The document's URI (file identity for caching and diagnostics)
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The document element
    pub fn root(&self) -> Node<'_> {
        Node {
            doc: self,
            id: self.root,
        }
    }

    /// A cursor for an arbitrary node id
    pub fn node(&self, id: usize) -> Node<'_> {
        Node { doc: self, id }
    }
}

/// Line number of the position the reader has consumed up to
fn line_at(xml: &str, reader: &Reader<&[u8]>) -> u64 {
    let pos = reader.buffer_position().min(xml.len());
    xml.as_bytes()[..pos].iter().filter(|&&b| b == b'\n').count() as u64 + 1
}

/// Cursor over one element of a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: usize,
}

impl<'a> Node<'a> {
    fn data(&self) -> &'a NodeData {
        &self.doc.nodes[self.id]
    }

    /// Arena id of this node within its document
    pub fn id(&self) -> usize {
        self.id
    }

    /// The owning document
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// The owning document's URI
    pub fn document_uri(&self) -> &'a str {
        &self.doc.uri
    }

    /// Local tag name (prefix stripped)
    pub fn local_name(&self) -> &'a str {
        &self.data().local_name
    }

    /// Namespace URI of the element, if any
    pub fn namespace(&self) -> Option<&'a str> {
        self.data().namespace.as_deref()
    }

    /// Attribute value by local name
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the attribute is present
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Ordered element children (text and comments never appear)
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let doc = self.doc;
        self.data().children.iter().map(move |&id| Node { doc, id })
    }

    /// Parent element, if this is not the document element
    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| Node { doc: self.doc, id })
    }

    /// Source line of the element's tag
    pub fn line(&self) -> u64 {
        self.data().line
    }

    /// Direct text content of this element
    pub fn text(&self) -> &'a str {
        &self.data().text
    }

    /// Concatenated text of this element and all its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(self.text());
        for child in self.children() {
            child.collect_text(out);
        }
    }

    /// Resolve a namespace prefix against the declarations in scope here.
    ///
    /// `None` resolves the default namespace.
    pub fn resolve_prefix(&self, prefix: Option<&str>) -> Option<&'a str> {
        match prefix {
            Some(p) => self.data().prefixes.get(p).map(|s| s.as_str()),
            None => self.data().default_namespace.as_deref(),
        }
    }

    /// Whether any ancestor is an XSD element with the given local name.
    ///
    /// Used for the `choice` minimum-forcing rule, which inspects the live
    /// ancestor chain of the element node being loaded.
    pub fn has_xsd_ancestor(&self, local_name: &str) -> bool {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.local_name() == local_name && node.namespace() == Some(crate::XSD_NAMESPACE) {
                return true;
            }
            current = node.parent();
        }
        false
    }
}

/// Owning handle to a node, used by deferred resolution tasks
#[derive(Debug, Clone)]
pub struct NodeHandle {
    doc: Rc<Document>,
    id: usize,
}

impl NodeHandle {
    /// Create a handle for a node of `doc`
    pub fn new(doc: Rc<Document>, id: usize) -> Self {
        Self { doc, id }
    }

    /// Handle to the document element of `doc`
    pub fn root(doc: Rc<Document>) -> Self {
        let id = doc.root().id();
        Self { doc, id }
    }

    /// Borrow the node as a cursor
    pub fn view(&self) -> Node<'_> {
        self.doc.node(self.id)
    }

    /// The owning document
    pub fn document(&self) -> &Rc<Document> {
        &self.doc
    }
}
