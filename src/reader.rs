//! The two-pass schema compiler
//!
//! Pass 1 ([`SchemaReader::schema_node`] internally) walks a schema
//! document's top-level children and registers a skeleton entity for every
//! named declaration, returning one deferred [`Task`] per declaration.
//! Pass 2 runs those tasks in declaration order; each task resolves the
//! references its construct carries, which may in turn load further
//! documents (imports run their own pass 1 and pass 2 synchronously,
//! nested). Anonymous inline types never defer: they are declared and
//! resolved on the spot, since nothing else can reference them.

use crate::documentation::{DocumentationReader, StandardDocumentationReader};
use crate::documents::{Document, Node, NodeHandle};
use crate::error::{Error, LookupError, Result};
use crate::loaders::{DocumentSource, FileSource};
use crate::locations::resolve_relative_url;
use crate::names::split_parts;
use crate::schema::{
    AttributeContainerId, AttributeDef, AttributeGroup, AttributeId, AttributeNode, ComplexType,
    ComplexTypeSimpleContent, ElementContainerId, ElementDef, ElementGroup, ElementId, ElementNode,
    ElementRef, Extension, FacetCheck, FacetKind, GroupRef, Item, LocalAttribute, LocalElement,
    Occurs, Restriction, Schema, SchemaId, SchemaSet, SimpleType, TypeId, TypeNode, UNBOUNDED,
};
use crate::{XML_NAMESPACE, XSD_NAMESPACE};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// The built-in schemas every compilation links: namespace, canonical
/// location and embedded document text
const GLOBAL_SCHEMA_INFO: &[(&str, &str, &str)] = &[
    (
        XML_NAMESPACE,
        "http://www.w3.org/2001/xml.xsd",
        include_str!("resources/xml.xsd"),
    ),
    (
        XSD_NAMESPACE,
        "http://www.w3.org/2001/XMLSchema.xsd",
        include_str!("resources/XMLSchema.xsd"),
    ),
];

fn global_schema_uri(namespace: &str) -> Option<&'static str> {
    GLOBAL_SCHEMA_INFO
        .iter()
        .find(|(ns, _, _)| *ns == namespace)
        .map(|(_, uri, _)| *uri)
}

/// The item a deferred fill task targets
#[derive(Debug, Clone, Copy)]
enum FillTarget {
    Element(ElementId),
    Attribute(AttributeId),
}

/// A deferred pass-2 resolution step, tagged by the construct it finishes
#[derive(Debug)]
enum Task {
    ComplexType {
        type_id: TypeId,
        node: NodeHandle,
    },
    SimpleType {
        type_id: TypeId,
        node: NodeHandle,
    },
    Group {
        group: ElementId,
        node: NodeHandle,
    },
    AttributeGroup {
        group: AttributeId,
        node: NodeHandle,
    },
    ItemFill {
        target: FillTarget,
        node: NodeHandle,
    },
    /// Load, declare and resolve a not-yet-seen document
    ImportFresh {
        parent: SchemaId,
        namespace: Option<String>,
        location: String,
    },
    /// Link every schema loaded for a namespace; deferred so documents
    /// registered later in the same batch are included
    ImportPostponed {
        schema: SchemaId,
        namespace: String,
    },
    Nothing,
}

fn maybe_set_max(occurs: &mut Occurs, node: Node<'_>) {
    if let Some(value) = node.attribute("maxOccurs") {
        if value == "unbounded" {
            occurs.set_max(UNBOUNDED);
        } else if let Ok(value) = value.parse() {
            occurs.set_max(value);
        }
    }
}

fn maybe_set_min(occurs: &mut Occurs, node: Node<'_>) {
    if let Some(value) = node.attribute("minOccurs") {
        if let Ok(value) = value.parse() {
            occurs.set_min(value);
        }
    }
}

fn is_xsd(node: Node<'_>) -> bool {
    node.namespace() == Some(XSD_NAMESPACE)
}

/// Whether the declaring node sits below a construct rather than directly
/// under the schema root
fn is_nested(node: Node<'_>) -> bool {
    match node.parent() {
        Some(parent) => !(parent.local_name() == "schema" && is_xsd(parent)),
        None => false,
    }
}

/// Compiles schema documents into a [`SchemaSet`].
///
/// A reader accumulates state across calls: documents loaded once are
/// linked, not re-parsed, and the built-in schemas are built a single time
/// on first use. See the crate docs for the two-pass scheme.
pub struct SchemaReader {
    set: SchemaSet,
    /// Document key to the schema compiled from it
    loaded_files: HashMap<String, SchemaId>,
    /// Namespace to every schema compiled for it, in load order
    loaded_schemas: HashMap<String, Vec<SchemaId>>,
    /// Location substitutions, remote URL to local replacement
    known_locations: HashMap<String, String>,
    /// Fallback locations for imports that carry no `schemaLocation`
    known_namespace_locations: HashMap<String, String>,
    global_schema: Option<SchemaId>,
    documentation: Box<dyn DocumentationReader>,
    source: Box<dyn DocumentSource>,
}

impl Default for SchemaReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaReader {
    /// Create a reader backed by the local filesystem
    pub fn new() -> Self {
        Self::with_source(Box::new(FileSource))
    }

    /// Create a reader with a custom document source
    pub fn with_source(source: Box<dyn DocumentSource>) -> Self {
        Self {
            set: SchemaSet::new(),
            loaded_files: HashMap::new(),
            loaded_schemas: HashMap::new(),
            known_locations: HashMap::new(),
            known_namespace_locations: HashMap::new(),
            global_schema: None,
            documentation: Box::new(StandardDocumentationReader),
            source,
        }
    }

    /// Replace the documentation extractor
    pub fn set_documentation_reader(&mut self, reader: Box<dyn DocumentationReader>) {
        self.documentation = reader;
    }

    /// Substitute a location: whenever `remote` is requested, `local` is
    /// loaded instead
    pub fn add_known_schema_location(&mut self, remote: impl Into<String>, local: impl Into<String>) {
        self.known_locations.insert(remote.into(), local.into());
    }

    /// Provide a location for imports of `namespace` that carry no
    /// `schemaLocation`
    pub fn add_known_namespace_schema_location(
        &mut self,
        namespace: impl Into<String>,
        location: impl Into<String>,
    ) {
        self.known_namespace_locations
            .insert(namespace.into(), location.into());
    }

    /// The compiled model
    pub fn schema_set(&self) -> &SchemaSet {
        &self.set
    }

    /// Consume the reader, keeping the compiled model
    pub fn into_schema_set(self) -> SchemaSet {
        self.set
    }

    /// Compile a schema document given as a string; `uri` is its identity
    /// for deduplication and diagnostics
    pub fn read_string(&mut self, content: &str, uri: &str) -> Result<SchemaId> {
        let doc = Rc::new(Document::parse(content, uri)?);
        self.read_node(NodeHandle::root(doc))
    }

    /// Compile a schema document from a file
    pub fn read_file(&mut self, path: &str) -> Result<SchemaId> {
        let content = self.source.fetch("", path)?;
        let doc = Rc::new(Document::parse(&content, path)?);
        self.read_node(NodeHandle::root(doc))
    }

    /// Compile a parsed document element
    pub fn read_node(&mut self, node: NodeHandle) -> Result<SchemaId> {
        let root = self.new_schema_with_globals()?;
        {
            let view = node.view();
            debug!(uri = view.document_uri(), "compiling schema document");
            // the root registers under the same key an import of its
            // location would use, so a circular re-import links it back
            let key = self.source.key("", view.document_uri());
            self.loaded_files.insert(key, root);
            if let Some(tns) = view.attribute("targetNamespace") {
                self.loaded_schemas
                    .entry(tns.to_string())
                    .or_default()
                    .push(root);
            }
        }
        let tasks = self.schema_node(root, &node, None)?;
        self.run_tasks(tasks)?;
        Ok(root)
    }

    /// Compile several document elements as one batch.
    ///
    /// Every document is declared before any is resolved, so the documents
    /// may reference each other freely, including imports by namespace
    /// without a location. Returns a wrapper schema linking all of them.
    pub fn read_nodes(&mut self, nodes: Vec<NodeHandle>) -> Result<SchemaId> {
        let root = self.new_schema_with_globals()?;
        let mut holders = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let holder = self.new_schema_with_globals()?;
            if let Some(tns) = node.view().attribute("targetNamespace") {
                self.loaded_schemas
                    .entry(tns.to_string())
                    .or_default()
                    .push(holder);
            }
            self.set.add_schema(root, holder, None)?;
            holders.push(holder);
        }
        let mut tasks = Vec::new();
        for (holder, node) in holders.iter().zip(&nodes) {
            tasks.extend(self.schema_node(*holder, node, None)?);
        }
        self.run_tasks(tasks)?;
        Ok(root)
    }

    fn new_schema_with_globals(&mut self) -> Result<SchemaId> {
        let global = self.get_global_schema()?;
        let id = self.set.alloc_schema(Schema::new(None));
        self.set.add_schema(id, global, None)?;
        Ok(id)
    }

    /// Build the built-in schemas on first use.
    ///
    /// Both documents are declared, the `anyType`/`anySimpleType` seeds and
    /// the cross-namespace links are installed, and only then do the
    /// deferred tasks run; the documents reference each other's namespaces.
    fn get_global_schema(&mut self) -> Result<SchemaId> {
        if let Some(id) = self.global_schema {
            return Ok(id);
        }
        debug!("building the built-in schemas");

        let mut tasks = Vec::new();
        let mut built: Vec<(&str, SchemaId)> = Vec::new();
        for (namespace, uri, text) in GLOBAL_SCHEMA_INFO {
            let id = self.set.alloc_schema(Schema::new(Some((*namespace).to_string())));
            self.loaded_files.insert((*uri).to_string(), id);
            self.loaded_schemas
                .entry((*namespace).to_string())
                .or_default()
                .push(id);
            let doc = Rc::new(Document::parse(text, uri)?);
            tasks.extend(self.schema_node(id, &NodeHandle::root(doc), None)?);
            built.push((namespace, id));
        }

        let lookup = |ns: &str| built.iter().find(|(n, _)| *n == ns).map(|(_, id)| *id);
        let xml = lookup(XML_NAMESPACE)
            .ok_or_else(|| Error::GlobalSchema("missing XML namespace schema".to_string()))?;
        let xsd = lookup(XSD_NAMESPACE)
            .ok_or_else(|| Error::GlobalSchema("missing XSD namespace schema".to_string()))?;

        // the two ur-types exist outside any document
        for name in ["anySimpleType", "anyType"] {
            let ty = self
                .set
                .alloc_type(TypeNode::Simple(SimpleType::new(xsd, Some(name.to_string()))));
            self.set.schema_mut(xsd).add_type(name.to_string(), ty);
        }

        self.set.add_schema(xml, xsd, Some(XSD_NAMESPACE))?;
        self.set.add_schema(xsd, xml, Some(XML_NAMESPACE))?;

        self.global_schema = Some(xsd);
        self.run_tasks(tasks)?;
        Ok(xsd)
    }

    // ---- pass 1 -------------------------------------------------------

    /// Declare every top-level construct of a schema document, returning
    /// the deferred resolution tasks in declaration order
    fn schema_node(
        &mut self,
        schema: SchemaId,
        node: &NodeHandle,
        parent: Option<SchemaId>,
    ) -> Result<Vec<Task>> {
        {
            let view = node.view();
            if let Some(tns) = view.attribute("targetNamespace") {
                self.set
                    .schema_mut(schema)
                    .set_target_namespace(Some(tns.to_string()));
            } else if let Some(parent) = parent {
                // a chameleon include takes on the including document's
                // namespace
                let inherited = self.set.schema(parent).target_namespace().map(str::to_string);
                self.set.schema_mut(schema).set_target_namespace(inherited);
            }
            let elements_qualified = view.attribute("elementFormDefault") == Some("qualified");
            let attributes_qualified = view.attribute("attributeFormDefault") == Some("qualified");
            let schema_mut = self.set.schema_mut(schema);
            schema_mut.set_elements_qualified(elements_qualified);
            schema_mut.set_attributes_qualified(attributes_qualified);
        }
        let doc = self.documentation.get(node.view());
        if !doc.is_empty() {
            self.set.schema_mut(schema).set_doc(doc);
        }

        let mut tasks = Vec::new();
        let view = node.view();
        for child in view.children() {
            if !is_xsd(child) {
                continue;
            }
            let handle = NodeHandle::new(node.document().clone(), child.id());
            match child.local_name() {
                "include" | "import" => tasks.push(self.load_import(schema, &handle)?),
                "element" => tasks.push(self.load_element_def(schema, handle)),
                "attribute" => tasks.push(self.load_attribute_def(schema, handle)),
                "attributeGroup" => tasks.push(self.load_attribute_group(schema, handle)),
                "group" => tasks.push(self.load_group(schema, handle)),
                "complexType" => {
                    let (_, task) = self.load_complex_type(schema, handle);
                    tasks.push(task);
                }
                "simpleType" => {
                    let (_, task) = self.load_simple_type(schema, handle);
                    tasks.push(task);
                }
                _ => {}
            }
        }
        Ok(tasks)
    }

    fn load_element_def(&mut self, schema: SchemaId, node: NodeHandle) -> Task {
        let name = node.view().attribute("name").unwrap_or("").to_string();
        let id = self
            .set
            .alloc_element(ElementNode::Def(ElementDef::new(schema, name.clone())));
        self.set.schema_mut(schema).add_element(name, id);
        Task::ItemFill {
            target: FillTarget::Element(id),
            node,
        }
    }

    fn load_attribute_def(&mut self, schema: SchemaId, node: NodeHandle) -> Task {
        let name = node.view().attribute("name").unwrap_or("").to_string();
        let id = self
            .set
            .alloc_attribute(AttributeNode::Def(AttributeDef::new(schema, name.clone())));
        self.set.schema_mut(schema).add_attribute(name, id);
        Task::ItemFill {
            target: FillTarget::Attribute(id),
            node,
        }
    }

    fn load_attribute_group(&mut self, schema: SchemaId, node: NodeHandle) -> Task {
        let view = node.view();
        let name = view.attribute("name").unwrap_or("").to_string();
        let mut group = AttributeGroup::new(schema, name.clone());
        group.doc = self.documentation.get(view);
        let id = self.set.alloc_attribute(AttributeNode::Group(group));
        self.set.schema_mut(schema).add_attribute_group(name, id);
        Task::AttributeGroup { group: id, node }
    }

    /// Declare a named element group. Occurrence attributes on the
    /// definition itself register an occurrence-carrying reference in the
    /// name table; the bare definition stays reachable through it.
    fn load_group(&mut self, schema: SchemaId, node: NodeHandle) -> Task {
        let view = node.view();
        let name = view.attribute("name").unwrap_or("").to_string();
        let mut group = ElementGroup::new(schema, name.clone());
        group.doc = self.documentation.get(view);
        let group_id = self.set.alloc_element(ElementNode::Group(group));

        let registered = if view.has_attribute("minOccurs") || view.has_attribute("maxOccurs") {
            let mut wrapper = GroupRef::new(group_id);
            maybe_set_max(&mut wrapper.occurs, view);
            maybe_set_min(&mut wrapper.occurs, view);
            self.set.alloc_element(ElementNode::GroupRef(wrapper))
        } else {
            group_id
        };
        self.set.schema_mut(schema).add_group(name, registered);
        Task::Group {
            group: group_id,
            node,
        }
    }

    fn load_complex_type(&mut self, schema: SchemaId, node: NodeHandle) -> (TypeId, Task) {
        let view = node.view();
        let name = view.attribute("name").map(str::to_string);
        // the content model variant is decided up front; only the
        // simpleContent form carries no child particles
        let is_simple = view
            .children()
            .any(|c| c.local_name() == "simpleContent" && is_xsd(c));
        let mut type_node = if is_simple {
            TypeNode::ComplexSimpleContent(ComplexTypeSimpleContent::new(schema, name.clone()))
        } else {
            TypeNode::Complex(ComplexType::new(schema, name.clone()))
        };
        type_node.set_doc(self.documentation.get(view));
        let id = self.set.alloc_type(type_node);
        if let Some(name) = name {
            self.set.schema_mut(schema).add_type(name, id);
        }
        (id, Task::ComplexType { type_id: id, node })
    }

    fn load_simple_type(&mut self, schema: SchemaId, node: NodeHandle) -> (TypeId, Task) {
        let view = node.view();
        let name = view.attribute("name").map(str::to_string);
        let mut type_node = TypeNode::Simple(SimpleType::new(schema, name.clone()));
        type_node.set_doc(self.documentation.get(view));
        let id = self.set.alloc_type(type_node);
        if let Some(name) = name {
            self.set.schema_mut(schema).add_type(name, id);
        }
        (id, Task::SimpleType { type_id: id, node })
    }

    /// Declare an `import` or `include`.
    ///
    /// Already-loaded documents are linked immediately and schedule
    /// nothing. Imports of the built-in namespaces without a location are
    /// satisfied by the always-linked built-in schemas. An import by bare
    /// namespace of something already loaded links at pass-2 time, after
    /// the whole batch has been declared.
    fn load_import(&mut self, schema: SchemaId, node: &NodeHandle) -> Result<Task> {
        let view = node.view();
        let namespace = view
            .attribute("namespace")
            .filter(|ns| !ns.is_empty())
            .map(str::to_string);
        let location_attr = view
            .attribute("schemaLocation")
            .filter(|loc| !loc.is_empty())
            .map(str::to_string);

        if let Some(ns) = &namespace {
            if let Some(uri) = global_schema_uri(ns) {
                if let Some(&global) = self.loaded_files.get(uri) {
                    self.set.add_schema(schema, global, None)?;
                    return Ok(Task::Nothing);
                }
            }
        }

        let location = match (&namespace, &location_attr) {
            (_, Some(location)) => resolve_relative_url(view.document_uri(), location),
            (Some(ns), None) => {
                if self.loaded_schemas.contains_key(ns) {
                    return Ok(Task::ImportPostponed {
                        schema,
                        namespace: ns.clone(),
                    });
                }
                match self.known_namespace_locations.get(ns) {
                    Some(location) => location.clone(),
                    None => return Ok(Task::Nothing),
                }
            }
            (None, None) => return Ok(Task::Nothing),
        };
        let location = self
            .known_locations
            .get(&location)
            .cloned()
            .unwrap_or(location);

        let key = self
            .source
            .key(namespace.as_deref().unwrap_or(""), &location);
        if let Some(&loaded) = self.loaded_files.get(&key) {
            self.set.add_schema(schema, loaded, None)?;
            return Ok(Task::Nothing);
        }

        Ok(Task::ImportFresh {
            parent: schema,
            namespace,
            location,
        })
    }

    // ---- pass 2 -------------------------------------------------------

    fn run_tasks(&mut self, tasks: Vec<Task>) -> Result<()> {
        for task in tasks {
            self.run_task(task)?;
        }
        Ok(())
    }

    fn run_task(&mut self, task: Task) -> Result<()> {
        match task {
            Task::Nothing => Ok(()),
            Task::ComplexType { type_id, node } => self.fill_complex_type(type_id, &node),
            Task::SimpleType { type_id, node } => self.fill_simple_type(type_id, &node),
            Task::Group { group, node } => self.fill_group(group, &node),
            Task::AttributeGroup { group, node } => self.fill_attribute_group(group, &node),
            Task::ItemFill { target, node } => self.fill_item(target, &node),
            Task::ImportFresh {
                parent,
                namespace,
                location,
            } => self.import_fresh(parent, namespace, location),
            Task::ImportPostponed { schema, namespace } => {
                let targets = self.loaded_schemas.get(&namespace).cloned().unwrap_or_default();
                for target in targets {
                    self.set.add_schema(schema, target, Some(namespace.as_str()))?;
                }
                Ok(())
            }
        }
    }

    /// Fetch, declare and resolve a document not seen before. The freshly
    /// compiled schema becomes visible under its document key before its
    /// own pass 2 runs, so circular imports terminate.
    fn import_fresh(
        &mut self,
        parent: SchemaId,
        namespace: Option<String>,
        location: String,
    ) -> Result<()> {
        let key = self
            .source
            .key(namespace.as_deref().unwrap_or(""), &location);
        if let Some(&loaded) = self.loaded_files.get(&key) {
            // another import in the same batch got here first
            self.set.add_schema(parent, loaded, None)?;
            return Ok(());
        }

        debug!(
            namespace = namespace.as_deref().unwrap_or(""),
            location = location.as_str(),
            "importing schema document"
        );
        let content = self.source.fetch(namespace.as_deref().unwrap_or(""), &location)?;
        let doc = Rc::new(Document::parse(&content, &location)?);

        let child = match &namespace {
            Some(ns) => {
                let id = self.new_schema_with_globals()?;
                self.set.add_schema(parent, id, None)?;
                self.loaded_schemas.entry(ns.clone()).or_default().push(id);
                id
            }
            // an include's declarations land in the including schema
            None => parent,
        };
        self.loaded_files.insert(key, child);

        let tasks = self.schema_node(child, &NodeHandle::root(doc), Some(parent))?;
        self.run_tasks(tasks)
    }

    fn fill_complex_type(&mut self, type_id: TypeId, node: &NodeHandle) -> Result<()> {
        self.fill_type_node(type_id, node, true)?;
        let view = node.view();
        for child in view.children() {
            if !is_xsd(child) {
                continue;
            }
            let container = ElementContainerId::Type(type_id);
            match child.local_name() {
                "sequence" | "choice" | "all" => {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    self.load_sequence(container, &handle, None)?;
                }
                "attribute" => {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    self.add_attribute_from_attribute_or_ref(
                        AttributeContainerId::Type(type_id),
                        &handle,
                    )?;
                }
                "attributeGroup" => {
                    self.add_attribute_group_ref(AttributeContainerId::Type(type_id), child)?;
                }
                "group" => {
                    self.add_group_as_element(container, child)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn fill_simple_type(&mut self, type_id: TypeId, node: &NodeHandle) -> Result<()> {
        self.fill_type_node(type_id, node, false)?;
        let view = node.view();
        for child in view.children() {
            if !is_xsd(child) {
                continue;
            }
            let handle = NodeHandle::new(node.document().clone(), child.id());
            match child.local_name() {
                "union" => self.load_union(type_id, &handle)?,
                "list" => self.load_list(type_id, &handle)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Resolve the derivation-related children shared by all type
    /// variants; content wrappers recurse without re-reading `abstract`
    fn fill_type_node(&mut self, type_id: TypeId, node: &NodeHandle, check_abstract: bool) -> Result<()> {
        if check_abstract {
            let abstract_ = matches!(node.view().attribute("abstract"), Some("true") | Some("1"));
            self.set.type_node_mut(type_id).set_abstract(abstract_);
        }
        let view = node.view();
        for child in view.children() {
            if !is_xsd(child) {
                continue;
            }
            let handle = NodeHandle::new(node.document().clone(), child.id());
            match child.local_name() {
                "restriction" => self.load_restriction(type_id, &handle)?,
                "extension" => self.load_extension(type_id, &handle)?,
                "simpleContent" | "complexContent" => {
                    self.fill_type_node(type_id, &handle, false)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn load_restriction(&mut self, type_id: TypeId, node: &NodeHandle) -> Result<()> {
        let schema = self.set.type_node(type_id).schema();
        let view = node.view();
        let mut restriction = Restriction::new();

        if let Some(base) = view.attribute("base") {
            restriction.set_base(self.find_type(schema, view, base)?);
        } else {
            for child in view.children() {
                if child.local_name() == "simpleType" && is_xsd(child) {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    let (base, task) = self.load_simple_type(schema, handle);
                    self.run_task(task)?;
                    restriction.set_base(base);
                }
            }
        }

        for child in view.children() {
            if !is_xsd(child) {
                continue;
            }
            if let Some(kind) = FacetKind::from_name(child.local_name()) {
                let doc = self.documentation.get(child);
                restriction.add_check(
                    kind,
                    FacetCheck {
                        value: child.attribute("value").unwrap_or("").to_string(),
                        doc,
                    },
                );
            }
        }

        self.set.type_node_mut(type_id).set_restriction(restriction);
        Ok(())
    }

    fn load_extension(&mut self, type_id: TypeId, node: &NodeHandle) -> Result<()> {
        let schema = self.set.type_node(type_id).schema();
        let view = node.view();
        let mut extension = Extension::new();
        if let Some(base) = view.attribute("base") {
            extension.set_base(self.find_type(schema, view, base)?);
        }
        self.set.type_node_mut(type_id).set_extension(extension);

        for child in view.children() {
            if !is_xsd(child) {
                continue;
            }
            match child.local_name() {
                "sequence" | "choice" | "all" => {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    self.load_sequence(ElementContainerId::Type(type_id), &handle, None)?;
                }
                "attribute" => {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    self.add_attribute_from_attribute_or_ref(
                        AttributeContainerId::Type(type_id),
                        &handle,
                    )?;
                }
                "attributeGroup" => {
                    self.add_attribute_group_ref(AttributeContainerId::Type(type_id), child)?;
                }
                "group" => {
                    self.add_group_as_element(ElementContainerId::Type(type_id), child)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn load_union(&mut self, type_id: TypeId, node: &NodeHandle) -> Result<()> {
        let schema = self.set.type_node(type_id).schema();
        let view = node.view();
        if let Some(members) = view.attribute("memberTypes") {
            for qname in members.split_whitespace() {
                let member = self.find_type(schema, view, qname)?;
                if let Some(simple) = self.set.type_node_mut(type_id).as_simple_mut() {
                    simple.add_union(member);
                }
            }
        }
        for child in view.children() {
            if child.local_name() == "simpleType" && is_xsd(child) {
                let handle = NodeHandle::new(node.document().clone(), child.id());
                let (member, task) = self.load_simple_type(schema, handle);
                self.run_task(task)?;
                if let Some(simple) = self.set.type_node_mut(type_id).as_simple_mut() {
                    simple.add_union(member);
                }
            }
        }
        Ok(())
    }

    fn load_list(&mut self, type_id: TypeId, node: &NodeHandle) -> Result<()> {
        let schema = self.set.type_node(type_id).schema();
        let view = node.view();
        if let Some(item_type) = view.attribute("itemType") {
            let item = self.find_type(schema, view, item_type)?;
            if let Some(simple) = self.set.type_node_mut(type_id).as_simple_mut() {
                simple.set_list(item);
            }
            return Ok(());
        }
        for child in view.children() {
            if child.local_name() == "simpleType" && is_xsd(child) {
                let handle = NodeHandle::new(node.document().clone(), child.id());
                let (item, task) = self.load_simple_type(schema, handle);
                self.run_task(task)?;
                if let Some(simple) = self.set.type_node_mut(type_id).as_simple_mut() {
                    simple.set_list(item);
                }
            }
        }
        Ok(())
    }

    fn fill_group(&mut self, group: ElementId, node: &NodeHandle) -> Result<()> {
        let view = node.view();
        for child in view.children() {
            if !is_xsd(child) {
                continue;
            }
            match child.local_name() {
                "sequence" | "choice" | "all" => {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    self.load_sequence(ElementContainerId::Element(group), &handle, None)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn fill_attribute_group(&mut self, group: AttributeId, node: &NodeHandle) -> Result<()> {
        let view = node.view();
        for child in view.children() {
            if !is_xsd(child) {
                continue;
            }
            match child.local_name() {
                "attribute" => {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    self.add_attribute_from_attribute_or_ref(
                        AttributeContainerId::Attribute(group),
                        &handle,
                    )?;
                }
                "attributeGroup" => {
                    self.add_attribute_group_ref(AttributeContainerId::Attribute(group), child)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    // ---- particles ----------------------------------------------------

    /// Walk a `sequence`/`choice`/`all` compositor.
    ///
    /// `max` is the propagation marker: once any ancestor compositor allows
    /// more than one occurrence, every descendant particle's upper bound is
    /// forced open (to 2) so consumers see the repetition.
    fn load_sequence(
        &mut self,
        container: ElementContainerId,
        node: &NodeHandle,
        max: Option<i32>,
    ) -> Result<()> {
        let view = node.view();
        let attr_max = view.attribute("maxOccurs");
        let repeated = matches!(max, Some(m) if m > 1)
            || attr_max == Some("unbounded")
            || attr_max
                .and_then(|value| value.parse::<i32>().ok())
                .is_some_and(|value| value > 1);
        let max = if repeated { Some(2) } else { None };
        for child in view.children() {
            if !is_xsd(child) {
                continue;
            }
            match child.local_name() {
                "sequence" | "choice" | "all" => {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    self.load_sequence(container, &handle, max)?;
                }
                "element" => {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    self.load_sequence_element(container, &handle, max)?;
                }
                "group" => {
                    self.add_group_as_element(container, child)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn load_sequence_element(
        &mut self,
        container: ElementContainerId,
        node: &NodeHandle,
        max: Option<i32>,
    ) -> Result<()> {
        let schema = self.set.element_container_schema(container);
        let view = node.view();
        let element_id = if let Some(reference) = view.attribute("ref") {
            let referenced = self.find_element(schema, view, reference)?;
            let mut element_ref = ElementRef::new(schema, referenced);
            element_ref.doc = self.documentation.get(view);
            maybe_set_max(&mut element_ref.occurs, view);
            maybe_set_min(&mut element_ref.occurs, view);
            if view.has_xsd_ancestor("choice") {
                element_ref.occurs.set_min(0);
            }
            if let Some(nillable) = view.attribute("nillable") {
                element_ref.flags.nillable = nillable == "true";
            }
            if let Some(form) = view.attribute("form") {
                element_ref.flags.qualified = form == "qualified";
            }
            self.set.alloc_element(ElementNode::Ref(element_ref))
        } else {
            self.load_element(schema, node)?
        };

        if let Some(max) = max {
            if max > 1 {
                if let Some(occurs) = self.set.element_occurs_mut(element_id) {
                    occurs.set_max(max);
                }
            }
        }
        self.set.add_element_to(container, element_id);
        Ok(())
    }

    fn load_element(&mut self, schema: SchemaId, node: &NodeHandle) -> Result<ElementId> {
        let view = node.view();
        let name = view.attribute("name").unwrap_or("").to_string();
        let mut element = LocalElement::new(schema, name);
        element.flags.local = is_nested(view);
        if let Some(nillable) = view.attribute("nillable") {
            element.flags.nillable = nillable == "true";
        }
        if let Some(form) = view.attribute("form") {
            element.flags.qualified = form == "qualified";
        }
        let id = self.set.alloc_element(ElementNode::Local(element));

        self.fill_item(FillTarget::Element(id), node)?;

        let view = node.view();
        if let Some(occurs) = self.set.element_occurs_mut(id) {
            maybe_set_max(occurs, view);
            maybe_set_min(occurs, view);
            // anything inside a choice is optional, whatever its declared
            // minimum says
            if view.has_xsd_ancestor("choice") {
                occurs.set_min(0);
            }
        }
        if let Some(item) = self.fill_target_item_mut(FillTarget::Element(id)) {
            if let Some(fixed) = view.attribute("fixed") {
                item.set_fixed(fixed.to_string());
            }
            if let Some(default) = view.attribute("default") {
                item.set_default(default.to_string());
            }
        }
        Ok(id)
    }

    fn add_group_as_element(
        &mut self,
        container: ElementContainerId,
        node: Node<'_>,
    ) -> Result<()> {
        let schema = self.set.element_container_schema(container);
        let reference = match node.attribute("ref") {
            Some(reference) => reference,
            None => return Ok(()),
        };
        let referenced = self.find_group(schema, node, reference)?;
        let mut group_ref = GroupRef::new(referenced);
        group_ref.doc = self.documentation.get(node);
        maybe_set_max(&mut group_ref.occurs, node);
        maybe_set_min(&mut group_ref.occurs, node);
        let id = self.set.alloc_element(ElementNode::GroupRef(group_ref));
        self.set.add_element_to(container, id);
        Ok(())
    }

    // ---- attributes ---------------------------------------------------

    fn add_attribute_from_attribute_or_ref(
        &mut self,
        container: AttributeContainerId,
        node: &NodeHandle,
    ) -> Result<()> {
        let schema = self.set.attribute_container_schema(container);
        let view = node.view();
        let id = if let Some(reference) = view.attribute("ref") {
            self.find_attribute(schema, view, reference)?
        } else {
            self.load_attribute(schema, node)?
        };
        self.set.add_attribute_to(container, id);
        Ok(())
    }

    fn load_attribute(&mut self, schema: SchemaId, node: &NodeHandle) -> Result<AttributeId> {
        let view = node.view();
        let name = view.attribute("name").unwrap_or("").to_string();
        let mut attribute = LocalAttribute::new(schema, name);
        attribute.local = is_nested(view);
        attribute.use_ = view.attribute("use").map(str::to_string);
        if let Some(nillable) = view.attribute("nillable") {
            attribute.nil = nillable == "true";
        }
        if let Some(form) = view.attribute("form") {
            attribute.qualified = form == "qualified";
        }
        let id = self.set.alloc_attribute(AttributeNode::Local(attribute));

        self.fill_item(FillTarget::Attribute(id), node)?;

        let view = node.view();
        if let Some(item) = self.fill_target_item_mut(FillTarget::Attribute(id)) {
            if let Some(fixed) = view.attribute("fixed") {
                item.set_fixed(fixed.to_string());
            }
            if let Some(default) = view.attribute("default") {
                item.set_default(default.to_string());
            }
        }
        Ok(id)
    }

    fn add_attribute_group_ref(
        &mut self,
        container: AttributeContainerId,
        node: Node<'_>,
    ) -> Result<()> {
        let schema = self.set.attribute_container_schema(container);
        if let Some(reference) = node.attribute("ref") {
            let referenced = self.find_attribute_group(schema, node, reference)?;
            self.set.add_attribute_to(container, referenced);
        }
        Ok(())
    }

    // ---- item type binding --------------------------------------------

    fn fill_target_item(&self, target: FillTarget) -> Option<&Item> {
        match target {
            FillTarget::Element(id) => match self.set.element_node(id) {
                ElementNode::Def(e) => Some(&e.item),
                ElementNode::Local(e) => Some(&e.item),
                _ => None,
            },
            FillTarget::Attribute(id) => match self.set.attribute_node(id) {
                AttributeNode::Def(a) => Some(&a.item),
                AttributeNode::Local(a) => Some(&a.item),
                _ => None,
            },
        }
    }

    fn fill_target_item_mut(&mut self, target: FillTarget) -> Option<&mut Item> {
        match target {
            FillTarget::Element(id) => match self.set.element_node_mut(id) {
                ElementNode::Def(e) => Some(&mut e.item),
                ElementNode::Local(e) => Some(&mut e.item),
                _ => None,
            },
            FillTarget::Attribute(id) => match self.set.attribute_node_mut(id) {
                AttributeNode::Def(a) => Some(&mut a.item),
                AttributeNode::Local(a) => Some(&mut a.item),
                _ => None,
            },
        }
    }

    /// Bind a declaration's type: the first inline type child wins and is
    /// compiled on the spot; otherwise the `type` attribute is resolved;
    /// otherwise the declaration gets `anyType`
    fn fill_item(&mut self, target: FillTarget, node: &NodeHandle) -> Result<()> {
        let schema = match self.fill_target_item(target) {
            Some(item) => item.schema(),
            None => return Ok(()),
        };
        let doc = self.documentation.get(node.view());
        if let Some(item) = self.fill_target_item_mut(target) {
            item.set_doc(doc);
        }

        let view = node.view();
        for child in view.children() {
            if !is_xsd(child) {
                continue;
            }
            let inline = match child.local_name() {
                "complexType" => {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    Some(self.load_complex_type(schema, handle))
                }
                "simpleType" => {
                    let handle = NodeHandle::new(node.document().clone(), child.id());
                    Some(self.load_simple_type(schema, handle))
                }
                _ => None,
            };
            if let Some((type_id, task)) = inline {
                if let Some(item) = self.fill_target_item_mut(target) {
                    item.set_type(type_id);
                }
                return self.run_task(task);
            }
        }

        self.fill_item_non_local_type(target, schema, view)
    }

    fn fill_item_non_local_type(
        &mut self,
        target: FillTarget,
        schema: SchemaId,
        node: Node<'_>,
    ) -> Result<()> {
        let type_id = match node.attribute("type") {
            Some(qname) => self.find_type(schema, node, qname)?,
            None => self.find_named_type(schema, node, "anyType", Some(XSD_NAMESPACE))?,
        };
        if let Some(item) = self.fill_target_item_mut(target) {
            item.set_type(type_id);
        }
        Ok(())
    }

    // ---- lookups ------------------------------------------------------

    /// Resolve a QName's namespace: prefix scope at the node, falling back
    /// to the schema's own target namespace
    fn resolve_lookup_namespace(
        &self,
        schema: SchemaId,
        node: Node<'_>,
        qname: &str,
    ) -> (String, Option<String>) {
        let (name, namespace) = split_parts(node, qname);
        let namespace = namespace
            .or_else(|| self.set.schema(schema).target_namespace().map(str::to_string));
        (name.to_string(), namespace)
    }

    /// Type lookups try the referencing schema first, then every schema
    /// loaded for the target namespace; types cross document boundaries
    /// more often than any other construct
    fn find_named_type(
        &self,
        schema: SchemaId,
        node: Node<'_>,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<TypeId> {
        let mut candidates = vec![schema];
        if let Some(ns) = namespace {
            if let Some(extra) = self.loaded_schemas.get(ns) {
                candidates.extend(extra.iter().copied());
            }
        }
        for candidate in candidates {
            if let Ok(id) = self.set.find_type(candidate, name, namespace) {
                return Ok(id);
            }
        }
        Err(LookupError::new(
            "type",
            name,
            namespace.map(str::to_string),
            node.document_uri(),
            node.line(),
        )
        .into())
    }

    fn find_type(&self, schema: SchemaId, node: Node<'_>, qname: &str) -> Result<TypeId> {
        let (name, namespace) = self.resolve_lookup_namespace(schema, node, qname);
        self.find_named_type(schema, node, &name, namespace.as_deref())
    }

    fn find_element(&self, schema: SchemaId, node: Node<'_>, qname: &str) -> Result<ElementId> {
        let (name, namespace) = self.resolve_lookup_namespace(schema, node, qname);
        self.set
            .find_element(schema, &name, namespace.as_deref())
            .map_err(|_| {
                LookupError::new("element", name, namespace, node.document_uri(), node.line())
                    .into()
            })
    }

    fn find_group(&self, schema: SchemaId, node: Node<'_>, qname: &str) -> Result<ElementId> {
        let (name, namespace) = self.resolve_lookup_namespace(schema, node, qname);
        self.set
            .find_group(schema, &name, namespace.as_deref())
            .map_err(|_| {
                LookupError::new("group", name, namespace, node.document_uri(), node.line()).into()
            })
    }

    fn find_attribute(&self, schema: SchemaId, node: Node<'_>, qname: &str) -> Result<AttributeId> {
        let (name, namespace) = self.resolve_lookup_namespace(schema, node, qname);
        self.set
            .find_attribute(schema, &name, namespace.as_deref())
            .map_err(|_| {
                LookupError::new("attribute", name, namespace, node.document_uri(), node.line())
                    .into()
            })
    }

    fn find_attribute_group(
        &self,
        schema: SchemaId,
        node: Node<'_>,
        qname: &str,
    ) -> Result<AttributeId> {
        let (name, namespace) = self.resolve_lookup_namespace(schema, node, qname);
        self.set
            .find_attribute_group(schema, &name, namespace.as_deref())
            .map_err(|_| {
                LookupError::new(
                    "attributeGroup",
                    name,
                    namespace,
                    node.document_uri(),
                    node.line(),
                )
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TNS: &str = "http://example.com/test";

    fn schema(body: &str) -> String {
        format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:tns="{TNS}" targetNamespace="{TNS}"
                          elementFormDefault="qualified">{body}</xs:schema>"#
        )
    }

    #[test]
    fn test_forward_reference_within_document() {
        let mut reader = SchemaReader::new();
        let root = reader
            .read_string(
                &schema(
                    r#"<xs:element name="user" type="tns:userType"/>
                       <xs:complexType name="userType">
                         <xs:sequence><xs:element name="name" type="xs:string"/></xs:sequence>
                       </xs:complexType>"#,
                ),
                "forward.xsd",
            )
            .unwrap();

        let set = reader.schema_set();
        let element = set.find_element(root, "user", Some(TNS)).unwrap();
        let ty = set.find_type(root, "userType", Some(TNS)).unwrap();
        assert_eq!(set.element_type(element), Some(ty));
    }

    #[test]
    fn test_missing_type_reports_location() {
        let mut reader = SchemaReader::new();
        let err = reader
            .read_string(
                &schema(r#"<xs:element name="user" type="tns:noSuchType"/>"#),
                "missing.xsd",
            )
            .unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("noSuchType"), "{msg}");
        assert!(msg.contains("at line"), "{msg}");
        assert!(msg.contains("missing.xsd"), "{msg}");
    }

    #[test]
    fn test_builtin_types_resolve() {
        let mut reader = SchemaReader::new();
        let root = reader.read_string(&schema(""), "empty.xsd").unwrap();
        let set = reader.schema_set();
        for name in ["string", "int", "anyType", "anySimpleType", "token"] {
            assert!(
                set.find_type(root, name, Some(XSD_NAMESPACE)).is_ok(),
                "builtin {name} not resolvable"
            );
        }
    }

    #[test]
    fn test_untyped_element_gets_any_type() {
        let mut reader = SchemaReader::new();
        let root = reader
            .read_string(&schema(r#"<xs:element name="blob"/>"#), "blob.xsd")
            .unwrap();
        let set = reader.schema_set();
        let element = set.find_element(root, "blob", Some(TNS)).unwrap();
        let any = set.find_type(root, "anyType", Some(XSD_NAMESPACE)).unwrap();
        assert_eq!(set.element_type(element), Some(any));
    }
}
