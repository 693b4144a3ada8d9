//! End-to-end compilation tests: particles, derivations, attribute sets,
//! documentation and multi-document loading.

use proptest::prelude::*;
use std::fs;
use std::rc::Rc;
use xsdreader::documents::{Document, NodeHandle};
use xsdreader::schema::{AttributeNode, ElementNode, FacetKind, TypeNode, UNBOUNDED};
use xsdreader::{SchemaReader, XML_NAMESPACE, XSD_NAMESPACE};

const TNS: &str = "http://example.com/test";

fn wrap(body: &str) -> String {
    format!(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      xmlns:tns="{TNS}" targetNamespace="{TNS}"
                      elementFormDefault="qualified">{body}</xs:schema>"#
    )
}

fn compile(body: &str) -> (SchemaReader, xsdreader::SchemaId) {
    let mut reader = SchemaReader::new();
    let root = reader.read_string(&wrap(body), "test.xsd").unwrap();
    (reader, root)
}

// ---- particles --------------------------------------------------------

#[test]
fn choice_members_become_optional() {
    let (reader, root) = compile(
        r#"<xs:complexType name="pick">
             <xs:choice>
               <xs:element name="a" type="xs:string" minOccurs="1"/>
               <xs:element name="b" type="xs:string"/>
             </xs:choice>
           </xs:complexType>
           <xs:complexType name="pair">
             <xs:sequence>
               <xs:element name="c" type="xs:string"/>
             </xs:sequence>
           </xs:complexType>"#,
    );
    let set = reader.schema_set();

    let pick = set.find_type(root, "pick", Some(TNS)).unwrap();
    for &child in set.type_node(pick).elements() {
        let occurs = set.element_node(child).occurs().unwrap();
        assert_eq!(occurs.min(), 0, "choice member must be optional");
    }

    let pair = set.find_type(root, "pair", Some(TNS)).unwrap();
    let child = set.type_node(pair).elements()[0];
    assert_eq!(set.element_node(child).occurs().unwrap().min(), 1);
}

#[test]
fn repetition_propagates_to_nested_particles() {
    let (reader, root) = compile(
        r#"<xs:complexType name="listy">
             <xs:sequence maxOccurs="unbounded">
               <xs:sequence>
                 <xs:element name="item" type="xs:string"/>
               </xs:sequence>
             </xs:sequence>
           </xs:complexType>"#,
    );
    let set = reader.schema_set();
    let listy = set.find_type(root, "listy", Some(TNS)).unwrap();
    let item = set.type_node(listy).elements()[0];
    assert!(
        set.element_node(item).occurs().unwrap().max() > 1,
        "repetition above must open the nested element's upper bound"
    );
}

#[test]
fn bounded_repetition_collapses_to_the_open_marker() {
    let (reader, root) = compile(
        r#"<xs:complexType name="batch">
             <xs:sequence maxOccurs="5">
               <xs:element name="item" type="xs:string"/>
             </xs:sequence>
           </xs:complexType>"#,
    );
    let set = reader.schema_set();
    let batch = set.find_type(root, "batch", Some(TNS)).unwrap();
    let item = set.type_node(batch).elements()[0];
    let occurs = set.element_node(item).occurs().unwrap();
    // any multiplicity above one is recorded as the marker value, not the
    // compositor's exact count
    assert_eq!((occurs.min(), occurs.max()), (1, 2));
}

#[test]
fn raised_minimum_pulls_maximum_up() {
    let (reader, root) = compile(
        r#"<xs:complexType name="many">
             <xs:sequence>
               <xs:element name="x" type="xs:string" minOccurs="5"/>
               <xs:element name="y" type="xs:string" minOccurs="2" maxOccurs="unbounded"/>
             </xs:sequence>
           </xs:complexType>"#,
    );
    let set = reader.schema_set();
    let many = set.find_type(root, "many", Some(TNS)).unwrap();
    let children = set.type_node(many).elements();

    let x = set.element_node(children[0]).occurs().unwrap();
    assert_eq!((x.min(), x.max()), (5, 5));

    let y = set.element_node(children[1]).occurs().unwrap();
    assert_eq!((y.min(), y.max()), (2, UNBOUNDED));
}

#[test]
fn groups_and_group_references() {
    let (reader, root) = compile(
        r#"<xs:group name="parts">
             <xs:sequence>
               <xs:element name="part" type="xs:string"/>
               <xs:element name="serial" type="xs:int"/>
             </xs:sequence>
           </xs:group>
           <xs:complexType name="machine">
             <xs:sequence>
               <xs:group ref="tns:parts" minOccurs="0"/>
             </xs:sequence>
           </xs:complexType>"#,
    );
    let set = reader.schema_set();

    let parts = set.find_group(root, "parts", Some(TNS)).unwrap();
    assert_eq!(set.group_elements(parts).len(), 2);
    assert_eq!(set.element_name(parts), Some("parts"));

    let machine = set.find_type(root, "machine", Some(TNS)).unwrap();
    let reference = set.type_node(machine).elements()[0];
    match set.element_node(reference) {
        ElementNode::GroupRef(group_ref) => {
            assert_eq!(group_ref.occurs.min(), 0);
        }
        other => panic!("expected a group reference, got {:?}", other),
    }
    // members are reachable through the reference
    assert_eq!(set.group_elements(reference).len(), 2);
}

#[test]
fn group_definition_with_occurrence_registers_a_reference() {
    let (reader, root) = compile(
        r#"<xs:group name="padding" minOccurs="0" maxOccurs="3">
             <xs:sequence>
               <xs:element name="pad" type="xs:string"/>
             </xs:sequence>
           </xs:group>"#,
    );
    let set = reader.schema_set();
    let padding = set.find_group(root, "padding", Some(TNS)).unwrap();
    match set.element_node(padding) {
        ElementNode::GroupRef(group_ref) => {
            assert_eq!((group_ref.occurs.min(), group_ref.occurs.max()), (0, 3));
            assert!(matches!(
                set.element_node(group_ref.referenced),
                ElementNode::Group(_)
            ));
        }
        other => panic!("expected an occurrence-carrying reference, got {:?}", other),
    }
    assert_eq!(set.group_elements(padding).len(), 1);
}

// ---- simple types -----------------------------------------------------

#[test]
fn facets_keep_declaration_order() {
    let (reader, root) = compile(
        r#"<xs:simpleType name="sized">
             <xs:restriction base="xs:string">
               <xs:minLength value="1"/>
               <xs:enumeration value="small"/>
               <xs:enumeration value="large"/>
               <xs:maxLength value="10"/>
             </xs:restriction>
           </xs:simpleType>"#,
    );
    let set = reader.schema_set();
    let sized = set.find_type(root, "sized", Some(TNS)).unwrap();
    let restriction = set.type_node(sized).restriction().unwrap();

    let string = set.find_type(root, "string", Some(XSD_NAMESPACE)).unwrap();
    assert_eq!(restriction.base(), Some(string));

    let kinds: Vec<_> = restriction.checks().keys().copied().collect();
    assert_eq!(
        kinds,
        [FacetKind::MinLength, FacetKind::Enumeration, FacetKind::MaxLength]
    );
    let values: Vec<_> = restriction
        .checks_by_kind(FacetKind::Enumeration)
        .iter()
        .map(|c| c.value.as_str())
        .collect();
    assert_eq!(values, ["small", "large"]);
}

#[test]
fn unions_collect_named_and_inline_members() {
    let (reader, root) = compile(
        r#"<xs:simpleType name="flexible">
             <xs:union memberTypes="xs:int tns:word">
               <xs:simpleType>
                 <xs:restriction base="xs:string">
                   <xs:maxLength value="3"/>
                 </xs:restriction>
               </xs:simpleType>
             </xs:union>
           </xs:simpleType>
           <xs:simpleType name="word">
             <xs:restriction base="xs:token"/>
           </xs:simpleType>"#,
    );
    let set = reader.schema_set();
    let flexible = set.find_type(root, "flexible", Some(TNS)).unwrap();
    let unions = set.type_node(flexible).as_simple().unwrap().unions();
    assert_eq!(unions.len(), 3);

    let int = set.find_type(root, "int", Some(XSD_NAMESPACE)).unwrap();
    let word = set.find_type(root, "word", Some(TNS)).unwrap();
    assert_eq!(unions[0], int);
    assert_eq!(unions[1], word);
    assert_eq!(set.type_node(unions[2]).name(), None);
}

#[test]
fn list_item_type_binds() {
    let (reader, root) = compile(
        r#"<xs:simpleType name="numbers">
             <xs:list itemType="xs:int"/>
           </xs:simpleType>"#,
    );
    let set = reader.schema_set();
    let numbers = set.find_type(root, "numbers", Some(TNS)).unwrap();
    let int = set.find_type(root, "int", Some(XSD_NAMESPACE)).unwrap();
    assert_eq!(set.type_node(numbers).as_simple().unwrap().list(), Some(int));
}

// ---- complex types and attributes -------------------------------------

#[test]
fn extension_merges_base_and_own_content() {
    let (reader, root) = compile(
        r#"<xs:complexType name="base">
             <xs:sequence>
               <xs:element name="x" type="xs:string"/>
             </xs:sequence>
           </xs:complexType>
           <xs:complexType name="derived">
             <xs:complexContent>
               <xs:extension base="tns:base">
                 <xs:sequence>
                   <xs:element name="y" type="xs:string"/>
                 </xs:sequence>
               </xs:extension>
             </xs:complexContent>
           </xs:complexType>"#,
    );
    let set = reader.schema_set();
    let base = set.find_type(root, "base", Some(TNS)).unwrap();
    let derived = set.find_type(root, "derived", Some(TNS)).unwrap();

    let derived_node = set.type_node(derived);
    assert_eq!(derived_node.parent(), Some(base));
    assert_eq!(derived_node.elements().len(), 1);
    assert_eq!(set.element_name(derived_node.elements()[0]), Some("y"));
}

#[test]
fn simple_content_carries_attributes_but_no_particles() {
    let (reader, root) = compile(
        r#"<xs:complexType name="price">
             <xs:simpleContent>
               <xs:extension base="xs:decimal">
                 <xs:attribute name="currency" type="xs:string" use="required"/>
               </xs:extension>
             </xs:simpleContent>
           </xs:complexType>"#,
    );
    let set = reader.schema_set();
    let price = set.find_type(root, "price", Some(TNS)).unwrap();
    let node = set.type_node(price);
    assert!(matches!(node, TypeNode::ComplexSimpleContent(_)));

    let decimal = set.find_type(root, "decimal", Some(XSD_NAMESPACE)).unwrap();
    assert_eq!(node.extension().unwrap().base(), Some(decimal));
    assert!(node.elements().is_empty());
    assert_eq!(node.attributes().len(), 1);

    match set.attribute_node(node.attributes()[0]) {
        AttributeNode::Local(attribute) => {
            assert_eq!(attribute.item.name(), "currency");
            assert_eq!(attribute.use_.as_deref(), Some("required"));
            assert!(attribute.local);
        }
        other => panic!("expected a local attribute, got {:?}", other),
    }
}

#[test]
fn attribute_groups_resolve_members_and_references() {
    let (reader, root) = compile(
        r#"<xs:attribute name="version" type="xs:string"/>
           <xs:attributeGroup name="common">
             <xs:attribute name="id" type="xs:ID" use="required"/>
             <xs:attribute ref="tns:version"/>
           </xs:attributeGroup>
           <xs:complexType name="record">
             <xs:sequence/>
             <xs:attributeGroup ref="tns:common"/>
           </xs:complexType>"#,
    );
    let set = reader.schema_set();

    let version = set.find_attribute(root, "version", Some(TNS)).unwrap();
    assert!(!set.attribute_node(version).is_local());

    let common = set.find_attribute_group(root, "common", Some(TNS)).unwrap();
    let members = match set.attribute_node(common) {
        AttributeNode::Group(group) => group.attributes(),
        other => panic!("expected an attribute group, got {:?}", other),
    };
    assert_eq!(members.len(), 2);
    assert_eq!(set.attribute_name(members[0]), Some("id"));
    // the reference resolved to the top-level definition itself
    assert_eq!(members[1], version);

    let record = set.find_type(root, "record", Some(TNS)).unwrap();
    assert_eq!(set.type_node(record).attributes(), &[common]);
}

#[test]
fn anonymous_inline_types_bind_immediately() {
    let (reader, root) = compile(
        r#"<xs:element name="point">
             <xs:complexType>
               <xs:sequence>
                 <xs:element name="x" type="xs:int"/>
                 <xs:element name="y" type="xs:int"/>
               </xs:sequence>
             </xs:complexType>
           </xs:element>"#,
    );
    let set = reader.schema_set();
    let point = set.find_element(root, "point", Some(TNS)).unwrap();
    let ty = set.element_type(point).unwrap();
    let node = set.type_node(ty);
    assert_eq!(node.name(), None, "inline types stay anonymous");
    assert!(node.is_complex());
    assert_eq!(node.elements().len(), 2);
}

#[test]
fn fixed_and_default_values_are_kept() {
    let (reader, root) = compile(
        r#"<xs:complexType name="cfg">
             <xs:sequence>
               <xs:element name="mode" type="xs:string" default="auto"/>
             </xs:sequence>
             <xs:attribute name="version" type="xs:string" fixed="1.0"/>
           </xs:complexType>"#,
    );
    let set = reader.schema_set();
    let cfg = set.find_type(root, "cfg", Some(TNS)).unwrap();

    match set.element_node(set.type_node(cfg).elements()[0]) {
        ElementNode::Local(local) => assert_eq!(local.item.default(), Some("auto")),
        other => panic!("expected a local element, got {:?}", other),
    }
    match set.attribute_node(set.type_node(cfg).attributes()[0]) {
        AttributeNode::Local(local) => assert_eq!(local.item.fixed(), Some("1.0")),
        other => panic!("expected a local attribute, got {:?}", other),
    }
}

#[test]
fn abstract_flag_is_read() {
    let (reader, root) = compile(
        r#"<xs:complexType name="shape" abstract="true">
             <xs:sequence/>
           </xs:complexType>"#,
    );
    let set = reader.schema_set();
    let shape = set.find_type(root, "shape", Some(TNS)).unwrap();
    assert!(set.type_node(shape).is_abstract());
}

// ---- documentation ----------------------------------------------------

#[test]
fn documentation_is_extracted_and_normalized() {
    let (reader, root) = compile(
        r#"<xs:annotation>
             <xs:documentation>The   test
schema.</xs:documentation>
           </xs:annotation>
           <xs:element name="e" type="xs:string">
             <xs:annotation>
               <xs:documentation>An element.</xs:documentation>
             </xs:annotation>
           </xs:element>"#,
    );
    let set = reader.schema_set();
    assert_eq!(set.schema(root).doc(), Some("The test\nschema."));

    let element = set.find_element(root, "e", Some(TNS)).unwrap();
    match set.element_node(element) {
        ElementNode::Def(def) => assert_eq!(def.item.doc(), "An element."),
        other => panic!("expected a definition, got {:?}", other),
    }
}

// ---- built-ins and imports --------------------------------------------

#[test]
fn xml_namespace_attributes_are_always_reachable() {
    let (reader, root) = compile(
        r#"<xs:import namespace="http://www.w3.org/XML/1998/namespace"/>"#,
    );
    let set = reader.schema_set();
    assert!(set.find_attribute(root, "lang", Some(XML_NAMESPACE)).is_ok());
    assert!(set
        .find_attribute_group(root, "specialAttrs", Some(XML_NAMESPACE))
        .is_ok());
}

#[test]
fn circular_imports_terminate() {
    let dir = tempfile::tempdir().unwrap();
    let a_path = dir.path().join("a.xsd");
    let b_path = dir.path().join("b.xsd");

    fs::write(
        &a_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      xmlns:b="urn:b" targetNamespace="urn:a">
             <xs:import namespace="urn:b" schemaLocation="b.xsd"/>
             <xs:simpleType name="aLeaf">
               <xs:restriction base="xs:string"/>
             </xs:simpleType>
             <xs:complexType name="aType">
               <xs:sequence>
                 <xs:element name="b" type="b:bType"/>
               </xs:sequence>
             </xs:complexType>
           </xs:schema>"#,
    )
    .unwrap();
    fs::write(
        &b_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      xmlns:a="urn:a" targetNamespace="urn:b">
             <xs:import namespace="urn:a" schemaLocation="a.xsd"/>
             <xs:complexType name="bType">
               <xs:sequence>
                 <xs:element name="leaf" type="a:aLeaf"/>
               </xs:sequence>
             </xs:complexType>
           </xs:schema>"#,
    )
    .unwrap();

    let mut reader = SchemaReader::new();
    let root = reader.read_file(a_path.to_str().unwrap()).unwrap();
    let set = reader.schema_set();

    assert!(set.find_type(root, "aType", Some("urn:a")).is_ok());
    assert!(set.find_type(root, "bType", Some("urn:b")).is_ok());

    // the cross-namespace element reference got a type in urn:a
    let b_type = set.find_type(root, "bType", Some("urn:b")).unwrap();
    let leaf = set.type_node(b_type).elements()[0];
    let leaf_type = set.element_type(leaf).unwrap();
    assert_eq!(set.type_node(leaf_type).name(), Some("aLeaf"));
}

#[test]
fn location_free_back_import_reaches_the_root_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let a_path = dir.path().join("a.xsd");
    let b_path = dir.path().join("b.xsd");

    fs::write(
        &a_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      targetNamespace="urn:a">
             <xs:import namespace="urn:b" schemaLocation="b.xsd"/>
             <xs:simpleType name="aLeaf">
               <xs:restriction base="xs:string"/>
             </xs:simpleType>
           </xs:schema>"#,
    )
    .unwrap();
    // b names the root's namespace without a location; the root document
    // must be reachable for it anyway
    fs::write(
        &b_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      xmlns:a="urn:a" targetNamespace="urn:b">
             <xs:import namespace="urn:a"/>
             <xs:complexType name="bType">
               <xs:sequence>
                 <xs:element name="leaf" type="a:aLeaf"/>
               </xs:sequence>
             </xs:complexType>
           </xs:schema>"#,
    )
    .unwrap();

    let mut reader = SchemaReader::new();
    let root = reader.read_file(a_path.to_str().unwrap()).unwrap();
    let set = reader.schema_set();

    let b_type = set.find_type(root, "bType", Some("urn:b")).unwrap();
    let leaf = set.type_node(b_type).elements()[0];
    let leaf_type = set.element_type(leaf).unwrap();
    assert_eq!(set.type_node(leaf_type).name(), Some("aLeaf"));
}

#[test]
fn reimporting_the_entry_document_reuses_it() {
    let dir = tempfile::tempdir().unwrap();
    let a_path = dir.path().join("a.xsd");
    let b_path = dir.path().join("b.xsd");

    fs::write(
        &a_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      targetNamespace="urn:a">
             <xs:import namespace="urn:b" schemaLocation="b.xsd"/>
             <xs:simpleType name="aLeaf">
               <xs:restriction base="xs:string"/>
             </xs:simpleType>
           </xs:schema>"#,
    )
    .unwrap();
    fs::write(
        &b_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      targetNamespace="urn:b">
             <xs:import namespace="urn:a" schemaLocation="a.xsd"/>
           </xs:schema>"#,
    )
    .unwrap();

    let mut reader = SchemaReader::new();
    let root = reader.read_file(a_path.to_str().unwrap()).unwrap();
    let set = reader.schema_set();

    // the back-import by location links the compiled root, it does not
    // re-parse the file into a second schema
    let a_count = set
        .schema_ids()
        .filter(|&id| set.schema(id).target_namespace() == Some("urn:a"))
        .count();
    assert_eq!(a_count, 1);
    assert!(set.find_type(root, "aLeaf", Some("urn:a")).is_ok());
}

#[test]
fn unqualified_names_stay_out_of_namespaced_schemas() {
    // no target namespace and no default namespace: a bare type name
    // carries no namespace and must not match the XSD built-ins
    let mut reader = SchemaReader::new();
    let err = reader
        .read_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="e" type="string"/>
               </xs:schema>"#,
            "bare.xsd",
        )
        .unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("string"), "{msg}");
}

#[test]
fn known_location_overrides_replace_remote_urls() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("types.xsd");
    fs::write(
        &local,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      targetNamespace="urn:remote">
             <xs:simpleType name="t">
               <xs:restriction base="xs:string"/>
             </xs:simpleType>
           </xs:schema>"#,
    )
    .unwrap();

    let mut reader = SchemaReader::new();
    reader.add_known_schema_location(
        "http://example.com/types.xsd",
        local.to_str().unwrap(),
    );
    let root = reader
        .read_string(
            &wrap(r#"<xs:import namespace="urn:remote"
                                schemaLocation="http://example.com/types.xsd"/>"#),
            "main.xsd",
        )
        .unwrap();
    assert!(reader
        .schema_set()
        .find_type(root, "t", Some("urn:remote"))
        .is_ok());
}

#[test]
fn namespace_location_fallback_feeds_location_free_imports() {
    let dir = tempfile::tempdir().unwrap();
    let ext = dir.path().join("ext.xsd");
    fs::write(
        &ext,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      targetNamespace="urn:ext">
             <xs:simpleType name="t">
               <xs:restriction base="xs:string"/>
             </xs:simpleType>
           </xs:schema>"#,
    )
    .unwrap();

    let mut reader = SchemaReader::new();
    reader.add_known_namespace_schema_location("urn:ext", ext.to_str().unwrap());
    let root = reader
        .read_string(&wrap(r#"<xs:import namespace="urn:ext"/>"#), "main.xsd")
        .unwrap();
    assert!(reader
        .schema_set()
        .find_type(root, "t", Some("urn:ext"))
        .is_ok());
}

#[test]
fn repeated_imports_load_the_document_once() {
    let dir = tempfile::tempdir().unwrap();
    let shared_path = dir.path().join("shared.xsd");
    let main_path = dir.path().join("main.xsd");

    fs::write(
        &shared_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      targetNamespace="urn:shared">
             <xs:simpleType name="token">
               <xs:restriction base="xs:string"/>
             </xs:simpleType>
           </xs:schema>"#,
    )
    .unwrap();
    fs::write(
        &main_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      targetNamespace="urn:main">
             <xs:import namespace="urn:shared" schemaLocation="shared.xsd"/>
             <xs:import namespace="urn:shared" schemaLocation="./shared.xsd"/>
           </xs:schema>"#,
    )
    .unwrap();

    let mut reader = SchemaReader::new();
    let root = reader.read_file(main_path.to_str().unwrap()).unwrap();
    let set = reader.schema_set();

    assert!(set.find_type(root, "token", Some("urn:shared")).is_ok());
    let shared_count = set
        .schema_ids()
        .filter(|&id| set.schema(id).target_namespace() == Some("urn:shared"))
        .count();
    assert_eq!(shared_count, 1, "both imports must share one schema");
}

#[test]
fn includes_inherit_the_including_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let inc_path = dir.path().join("inc.xsd");
    let main_path = dir.path().join("main.xsd");

    fs::write(
        &inc_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
             <xs:simpleType name="incType">
               <xs:restriction base="xs:string"/>
             </xs:simpleType>
           </xs:schema>"#,
    )
    .unwrap();
    fs::write(
        &main_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                      targetNamespace="urn:m">
             <xs:include schemaLocation="inc.xsd"/>
           </xs:schema>"#,
    )
    .unwrap();

    let mut reader = SchemaReader::new();
    let root = reader.read_file(main_path.to_str().unwrap()).unwrap();
    let set = reader.schema_set();

    // the included declarations live in the including schema's namespace
    let inc_type = set.find_type(root, "incType", Some("urn:m")).unwrap();
    assert_eq!(set.type_node(inc_type).schema(), root);
}

#[test]
fn batched_documents_may_import_each_other_by_namespace() {
    let one = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                            xmlns:two="urn:two" targetNamespace="urn:one">
                   <xs:import namespace="urn:two"/>
                   <xs:element name="a" type="two:t"/>
                 </xs:schema>"#;
    let two = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                            targetNamespace="urn:two">
                   <xs:simpleType name="t">
                     <xs:restriction base="xs:string"/>
                   </xs:simpleType>
                 </xs:schema>"#;

    let mut reader = SchemaReader::new();
    let docs = vec![
        NodeHandle::root(Rc::new(Document::parse(one, "one.xsd").unwrap())),
        NodeHandle::root(Rc::new(Document::parse(two, "two.xsd").unwrap())),
    ];
    let root = reader.read_nodes(docs).unwrap();
    let set = reader.schema_set();

    let t = set.find_type(root, "t", Some("urn:two")).unwrap();
    let a = set.find_element(root, "a", Some("urn:one")).unwrap();
    assert_eq!(set.element_type(a), Some(t));
}

// ---- occurrence bounds, property-based --------------------------------

proptest! {
    #[test]
    fn occurrence_bounds_stay_consistent(
        min in 0i32..6,
        max in prop_oneof![
            Just(None),
            (0i32..6).prop_map(|m| Some(m.to_string())),
            Just(Some("unbounded".to_string())),
        ],
    ) {
        let mut attrs = format!(r#"minOccurs="{min}""#);
        if let Some(max) = &max {
            attrs.push_str(&format!(r#" maxOccurs="{max}""#));
        }
        let (reader, root) = compile(&format!(
            r#"<xs:complexType name="c">
                 <xs:sequence>
                   <xs:element name="e" type="xs:string" {attrs}/>
                 </xs:sequence>
               </xs:complexType>"#
        ));
        let set = reader.schema_set();
        let c = set.find_type(root, "c", Some(TNS)).unwrap();
        let occurs = set.element_node(set.type_node(c).elements()[0]).occurs().unwrap();
        prop_assert!(occurs.max() == UNBOUNDED || occurs.min() <= occurs.max());
        prop_assert_eq!(occurs.min(), min);
    }
}
