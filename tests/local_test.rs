//! Locality flags: references to top-level elements stay non-local, inline
//! declarations inside a content model are local.

use pretty_assertions::assert_eq;
use xsdreader::schema::ElementNode;
use xsdreader::SchemaReader;

const TNS: &str = "http://www.example.com";

const SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:ns="http://www.example.com"
           targetNamespace="http://www.example.com"
           elementFormDefault="qualified">
  <xs:complexType name="type1">
    <xs:sequence>
      <xs:element ref="ns:el1"/>
    </xs:sequence>
  </xs:complexType>
  <xs:element name="el1" type="ns:type2"/>
  <xs:complexType name="type2">
    <xs:sequence>
      <xs:element name="data" type="xs:string"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#;

#[test]
fn references_to_top_level_elements_are_not_local() {
    let mut reader = SchemaReader::new();
    let root = reader.read_string(SCHEMA, "local.xsd").unwrap();
    let set = reader.schema_set();

    let type1 = set.find_type(root, "type1", Some(TNS)).unwrap();
    let children = set.type_node(type1).elements();
    assert_eq!(children.len(), 1);

    let reference = children[0];
    let element_ref = match set.element_node(reference) {
        ElementNode::Ref(r) => r,
        other => panic!("expected an element reference, got {:?}", other),
    };
    assert!(!set.element_node(reference).is_local());
    assert_eq!(set.element_name(reference), Some("el1"));

    // the reference leads to the top-level definition, typed type2
    let definition = element_ref.referenced;
    let type2 = set.find_type(root, "type2", Some(TNS)).unwrap();
    assert_eq!(set.element_type(definition), Some(type2));
    assert_eq!(set.element_type(reference), Some(type2));
}

#[test]
fn inline_declarations_are_local() {
    let mut reader = SchemaReader::new();
    let root = reader.read_string(SCHEMA, "local.xsd").unwrap();
    let set = reader.schema_set();

    let type2 = set.find_type(root, "type2", Some(TNS)).unwrap();
    let children = set.type_node(type2).elements();
    assert_eq!(children.len(), 1);

    let data = children[0];
    match set.element_node(data) {
        ElementNode::Local(local) => {
            assert_eq!(local.item.name(), "data");
            assert!(local.flags.local);
        }
        other => panic!("expected a local element, got {:?}", other),
    }

    // the top-level definition itself carries no locality
    let el1 = set.find_element(root, "el1", Some(TNS)).unwrap();
    assert!(!set.element_node(el1).is_local());
}
