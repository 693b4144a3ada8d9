//! XML name utilities
//!
//! QName splitting and namespace-scoped resolution for the `type`, `ref`,
//! `base` and `memberTypes` attributes of a schema document.

use crate::documents::Node;

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Split a possibly-prefixed name and resolve its namespace against the
/// prefix declarations in scope at `node`.
///
/// An unprefixed name resolves to the default namespace in scope, if any;
/// callers fall back to the owning schema's target namespace when nothing
/// is in scope.
pub fn split_parts<'a>(node: Node<'_>, qname: &'a str) -> (&'a str, Option<String>) {
    let (prefix, local) = split_qname(qname);
    let namespace = node.resolve_prefix(prefix).map(|ns| ns.to_string());
    (local, namespace)
}

/// Format a name in Clark notation (`{namespace}local`) for diagnostics
pub fn clark_name(namespace: Option<&str>, local: &str) -> String {
    match namespace {
        Some(ns) => format!("{{{}}}{}", ns, local),
        None => local.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("element"), (None, "element"));
        assert_eq!(split_qname("xs:element"), (Some("xs"), "element"));
    }

    #[test]
    fn test_split_parts_resolves_prefix() {
        let xml = r#"<root xmlns:xs="http://www.w3.org/2001/XMLSchema"/>"#;
        let doc = Document::parse(xml, "test.xsd").unwrap();
        let (name, ns) = split_parts(doc.root(), "xs:string");
        assert_eq!(name, "string");
        assert_eq!(ns.as_deref(), Some("http://www.w3.org/2001/XMLSchema"));
    }

    #[test]
    fn test_split_parts_unprefixed_uses_default_namespace() {
        let xml = r#"<root xmlns="http://example.com/ns"/>"#;
        let doc = Document::parse(xml, "test.xsd").unwrap();
        let (name, ns) = split_parts(doc.root(), "myType");
        assert_eq!(name, "myType");
        assert_eq!(ns.as_deref(), Some("http://example.com/ns"));
    }

    #[test]
    fn test_split_parts_no_default_namespace() {
        let doc = Document::parse("<root/>", "test.xsd").unwrap();
        let (name, ns) = split_parts(doc.root(), "myType");
        assert_eq!(name, "myType");
        assert_eq!(ns, None);
    }

    #[test]
    fn test_clark_name() {
        assert_eq!(clark_name(Some("http://x"), "a"), "{http://x}a");
        assert_eq!(clark_name(None, "a"), "a");
    }
}
