//! Documentation extraction
//!
//! Reads the human-readable text of `annotation/documentation` children.
//! Pure text cleanup, stateless; the reader accepts a custom implementation
//! for schemas that carry documentation in a non-standard shape.

use crate::documents::Node;
use once_cell::sync::Lazy;
use regex::Regex;

static HORIZONTAL_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\t ]+").unwrap());

/// Extracts documentation text from a schema node
pub trait DocumentationReader {
    /// Concatenated, whitespace-normalized documentation text of `node`
    /// (possibly empty).
    fn get(&self, node: Node<'_>) -> String;
}

/// The standard `annotation/documentation` extractor
#[derive(Debug, Default)]
pub struct StandardDocumentationReader;

impl DocumentationReader for StandardDocumentationReader {
    fn get(&self, node: Node<'_>) -> String {
        let mut doc = String::new();

        for child in node.children() {
            if child.local_name() != "annotation" {
                continue;
            }
            for sub_child in child.children() {
                if sub_child.local_name() != "documentation" {
                    continue;
                }
                if !doc.is_empty() {
                    doc.push('\n');
                }
                doc.push_str(&sub_child.text_content());
            }
        }

        HORIZONTAL_WHITESPACE
            .replace_all(&doc, " ")
            .trim()
            .to_string()
    }
}
