//! Resource location resolution
//!
//! Resolves `schemaLocation` values against the URI of the document that
//! declared the import or include.

use std::path::Path;
use url::Url;

/// Resolve a possibly-relative location against a base document URI.
///
/// An empty location resolves to the base itself (an import without a
/// usable location deduplicates against the importing document). Absolute
/// URLs pass through; relative references are joined against the base when
/// it parses as a URL, and treated as sibling file paths otherwise.
pub fn resolve_relative_url(base: &str, location: &str) -> String {
    if location.is_empty() {
        return base.to_string();
    }

    if let Ok(url) = Url::parse(location) {
        // A successful parse with a scheme means the location is absolute.
        if !url.cannot_be_a_base() || url.scheme() == "file" {
            return url.to_string();
        }
    }

    if let Ok(base_url) = Url::parse(base) {
        if let Ok(joined) = base_url.join(location) {
            return joined.to_string();
        }
    }

    let parent = Path::new(base).parent().unwrap_or_else(|| Path::new(""));
    parent.join(location).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_url_base() {
        assert_eq!(
            resolve_relative_url("http://example.com/a/schema.xsd", "types.xsd"),
            "http://example.com/a/types.xsd"
        );
        assert_eq!(
            resolve_relative_url("http://example.com/a/schema.xsd", "../common/types.xsd"),
            "http://example.com/common/types.xsd"
        );
    }

    #[test]
    fn test_absolute_location_passes_through() {
        assert_eq!(
            resolve_relative_url("/tmp/schema.xsd", "http://example.com/types.xsd"),
            "http://example.com/types.xsd"
        );
    }

    #[test]
    fn test_resolve_against_path_base() {
        assert_eq!(
            resolve_relative_url("/tmp/schemas/schema.xsd", "types.xsd"),
            "/tmp/schemas/types.xsd"
        );
    }

    #[test]
    fn test_empty_location_yields_base() {
        assert_eq!(
            resolve_relative_url("/tmp/schema.xsd", ""),
            "/tmp/schema.xsd"
        );
    }
}
