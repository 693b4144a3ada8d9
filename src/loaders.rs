//! Document source loading
//!
//! The engine only needs two things from a document source: the raw bytes
//! of a resolved location and a stable key under which repeated requests
//! for the same location deduplicate. The production deployment backs this
//! with an HTTP fetch/disk-cache layer; the default implementation here
//! reads the local filesystem and refuses remote URLs.

use crate::error::{LoadError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Source of schema documents, keyed for deduplication
pub trait DocumentSource {
    /// Stable deduplication key for a resolved location.
    ///
    /// Two locations naming the same document must produce the same key;
    /// the engine uses it to detect "already loaded this exact document."
    fn key(&self, namespace: &str, location: &str) -> String;

    /// Fetch the document text at a resolved location
    fn fetch(&self, namespace: &str, location: &str) -> Result<String>;
}

/// Filesystem-backed document source
#[derive(Debug, Default)]
pub struct FileSource;

impl FileSource {
    fn is_remote(location: &str) -> bool {
        location.starts_with("http://") || location.starts_with("https://")
    }
}

impl DocumentSource for FileSource {
    fn key(&self, _namespace: &str, location: &str) -> String {
        if Self::is_remote(location) {
            return location.to_string();
        }
        fs::canonicalize(Path::new(location))
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| location.to_string())
    }

    fn fetch(&self, namespace: &str, location: &str) -> Result<String> {
        if Self::is_remote(location) {
            return Err(LoadError::new("remote schema locations are not resolvable")
                .with_location(location)
                .with_diagnostic(
                    "configure a known schema location mapping this URL to a local file",
                )
                .into());
        }

        debug!(namespace, location, "loading schema document");
        fs::read_to_string(location).map_err(|e| {
            LoadError::new(format!("can't load the file '{}'", location))
                .with_location(location)
                .with_diagnostic(e.to_string())
                .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_fetch_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<schema/>").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let source = FileSource;
        assert_eq!(source.fetch("", &path).unwrap(), "<schema/>");
    }

    #[test]
    fn test_key_is_stable_across_spellings() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let dotted = {
            let parent = file.path().parent().unwrap();
            parent
                .join(".")
                .join(file.path().file_name().unwrap())
                .to_string_lossy()
                .into_owned()
        };

        let source = FileSource;
        assert_eq!(source.key("", &path), source.key("", &dotted));
    }

    #[test]
    fn test_remote_refused() {
        let source = FileSource;
        let err = source
            .fetch("http://x", "http://example.com/schema.xsd")
            .unwrap_err();
        assert!(format!("{}", err).contains("not resolvable"));
    }

    #[test]
    fn test_missing_file() {
        let source = FileSource;
        assert!(source.fetch("", "/nonexistent/definitely-missing.xsd").is_err());
    }
}
