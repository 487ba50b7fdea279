//! Decoding of structured-text documents embedded in files.
//!
//! A file holds a YAML stream: zero or more documents separated by `---`
//! markers. Empty documents are dropped; every remaining document must be a
//! mapping from field name to value.
//!
//! Markdown content puts its metadata in a leading `---` block and follows it
//! with a prose body. Once a file has produced a mapping, a later document that
//! decodes to a plain string is that body and is skipped.

use std::path::Path;

use content_schema_core::{Document, Result, ValidationError, value_type_name};
use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

/// Reads and decodes every non-empty document in `path`.
///
/// # Errors
///
/// Returns [`Corrupted`](content_schema_core::ErrorKind::Corrupted) naming the
/// file if it cannot be read, is not valid YAML, or holds a non-empty document
/// that is neither a mapping nor a prose body following one.
pub fn decode_file(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|err| {
        ValidationError::corrupted(path, format!("failed to read {}: {err}", path.display()))
    })?;
    decode_str(&text, path)
}

/// Decodes every non-empty document in `text`, attributing errors to `path`.
///
/// # Examples
///
/// ```
/// use content_schema_corpus::decode_str;
///
/// let docs = decode_str("title: One\n---\n---\ntitle: Two\n", "post.md").unwrap();
/// assert_eq!(docs.len(), 2);
/// assert!(decode_str("", "empty.md").unwrap().is_empty());
///
/// let post = decode_str("---\ntitle: Hello\n---\n\nSome prose here.\n", "post.md").unwrap();
/// assert_eq!(post.len(), 1);
/// ```
pub fn decode_str(text: &str, path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let mut documents = Vec::new();
    let mut after_metadata = false;

    for (index, deserializer) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let value = Value::deserialize(deserializer).map_err(|err| {
            ValidationError::corrupted(
                path,
                format!("malformed document in {}: {err}", path.display()),
            )
        })?;
        match value {
            Value::Null => {}
            Value::Mapping(mapping) => {
                after_metadata = true;
                if !mapping.is_empty() {
                    documents.push(mapping);
                }
            }
            Value::String(body) if after_metadata => {
                debug!(
                    file = %path.display(),
                    document = index + 1,
                    chars = body.chars().count(),
                    "Skipping prose body"
                );
            }
            other => {
                return Err(ValidationError::corrupted(
                    path,
                    format!(
                        "document {} in {} is a {}, expected a mapping of fields",
                        index + 1,
                        path.display(),
                        value_type_name(&other)
                    ),
                ));
            }
        }
    }

    debug!(file = %path.display(), documents = documents.len(), "Decoded file");
    Ok(documents)
}
