//! Cross-document uniqueness enforcement within one collection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::compile::render;
use crate::error::{Result, ValidationError};
use crate::types::Document;

/// Tracks values of unique fields across the documents of a collection.
///
/// Each value is written once; seeing it again is a
/// [`DuplicateUniqueValue`](crate::ErrorKind::DuplicateUniqueValue) error,
/// never an overwrite. Values compare by deep equality. Create one tracker
/// per collection.
///
/// # Examples
///
/// ```
/// use content_schema_core::{ErrorKind, UniquenessTracker};
///
/// let mut tracker = UniquenessTracker::new(vec!["slug".to_string()]);
/// let a = serde_yaml::from_str("slug: intro\n").unwrap();
/// let b = serde_yaml::from_str("slug: intro\n").unwrap();
///
/// tracker.check(&a, "posts/a.md").unwrap();
/// let err = tracker.check(&b, "posts/b.md").unwrap_err();
/// assert_eq!(err.kind, ErrorKind::DuplicateUniqueValue);
/// assert!(err.message.contains("posts/a.md"));
/// ```
#[derive(Debug, Default)]
pub struct UniquenessTracker {
    fields: Vec<String>,
    index: HashMap<String, HashMap<Value, PathBuf>>,
}

impl UniquenessTracker {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            index: HashMap::new(),
        }
    }

    /// Records the unique-field values of `doc`, found in `file`.
    ///
    /// Fields absent from the document are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateUniqueValue`](crate::ErrorKind::DuplicateUniqueValue)
    /// naming `file` and the file that first produced the value.
    pub fn check(&mut self, doc: &Document, file: impl AsRef<Path>) -> Result<()> {
        let file = file.as_ref();
        for field in &self.fields {
            let Some(value) = doc.get(field.as_str()) else {
                continue;
            };
            let seen = self.index.entry(field.clone()).or_default();
            if let Some(first) = seen.get(value) {
                return Err(ValidationError::duplicate_unique_value(
                    file,
                    format!(
                        "error parsing file {}: unique key {field} has value {} \
                         already used by {}",
                        file.display(),
                        render(value),
                        first.display()
                    ),
                ));
            }
            debug!(field = %field, file = %file.display(), "Recorded unique value");
            seen.insert(value.clone(), file.to_path_buf());
        }
        Ok(())
    }

    /// Number of distinct values recorded for `field`.
    pub fn seen(&self, field: &str) -> usize {
        self.index.get(field).map_or(0, HashMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn doc(yaml: &str) -> Document {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_distinct_values_pass() {
        let mut tracker = UniquenessTracker::new(vec!["slug".into()]);
        tracker.check(&doc("slug: a\n"), "a.md").unwrap();
        tracker.check(&doc("slug: b\n"), "b.md").unwrap();
        assert_eq!(tracker.seen("slug"), 2);
    }

    #[test]
    fn test_duplicate_names_both_files() {
        let mut tracker = UniquenessTracker::new(vec!["slug".into()]);
        tracker.check(&doc("slug: foo\n"), "posts/one.md").unwrap();
        let err = tracker.check(&doc("slug: foo\n"), "posts/two.md").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateUniqueValue);
        assert_eq!(err.file, Path::new("posts/two.md"));
        assert!(err.message.contains("posts/two.md"));
        assert!(err.message.contains("posts/one.md"));
    }

    #[test]
    fn test_deep_equality_on_lists() {
        let mut tracker = UniquenessTracker::new(vec!["coords".into()]);
        tracker.check(&doc("coords: [1, 2]\n"), "a.md").unwrap();
        tracker.check(&doc("coords: [2, 1]\n"), "b.md").unwrap();
        let err = tracker.check(&doc("coords:\n  - 1\n  - 2\n"), "c.md").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateUniqueValue);
    }

    #[test]
    fn test_values_do_not_collide_across_fields() {
        let mut tracker = UniquenessTracker::new(vec!["slug".into(), "alias".into()]);
        tracker.check(&doc("slug: x\nalias: y\n"), "a.md").unwrap();
        tracker.check(&doc("slug: y\nalias: x\n"), "b.md").unwrap();
    }

    #[test]
    fn test_absent_fields_are_skipped() {
        let mut tracker = UniquenessTracker::new(vec!["slug".into()]);
        tracker.check(&doc("title: a\n"), "a.md").unwrap();
        tracker.check(&doc("title: a\n"), "b.md").unwrap();
        assert_eq!(tracker.seen("slug"), 0);
    }

    #[test]
    fn test_string_and_int_are_different_values() {
        let mut tracker = UniquenessTracker::new(vec!["id".into()]);
        tracker.check(&doc("id: 1\n"), "a.md").unwrap();
        tracker.check(&doc("id: \"1\"\n"), "b.md").unwrap();
    }
}
