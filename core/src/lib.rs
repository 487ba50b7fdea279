//! Core schema model and validation rules for content collections.
//!
//! This crate holds the pieces of content validation that do not touch the
//! filesystem:
//!
//! - [`compile_schema`] — turns a collection's declarative field list into a
//!   [`CompiledSchema`] (required/optional field types, fixed values, unique
//!   fields).
//! - [`validate_document`] — checks one decoded [`Document`] for presence,
//!   type, and fixed-value constraints.
//! - [`FilenameRule`] — checks a file's base name against an optional regex.
//! - [`UniquenessTracker`] — rejects repeated values of unique fields within a
//!   collection.
//!
//! Every failure is a [`ValidationError`] tagged with an [`ErrorKind`].
//!
//! # Example
//!
//! ```
//! use content_schema_core::*;
//!
//! let raw: Vec<serde_yaml::Value> = serde_yaml::from_str(r#"
//! - name: [{type: str}]
//! - slug:
//!     - type: str
//!     - unique: true
//! "#).unwrap();
//! let schema = compile_schema(&raw, "authors/*.md", "content-schema.yml").unwrap();
//!
//! let doc: Document = serde_yaml::from_str("name: Alice\nslug: alice\n").unwrap();
//! validate_document(&doc, &schema, "authors/alice.md").unwrap();
//!
//! let mut tracker = UniquenessTracker::new(schema.unique_fields());
//! tracker.check(&doc, "authors/alice.md").unwrap();
//! assert!(tracker.check(&doc, "authors/alice-copy.md").is_err());
//! ```

mod compile;
mod error;
mod filename;
mod types;
mod unique;
mod validate;

pub use compile::compile_schema;
pub use error::{ErrorKind, Result, ValidationError};
pub use filename::FilenameRule;
pub use types::{CompiledSchema, Document, FieldSpec, FieldType, value_type_name};
pub use unique::UniquenessTracker;
pub use validate::validate_document;
