//! Per-document validation against a compiled schema.
//!
//! Type and fixed-value failures are reported immediately, on the first
//! offending field. Missing required fields are batched: the scan over required
//! fields completes first, then a single error lists every absent key in
//! declaration order.

use std::path::Path;

use serde_yaml::Value;

use crate::compile::render;
use crate::error::{Result, ValidationError};
use crate::types::{CompiledSchema, Document, FieldType, value_type_name};

/// Validates one decoded document.
///
/// # Errors
///
/// - [`TypeMismatch`](crate::ErrorKind::TypeMismatch) for the first present
///   field whose runtime type differs from its declared type.
/// - [`ValueMismatch`](crate::ErrorKind::ValueMismatch) for the first present
///   field whose value differs from its declared fixed value.
/// - [`MissingFields`](crate::ErrorKind::MissingFields) listing every absent
///   required field.
///
/// # Examples
///
/// ```
/// use content_schema_core::{ErrorKind, compile_schema, validate_document};
///
/// let raw: Vec<serde_yaml::Value> = serde_yaml::from_str(
///     "- name: [{type: str}]\n- born: [{type: int}]\n",
/// ).unwrap();
/// let schema = compile_schema(&raw, "authors/*.md", "content-schema.yml").unwrap();
///
/// let doc = serde_yaml::from_str("name: Alice\nborn: 1815\n").unwrap();
/// assert!(validate_document(&doc, &schema, "authors/a.md").is_ok());
///
/// let doc = serde_yaml::from_str("nickname: Al\n").unwrap();
/// let err = validate_document(&doc, &schema, "authors/a.md").unwrap_err();
/// assert_eq!(err.kind, ErrorKind::MissingFields);
/// assert!(err.message.contains("name") && err.message.contains("born"));
/// ```
pub fn validate_document(
    doc: &Document,
    schema: &CompiledSchema,
    file: impl AsRef<Path>,
) -> Result<()> {
    let file = file.as_ref();
    let mut missing = Vec::new();

    for (key, field_type) in schema.required() {
        match doc.get(key) {
            None => missing.push(key),
            Some(value) => check_field(key, value, field_type, "required", schema, file)?,
        }
    }

    if !missing.is_empty() {
        return Err(ValidationError::missing_fields(
            file,
            format!(
                "error parsing file {}: required keys not found: {}",
                file.display(),
                missing.join(", ")
            ),
        ));
    }

    for (key, field_type) in schema.optional() {
        if let Some(value) = doc.get(key) {
            check_field(key, value, field_type, "optional", schema, file)?;
        }
    }

    Ok(())
}

fn check_field(
    key: &str,
    value: &Value,
    field_type: FieldType,
    placement: &str,
    schema: &CompiledSchema,
    file: &Path,
) -> Result<()> {
    if !field_type.matches(value) {
        return Err(ValidationError::type_mismatch(
            file,
            format!(
                "error parsing file {}: {placement} key {key} has invalid type {} \
                 which should be {field_type}",
                file.display(),
                value_type_name(value)
            ),
        ));
    }

    if let Some(expected) = schema.fixed_value(key) {
        if value != expected {
            return Err(ValidationError::value_mismatch(
                file,
                format!(
                    "error parsing file {}: {placement} key {key} has value {} \
                     which should be {}",
                    file.display(),
                    render(value),
                    render(expected)
                ),
            ));
        }
    }

    Ok(())
}
