//! Schema compilation.
//!
//! Turns a collection's raw field declarations, as written in configuration,
//! into a [`CompiledSchema`]. Each declaration is a single-key mapping from
//! the field name to a list of metadata entries:
//!
//! ```yaml
//! - slug:
//!     - type: str
//!     - required: false
//!     - unique: true
//! ```
//!
//! The entries are merged into one record per field.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::error::{Result, ValidationError};
use crate::types::{CompiledSchema, FieldSpec, FieldType, value_type_name};

const KEY_TYPE: &str = "type";
const KEY_REQUIRED: &str = "required";
const KEY_VALUE: &str = "value";
const KEY_UNIQUE: &str = "unique";

/// Compiles raw field declarations for the collection matching `pattern`.
///
/// Errors are attributed to `config_path` and name the offending field and
/// pattern.
///
/// # Errors
///
/// - [`MissingFields`](crate::ErrorKind::MissingFields) when a declaration is
///   malformed, its metadata is not a list, or `type` is absent or unsupported.
/// - [`TypeMismatch`](crate::ErrorKind::TypeMismatch) when a declared `value`
///   does not have the declared type, or `required`/`unique` is not a boolean.
///
/// # Examples
///
/// ```
/// use content_schema_core::{FieldType, compile_schema};
///
/// let raw: Vec<serde_yaml::Value> = serde_yaml::from_str(r#"
/// - name:
///     - type: str
/// - tags:
///     - type: list
///     - required: false
/// "#).unwrap();
///
/// let schema = compile_schema(&raw, "authors/*.md", "content-schema.yml").unwrap();
/// assert_eq!(schema.required().collect::<Vec<_>>(), vec![("name", FieldType::Str)]);
/// assert_eq!(schema.optional().collect::<Vec<_>>(), vec![("tags", FieldType::List)]);
/// ```
pub fn compile_schema(
    fields: &[Value],
    pattern: &str,
    config_path: impl AsRef<Path>,
) -> Result<CompiledSchema> {
    let config_path = config_path.as_ref();
    let mut specs = Vec::with_capacity(fields.len());

    for declaration in fields {
        let (name, metadata) = split_declaration(declaration, pattern, config_path)?;
        let merged = merge_metadata(name, metadata, pattern, config_path)?;
        specs.push(compile_field(name, &merged, pattern, config_path)?);
    }

    let schema = CompiledSchema::from_fields(specs);
    debug!(
        pattern,
        fields = schema.len(),
        unique = ?schema.unique_fields(),
        "Compiled collection schema"
    );
    Ok(schema)
}

fn split_declaration<'a>(
    declaration: &'a Value,
    pattern: &str,
    config_path: &Path,
) -> Result<(&'a str, &'a Value)> {
    let malformed = || {
        ValidationError::missing_fields(
            config_path,
            format!(
                "invalid field declaration in schema for pattern {pattern}: \
                 expected a single `<field>: [metadata]` entry"
            ),
        )
    };

    let mapping = declaration.as_mapping().ok_or_else(malformed)?;
    if mapping.len() != 1 {
        return Err(malformed());
    }
    let (key, metadata) = mapping.iter().next().ok_or_else(malformed)?;
    let name = key.as_str().ok_or_else(malformed)?;
    Ok((name, metadata))
}

fn merge_metadata(
    name: &str,
    metadata: &Value,
    pattern: &str,
    config_path: &Path,
) -> Result<Mapping> {
    let not_a_list = || {
        ValidationError::missing_fields(
            config_path,
            format!("metadata for field {name} in pattern {pattern} must be a list"),
        )
    };

    let entries = metadata.as_sequence().ok_or_else(not_a_list)?;
    let mut merged = Mapping::new();
    for entry in entries {
        let entry = entry.as_mapping().ok_or_else(not_a_list)?;
        for (key, value) in entry {
            merged.insert(key.clone(), value.clone());
        }
    }
    Ok(merged)
}

fn compile_field(
    name: &str,
    merged: &Mapping,
    pattern: &str,
    config_path: &Path,
) -> Result<FieldSpec> {
    for key in merged.keys() {
        let known = key
            .as_str()
            .is_some_and(|k| matches!(k, KEY_TYPE | KEY_REQUIRED | KEY_VALUE | KEY_UNIQUE));
        if !known {
            warn!(field = name, pattern, key = ?key, "Ignoring unknown field metadata");
        }
    }

    let type_tag = merged.get(KEY_TYPE).ok_or_else(|| {
        ValidationError::missing_fields(
            config_path,
            format!("field {name} in pattern {pattern} is missing a type"),
        )
    })?;
    let field_type = type_tag
        .as_str()
        .and_then(FieldType::parse)
        .ok_or_else(|| {
            ValidationError::missing_fields(
                config_path,
                format!(
                    "field {name} in pattern {pattern} has unsupported type {}; \
                     expected one of str, int, list",
                    render(type_tag)
                ),
            )
        })?;

    let required = flag(merged, KEY_REQUIRED, true, name, pattern, config_path)?;
    let unique = flag(merged, KEY_UNIQUE, false, name, pattern, config_path)?;

    let fixed_value = merged.get(KEY_VALUE).cloned();
    if let Some(value) = &fixed_value {
        if !field_type.matches(value) {
            return Err(ValidationError::type_mismatch(
                config_path,
                format!(
                    "field {name} in pattern {pattern} declares value {} of type {} \
                     which should be {field_type}",
                    render(value),
                    value_type_name(value)
                ),
            ));
        }
    }

    Ok(FieldSpec {
        name: name.to_string(),
        field_type,
        required,
        fixed_value,
        unique,
    })
}

fn flag(
    merged: &Mapping,
    key: &str,
    default: bool,
    name: &str,
    pattern: &str,
    config_path: &Path,
) -> Result<bool> {
    match merged.get(key) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(ValidationError::type_mismatch(
            config_path,
            format!(
                "field {name} in pattern {pattern} has `{key}: {}` of type {} \
                 which should be bool",
                render(other),
                value_type_name(other)
            ),
        )),
    }
}

/// Renders a YAML value on one line for error messages.
pub(crate) fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().replace('\n', " "))
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn raw(yaml: &str) -> Vec<Value> {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn compile(yaml: &str) -> Result<CompiledSchema> {
        compile_schema(&raw(yaml), "posts/*.md", "content-schema.yml")
    }

    #[test]
    fn test_defaults_required_and_not_unique() {
        let schema = compile("- title:\n    - type: str\n").unwrap();
        let field = &schema.fields()[0];
        assert!(field.required);
        assert!(!field.unique);
        assert!(field.fixed_value.is_none());
    }

    #[test]
    fn test_merges_metadata_entries() {
        let schema = compile(
            r#"
- layout:
    - type: str
    - required: false
    - value: post
    - unique: true
"#,
        )
        .unwrap();
        assert_eq!(schema.required().count(), 0);
        assert_eq!(
            schema.optional().collect::<Vec<_>>(),
            vec![("layout", FieldType::Str)]
        );
        assert_eq!(schema.fixed_value("layout"), Some(&Value::from("post")));
        assert_eq!(schema.unique_fields(), vec!["layout".to_string()]);
    }

    #[test]
    fn test_preserves_declaration_order() {
        let schema = compile(
            r#"
- title: [{type: str}]
- weight: [{type: int}]
- tags: [{type: list}]
"#,
        )
        .unwrap();
        let names: Vec<&str> = schema.required().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["title", "weight", "tags"]);
    }

    #[test]
    fn test_metadata_not_a_list() {
        let err = compile("- title:\n    type: str\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingFields);
        assert!(err.message.contains("title"));
        assert!(err.message.contains("posts/*.md"));
        assert_eq!(err.file, Path::new("content-schema.yml"));
    }

    #[test]
    fn test_missing_type() {
        let err = compile("- title:\n    - required: false\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingFields);
        assert!(err.message.contains("missing a type"));
    }

    #[test]
    fn test_unsupported_type() {
        let err = compile("- title:\n    - type: float\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingFields);
        assert!(err.message.contains("unsupported type"));
    }

    #[test]
    fn test_fixed_value_type_mismatch() {
        let err = compile("- weight:\n    - type: int\n    - value: heavy\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert!(err.message.contains("weight"));
    }

    #[test]
    fn test_non_bool_required_flag() {
        let err = compile("- title:\n    - type: str\n    - required: maybe\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_multi_key_declaration_rejected() {
        let err = compile("- title: [{type: str}]\n  body: [{type: str}]\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingFields);
    }

    #[test]
    fn test_empty_schema() {
        let schema = compile("[]").unwrap();
        assert!(schema.is_empty());
    }
}
