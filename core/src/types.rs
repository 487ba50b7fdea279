//! Field types and the compiled schema model.
//!
//! A collection's raw field declarations are compiled (see
//! [`compile_schema`](crate::compile_schema)) into a [`CompiledSchema`]: the
//! required and optional fields in declaration order, the fixed-value
//! constraints, and the set of fields whose values must be unique.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// One decoded unit of structured metadata from a content file.
pub type Document = Mapping;

/// Primitive type a schema field may declare.
///
/// # Examples
///
/// ```
/// use content_schema_core::FieldType;
/// use serde_yaml::Value;
///
/// let ty = FieldType::parse("int").unwrap();
/// assert_eq!(ty, FieldType::Int);
/// assert!(ty.matches(&Value::from(42)));
/// assert!(!ty.matches(&Value::from("42")));
/// assert!(FieldType::parse("float").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// `str`: a YAML string.
    Str,
    /// `int`: a YAML integer. Floats and booleans do not qualify.
    Int,
    /// `list`: a YAML sequence.
    List,
}

impl FieldType {
    /// Parses a schema type tag (`str`, `int`, `list`).
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "str" => Some(Self::Str),
            "int" => Some(Self::Int),
            "list" => Some(Self::List),
            _ => None,
        }
    }

    /// The tag as written in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::List => "list",
        }
    }

    /// Returns `true` if `value`'s runtime type is this type.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Str => value.is_string(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::List => value.is_sequence(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable runtime type name of a YAML value, used in messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

/// A fully merged field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    /// Defaults to `true`.
    pub required: bool,
    pub fixed_value: Option<Value>,
    /// Defaults to `false`.
    pub unique: bool,
}

/// Compiled form of a collection schema.
///
/// A field appears in exactly one of [`required`](Self::required) or
/// [`optional`](Self::optional). Fixed values apply wherever the field lives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledSchema {
    pub(crate) fields: Vec<FieldSpec>,
}

impl CompiledSchema {
    /// Builds a schema from merged field specs, in declaration order.
    ///
    /// A later spec with the same name replaces the earlier one in place.
    pub fn from_fields(specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        let mut fields: Vec<FieldSpec> = Vec::new();
        for spec in specs {
            match fields.iter_mut().find(|f| f.name == spec.name) {
                Some(existing) => *existing = spec,
                None => fields.push(spec),
            }
        }
        Self { fields }
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Required fields and their types, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| (f.name.as_str(), f.field_type))
    }

    /// Optional fields and their types, in declaration order.
    pub fn optional(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields
            .iter()
            .filter(|f| !f.required)
            .map(|f| (f.name.as_str(), f.field_type))
    }

    /// Fixed value declared for `name`, if any.
    pub fn fixed_value(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.fixed_value.as_ref())
    }

    /// Names of fields marked unique, in declaration order.
    pub fn unique_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.unique)
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
