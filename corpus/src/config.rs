//! Validation configuration.
//!
//! The configuration lives in a single YAML file at the root of the content
//! repository (by default `content-schema.yml`) and declares the collections
//! to validate.
//!
//! # Example YAML
//!
//! ```yaml
//! collections:
//!   - filepattern: content/authors/*.md
//!     filename_regex: "^[a-z-]+\\.md$"
//!     schema:
//!       - name:
//!           - type: str
//!       - slug:
//!           - type: str
//!           - unique: true
//!       - tags:
//!           - type: list
//!           - required: false
//! ```

use std::path::PathBuf;

use content_schema_core::{
    CompiledSchema, FieldSpec, FieldType, Result, ValidationError, validate_document,
};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::decode::decode_file;

/// File name looked up under the root directory when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "content-schema.yml";

/// One declared content group.
///
/// The schema is kept as raw declarations; compiling it into field rules is
/// left to [`compile_schema`](content_schema_core::compile_schema) when the
/// collection is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Glob matched against paths relative to the root directory.
    pub filepattern: String,
    /// Raw field declarations, in order.
    pub schema: Vec<Value>,
    /// Regex every matched file's base name must satisfy.
    #[serde(default)]
    pub filename_regex: Option<String>,
}

/// Loaded configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub root_dir: PathBuf,
    pub config_path: PathBuf,
    /// Collections in declaration order.
    pub collections: Vec<Collection>,
}

/// Locates, decodes, and shape-checks the configuration file.
///
/// # Examples
///
/// ```no_run
/// use content_schema_corpus::ConfigLoader;
///
/// let config = ConfigLoader::new("site/").load().unwrap();
/// for collection in &config.collections {
///     println!("{}", collection.filepattern);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root_dir: PathBuf,
    config_name: String,
}

impl ConfigLoader {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            config_name: DEFAULT_CONFIG_NAME.to_string(),
        }
    }

    /// Overrides the configuration file name.
    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = name.into();
        self
    }

    /// Full path of the configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.root_dir.join(&self.config_name)
    }

    /// Loads the configuration.
    ///
    /// Only the first document of the file is used; later documents are
    /// ignored.
    ///
    /// # Errors
    ///
    /// - [`NotFound`](content_schema_core::ErrorKind::NotFound) if the file
    ///   does not exist.
    /// - [`Corrupted`](content_schema_core::ErrorKind::Corrupted) if it holds
    ///   no document, is malformed, or lists a collection that is not a mapping.
    /// - [`MissingFields`](content_schema_core::ErrorKind::MissingFields) /
    ///   [`TypeMismatch`](content_schema_core::ErrorKind::TypeMismatch) if
    ///   `collections` or a collection's keys are absent or mistyped.
    pub fn load(&self) -> Result<Config> {
        let config_path = self.config_path();
        if !config_path.is_file() {
            return Err(ValidationError::not_found(
                &config_path,
                format!(
                    "configuration not found: {} must be defined in the root directory",
                    config_path.display()
                ),
            ));
        }

        let mut documents = decode_file(&config_path)?.into_iter();
        let Some(document) = documents.next() else {
            return Err(ValidationError::corrupted(
                &config_path,
                format!("configuration {} is empty", config_path.display()),
            ));
        };
        let ignored = documents.count();
        if ignored > 0 {
            debug!(ignored, "Ignoring additional configuration documents");
        }

        validate_document(&document, &top_level_schema(), &config_path)?;
        let entries = document
            .get("collections")
            .and_then(Value::as_sequence)
            .cloned()
            .unwrap_or_default();

        let shape = collection_schema();
        let mut collections = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let Value::Mapping(mut mapping) = entry else {
                return Err(ValidationError::corrupted(
                    &config_path,
                    format!(
                        "collection {} in {} must be a mapping",
                        index + 1,
                        config_path.display()
                    ),
                ));
            };
            drop_null_optionals(&mut mapping, &shape);
            validate_document(&mapping, &shape, &config_path)?;
            let collection: Collection =
                serde_yaml::from_value(Value::Mapping(mapping)).map_err(|err| {
                    ValidationError::corrupted(
                        &config_path,
                        format!("collection {} is malformed: {err}", index + 1),
                    )
                })?;
            collections.push(collection);
        }

        debug!(
            config = %config_path.display(),
            collections = collections.len(),
            "Loaded configuration"
        );
        Ok(Config {
            root_dir: self.root_dir.clone(),
            config_path,
            collections,
        })
    }
}

fn field(name: &str, field_type: FieldType, required: bool) -> FieldSpec {
    FieldSpec {
        name: name.to_string(),
        field_type,
        required,
        fixed_value: None,
        unique: false,
    }
}

/// A key written with no value (`filename_regex:`) reads as absent.
fn drop_null_optionals(mapping: &mut Mapping, shape: &CompiledSchema) {
    for (name, _) in shape.optional() {
        if mapping.get(name).is_some_and(Value::is_null) {
            mapping.remove(name);
        }
    }
}

fn top_level_schema() -> CompiledSchema {
    CompiledSchema::from_fields([field("collections", FieldType::List, true)])
}

fn collection_schema() -> CompiledSchema {
    CompiledSchema::from_fields([
        field("filepattern", FieldType::Str, true),
        field("schema", FieldType::List, true),
        field("filename_regex", FieldType::Str, false),
    ])
}
