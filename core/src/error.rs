//! Error taxonomy for content validation.
//!
//! Every failure the engine can raise is a [`ValidationError`] carrying a
//! machine-distinguishable [`ErrorKind`], a human-readable message, and the
//! file the failure is attributed to. All kinds are fatal: callers stop at the
//! first error and report it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Failure class of a [`ValidationError`].
///
/// # Examples
///
/// ```
/// use content_schema_core::ErrorKind;
///
/// assert_eq!(ErrorKind::MissingFields.as_str(), "missing-fields");
/// assert_eq!(ErrorKind::NotFound.exit_code(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Configuration file absent, or a pattern matched no files.
    NotFound,
    /// A file decodes to no usable document or is structurally malformed.
    Corrupted,
    /// Required fields absent from a document, or a schema declaration
    /// missing its type.
    MissingFields,
    /// A value's runtime type disagrees with its declared type.
    TypeMismatch,
    /// A value disagrees with a declared fixed value.
    ValueMismatch,
    /// A filename fails its collection's regex.
    FilenameMismatch,
    /// A unique field value repeats within a collection.
    DuplicateUniqueValue,
}

impl ErrorKind {
    /// Stable kebab-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::Corrupted => "corrupted",
            Self::MissingFields => "missing-fields",
            Self::TypeMismatch => "type-mismatch",
            Self::ValueMismatch => "value-mismatch",
            Self::FilenameMismatch => "filename-mismatch",
            Self::DuplicateUniqueValue => "duplicate-unique-value",
        }
    }

    /// Process exit status a front end should use for this kind.
    ///
    /// `0` is success, `1` is left for failures outside the taxonomy and `2`
    /// for command-line usage errors.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::NotFound => 3,
            Self::Corrupted => 4,
            Self::MissingFields => 5,
            Self::TypeMismatch => 6,
            Self::ValueMismatch => 7,
            Self::FilenameMismatch => 8,
            Self::DuplicateUniqueValue => 9,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fatal validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Failure class.
    pub kind: ErrorKind,
    /// Message naming the offending file, field, or pattern.
    pub message: String,
    /// File the failure is attributed to.
    pub file: PathBuf,
}

impl ValidationError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: file.as_ref().to_path_buf(),
        }
    }

    pub fn not_found(file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, file, message)
    }

    pub fn corrupted(file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Corrupted, file, message)
    }

    pub fn missing_fields(file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingFields, file, message)
    }

    pub fn type_mismatch(file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, file, message)
    }

    pub fn value_mismatch(file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValueMismatch, file, message)
    }

    pub fn filename_mismatch(file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FilenameMismatch, file, message)
    }

    pub fn duplicate_unique_value(file: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateUniqueValue, file, message)
    }
}

/// Convenience alias for results with [`ValidationError`].
pub type Result<T> = std::result::Result<T, ValidationError>;
