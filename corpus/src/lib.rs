//! Filesystem side of content validation.
//!
//! This crate loads the validation configuration from a content repository,
//! resolves each collection's file pattern, decodes the YAML documents held by
//! every matched file, and drives the rules from [`content_schema_core`] over
//! them.
//!
//! # Quick start
//!
//! ```no_run
//! use content_schema_corpus::Runner;
//!
//! // Reads `site/content-schema.yml` and validates every collection.
//! let report = Runner::new("site/").run().unwrap();
//! println!(
//!     "{} file(s), {} document(s) valid",
//!     report.total_files(),
//!     report.total_documents()
//! );
//! ```
//!
//! The building blocks are public for callers that need a single step:
//! [`ConfigLoader`], [`resolve_files`], [`decode_file`], and
//! [`validate_collection`].

mod config;
mod decode;
mod resolve;
mod runner;

pub use config::{Collection, Config, ConfigLoader, DEFAULT_CONFIG_NAME};
pub use decode::{decode_file, decode_str};
pub use resolve::resolve_files;
pub use runner::{CollectionReport, Phase, Progress, RunReport, Runner, validate_collection};
