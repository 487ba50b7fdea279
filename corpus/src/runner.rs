//! Run orchestration.
//!
//! A run loads the configuration, then takes every collection, in declaration
//! order, through four phases:
//!
//! 1. [`Phase::FilesResolved`] — the file pattern must match at least one file.
//! 2. [`Phase::TypesValidated`] — every document satisfies the compiled schema.
//! 3. [`Phase::FilenamesValidated`] — every file name satisfies the regex.
//! 4. [`Phase::UniquenessValidated`] — unique fields never repeat.
//!
//! The first error ends the run; remaining phases and collections are skipped.
//! Uniqueness does not depend on type validity, the phase order is fixed so
//! that runs report failures in a predictable sequence.
//!
//! ```no_run
//! use content_schema_corpus::Runner;
//!
//! match Runner::new("site/").run() {
//!     Ok(report) => println!("{} collection(s) passed", report.collections.len()),
//!     Err(err) => eprintln!("{} ({})", err, err.kind),
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use content_schema_core::{
    CompiledSchema, FilenameRule, Result, UniquenessTracker, ValidationError, compile_schema,
    validate_document,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Collection, Config, ConfigLoader};
use crate::decode::decode_file;
use crate::resolve::resolve_files;

/// Per-collection validation phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    FilesResolved,
    TypesValidated,
    FilenamesValidated,
    UniquenessValidated,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::FilesResolved,
        Phase::TypesValidated,
        Phase::FilenamesValidated,
        Phase::UniquenessValidated,
    ];

    /// Short human-readable description.
    pub fn describe(self) -> &'static str {
        match self {
            Self::FilesResolved => "files exist",
            Self::TypesValidated => "fields and types valid",
            Self::FilenamesValidated => "filenames valid",
            Self::UniquenessValidated => "unique values valid",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Progress notification emitted while a run advances.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    ConfigLoaded {
        config_path: &'a Path,
        collections: usize,
    },
    PhasePassed {
        filepattern: &'a str,
        phase: Phase,
    },
}

/// Outcome of one collection that passed every phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub filepattern: String,
    pub files: usize,
    pub documents: usize,
    pub phases: Vec<Phase>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub root_dir: PathBuf,
    pub config_path: PathBuf,
    pub collections: Vec<CollectionReport>,
}

impl RunReport {
    pub fn total_files(&self) -> usize {
        self.collections.iter().map(|c| c.files).sum()
    }

    pub fn total_documents(&self) -> usize {
        self.collections.iter().map(|c| c.documents).sum()
    }
}

/// Validates a content repository against its configuration.
#[derive(Debug, Clone)]
pub struct Runner {
    loader: ConfigLoader,
}

impl Runner {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            loader: ConfigLoader::new(root_dir),
        }
    }

    /// Overrides the configuration file name.
    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.loader = self.loader.with_config_name(name);
        self
    }

    /// Runs every phase of every collection, stopping at the first error.
    pub fn run(&self) -> Result<RunReport> {
        self.run_with_progress(|_| {})
    }

    /// Like [`run`](Self::run), reporting progress to `on_progress`.
    pub fn run_with_progress<F>(&self, mut on_progress: F) -> Result<RunReport>
    where
        F: FnMut(Progress<'_>),
    {
        let config = self.loader.load()?;
        info!(
            config = %config.config_path.display(),
            collections = config.collections.len(),
            "Configuration loaded"
        );
        on_progress(Progress::ConfigLoaded {
            config_path: &config.config_path,
            collections: config.collections.len(),
        });

        let mut reports = Vec::with_capacity(config.collections.len());
        for collection in &config.collections {
            reports.push(validate_collection(&config, collection, &mut on_progress)?);
        }

        Ok(RunReport {
            root_dir: config.root_dir,
            config_path: config.config_path,
            collections: reports,
        })
    }
}

/// Takes one collection through all phases.
pub fn validate_collection<F>(
    config: &Config,
    collection: &Collection,
    on_progress: &mut F,
) -> Result<CollectionReport>
where
    F: FnMut(Progress<'_>),
{
    let pattern = collection.filepattern.as_str();
    let mut report = CollectionReport {
        filepattern: pattern.to_string(),
        files: 0,
        documents: 0,
        phases: Vec::with_capacity(Phase::ALL.len()),
    };
    let mut passed = |report: &mut CollectionReport, phase: Phase| {
        info!(pattern, %phase, "Phase passed");
        report.phases.push(phase);
        on_progress(Progress::PhasePassed {
            filepattern: pattern,
            phase,
        });
    };

    let files = check_files_exist(config, pattern)?;
    report.files = files.len();
    passed(&mut report, Phase::FilesResolved);

    let schema = compile_schema(&collection.schema, pattern, &config.config_path)?;
    report.documents = check_types(&schema, &files)?;
    passed(&mut report, Phase::TypesValidated);

    check_filenames(config, collection, &files)?;
    passed(&mut report, Phase::FilenamesValidated);

    check_uniqueness(&schema, &files)?;
    passed(&mut report, Phase::UniquenessValidated);

    Ok(report)
}

fn check_files_exist(config: &Config, pattern: &str) -> Result<BTreeSet<PathBuf>> {
    let files = resolve_files(&config.root_dir, pattern, &config.config_path)?;
    if files.is_empty() {
        return Err(ValidationError::not_found(
            &config.config_path,
            format!(
                "no files found matching pattern {pattern} under {}",
                config.root_dir.display()
            ),
        ));
    }
    Ok(files)
}

fn check_types(schema: &CompiledSchema, files: &BTreeSet<PathBuf>) -> Result<usize> {
    let mut documents = 0;
    for file in files {
        let docs = decode_file(file)?;
        if docs.is_empty() {
            debug!(file = %file.display(), "File holds no documents");
        }
        for doc in &docs {
            validate_document(doc, schema, file)?;
        }
        documents += docs.len();
    }
    Ok(documents)
}

fn check_filenames(
    config: &Config,
    collection: &Collection,
    files: &BTreeSet<PathBuf>,
) -> Result<()> {
    let rule = FilenameRule::new(collection.filename_regex.as_deref(), &config.config_path)?;
    if rule.pattern().is_none() {
        return Ok(());
    }
    files.iter().try_for_each(|file| rule.check(file))
}

/// Documents are decoded again here so none outlives the check of its file.
fn check_uniqueness(schema: &CompiledSchema, files: &BTreeSet<PathBuf>) -> Result<()> {
    let unique_fields = schema.unique_fields();
    if unique_fields.is_empty() {
        return Ok(());
    }

    let mut tracker = UniquenessTracker::new(unique_fields);
    for file in files {
        for doc in decode_file(file)? {
            tracker.check(&doc, file)?;
        }
    }
    Ok(())
}
