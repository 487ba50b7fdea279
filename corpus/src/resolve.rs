//! File-pattern resolution.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use content_schema_core::{Result, ValidationError};
use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Returns the regular files under `root_dir` matching the glob `pattern`.
///
/// `*` stays within one path segment and `**` matches any number of
/// directories. Glob metacharacters in `root_dir` itself are matched
/// literally. Hidden entries only match patterns that name the leading dot.
/// An empty result is not an error; the caller decides.
///
/// # Errors
///
/// Returns [`Corrupted`](content_schema_core::ErrorKind::Corrupted),
/// attributed to `config_path`, when `pattern` is not a valid glob.
pub fn resolve_files(
    root_dir: impl AsRef<Path>,
    pattern: &str,
    config_path: impl AsRef<Path>,
) -> Result<BTreeSet<PathBuf>> {
    let root_dir = root_dir.as_ref();
    let root = Pattern::escape(&root_dir.to_string_lossy());
    let full = format!(
        "{}/{}",
        root.trim_end_matches('/'),
        pattern.trim_start_matches('/')
    );

    let paths = glob::glob_with(&full, MATCH_OPTIONS).map_err(|err| {
        ValidationError::corrupted(
            config_path.as_ref(),
            format!("invalid filepattern {pattern:?}: {err}"),
        )
    })?;

    let mut files = BTreeSet::new();
    for entry in paths {
        match entry {
            Ok(path) if path.is_file() => {
                files.insert(path);
            }
            Ok(_) => {}
            Err(err) => {
                warn!(path = %err.path().display(), error = %err.error(), "Skipping unreadable path");
            }
        }
    }

    debug!(pattern, matches = files.len(), "Resolved file pattern");
    Ok(files)
}
