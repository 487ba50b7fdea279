//! Filename rules.

use std::path::Path;

use regex::Regex;

use crate::error::{Result, ValidationError};

/// Optional regular expression every file in a collection must satisfy.
///
/// The expression is anchored at the start of the base filename only (the
/// directory part of the path is never matched); it need not consume the
/// whole name unless it ends with `$`.
///
/// # Examples
///
/// ```
/// use content_schema_core::FilenameRule;
///
/// let rule = FilenameRule::new(Some(r"[a-z-]+\.md$"), "content-schema.yml").unwrap();
/// assert!(rule.check("content/posts/hello-world.md").is_ok());
/// assert!(rule.check("content/posts/Bad File.md").is_err());
///
/// let none = FilenameRule::new(None, "content-schema.yml").unwrap();
/// assert!(none.check("Anything Goes.txt").is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct FilenameRule {
    source: Option<String>,
    regex: Option<Regex>,
}

impl FilenameRule {
    /// Compiles the rule.
    ///
    /// # Errors
    ///
    /// Returns [`Corrupted`](crate::ErrorKind::Corrupted), attributed to
    /// `config_path`, when `pattern` is not a valid regular expression.
    pub fn new(pattern: Option<&str>, config_path: impl AsRef<Path>) -> Result<Self> {
        let Some(pattern) = pattern else {
            return Ok(Self {
                source: None,
                regex: None,
            });
        };
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|err| {
            ValidationError::corrupted(
                config_path,
                format!("invalid filename_regex {pattern:?}: {err}"),
            )
        })?;
        Ok(Self {
            source: Some(pattern.to_string()),
            regex: Some(regex),
        })
    }

    /// The expression as written in configuration.
    pub fn pattern(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Checks the base filename of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FilenameMismatch`](crate::ErrorKind::FilenameMismatch) naming
    /// the file and the expression.
    pub fn check(&self, path: impl AsRef<Path>) -> Result<()> {
        let (Some(regex), Some(source)) = (&self.regex, &self.source) else {
            return Ok(());
        };
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if regex.is_match(&name) {
            return Ok(());
        }
        Err(ValidationError::filename_mismatch(
            path,
            format!(
                "file {} has a name that does not match regex {source:?}",
                path.display()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_matches_base_name_only() {
        let rule = FilenameRule::new(Some(r"^[a-z-]+\.md$"), "cfg.yml").unwrap();
        assert!(rule.check("Content/Upper Dir/good-name.md").is_ok());
    }

    #[test]
    fn test_rejects_bad_name() {
        let rule = FilenameRule::new(Some(r"^[a-z-]+\.md$"), "cfg.yml").unwrap();
        let err = rule.check("authors/Bad File.md").unwrap_err();
        assert_eq!(err.kind, ErrorKind::FilenameMismatch);
        assert_eq!(err.file, Path::new("authors/Bad File.md"));
        assert!(err.message.contains("^[a-z-]+\\.md$"));
    }

    #[test]
    fn test_prefix_anchored_not_full_match() {
        let rule = FilenameRule::new(Some("[0-9]{4}-"), "cfg.yml").unwrap();
        assert!(rule.check("2024-launch.md").is_ok());
        assert!(rule.check("launch-2024-.md").is_err());
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let rule = FilenameRule::new(Some("a|b"), "cfg.yml").unwrap();
        assert!(rule.check("b.md").is_ok());
        assert!(rule.check("cb.md").is_err());
    }

    #[test]
    fn test_invalid_regex_is_corrupted_config() {
        let err = FilenameRule::new(Some("("), "cfg.yml").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Corrupted);
        assert_eq!(err.file, Path::new("cfg.yml"));
    }
}
