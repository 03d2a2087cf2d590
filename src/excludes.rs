//! Exclude pattern files: tree-local files read from a source directory and
//! temporary files passed to rsync with `--exclude-from`.
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::ConfigError;

/// An rsync excludes file inside a source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludesFile {
    path: PathBuf,
}

impl ExcludesFile {
    /// Wrap the path of an excludes file; the file need not exist.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return `true` if the file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Patterns in the file, one per non-blank line.
    ///
    /// A missing file contributes no patterns. Other read errors are logged
    /// and also contribute none.
    #[must_use]
    pub fn excludes(&self) -> Vec<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => parse_patterns(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!("ignoring unreadable excludes file {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }
}

fn parse_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// A temporary file holding the merged exclude patterns of one target.
///
/// The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct TemporaryExcludesFile {
    file: NamedTempFile,
}

impl TemporaryExcludesFile {
    /// Create an empty temporary file named after `target_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ExcludesFile`] if the file cannot be created.
    pub fn create(target_name: &str) -> Result<Self, ConfigError> {
        let prefix = format!("treesync-{}-", sanitize(target_name));
        let file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".exclude")
            .tempfile()
            .map_err(|source| ConfigError::ExcludesFile {
                path: std::env::temp_dir().join(&prefix),
                source,
            })?;
        Ok(Self { file })
    }

    /// Replace the file contents with `patterns`, one per line.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ExcludesFile`] if the file cannot be written.
    pub fn write(&self, patterns: &[String]) -> Result<(), ConfigError> {
        let mut content = String::new();
        for pattern in patterns {
            content.push_str(pattern);
            content.push('\n');
        }
        std::fs::write(self.path(), content).map_err(|source| ConfigError::ExcludesFile {
            path: self.path().to_path_buf(),
            source,
        })
    }

    /// Path of the temporary file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Keep target names usable as file name fragments (`host:source` contains a colon).
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_has_no_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let file = ExcludesFile::new(dir.path().join(".rsync.exclude"));
        assert!(!file.exists());
        assert!(file.excludes().is_empty());
    }

    #[test]
    fn reads_non_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".rsync.exclude");
        std::fs::write(&path, "*.tmp\n\n.*.progress  \r\n").unwrap();
        let file = ExcludesFile::new(path);
        assert!(file.exists());
        assert_eq!(file.excludes(), vec!["*.tmp", ".*.progress"]);
    }

    #[test]
    fn temporary_file_contents_are_replaced() {
        let tmp = TemporaryExcludesFile::create("nas:music").unwrap();
        tmp.write(&["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(tmp.path()).unwrap(), "a\nb\n");
        tmp.write(&["c".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(tmp.path()).unwrap(), "c\n");
    }

    #[test]
    fn temporary_file_removed_on_drop() {
        let tmp = TemporaryExcludesFile::create("minimal").unwrap();
        let path = tmp.path().to_path_buf();
        assert!(path.exists());
        drop(tmp);
        assert!(!path.exists());
    }

    #[test]
    fn temporary_file_name_is_sanitized() {
        let tmp = TemporaryExcludesFile::create("nas:music/2024").unwrap();
        let name = tmp.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("treesync-nas-music-2024-"), "{name}");
    }
}
