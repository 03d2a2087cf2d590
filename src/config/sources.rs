//! The `sources` section: named, reusable local paths referenced by host targets.
use serde::Deserialize;
use std::path::PathBuf;

use super::{expand_home, required};
use crate::error::ConfigError;

/// A named local source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfiguration {
    /// Unique source name.
    pub name: String,
    /// Local filesystem path.
    pub path: PathBuf,
}

/// A `sources` list item as written in the document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawSource {
    name: Option<String>,
    path: Option<String>,
}

/// Source registry, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SourcesSettings {
    sources: Vec<SourceConfiguration>,
}

impl SourcesSettings {
    /// Validate the document's `sources` list. `name` and `path` are required.
    pub(super) fn from_raw(raw: Vec<RawSource>) -> Result<Self, ConfigError> {
        let sources = raw
            .into_iter()
            .enumerate()
            .map(|(index, source)| {
                let section = format!("sources[{index}]");
                Ok(SourceConfiguration {
                    name: required(source.name, &section, "name")?,
                    path: expand_home(&required(source.path, &section, "path")?),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { sources })
    }

    /// Look up a source by exact name. Absence is not an error here;
    /// callers that require the source turn `None` into one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SourceConfiguration> {
        self.sources.iter().find(|source| source.name == name)
    }

    /// Iterate sources in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, SourceConfiguration> {
        self.sources.iter()
    }

    /// Number of configured sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Return `true` when no sources are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
