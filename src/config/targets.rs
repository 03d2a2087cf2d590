//! The `targets` section: flat, explicitly named sync pairs.
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::servers::ServerConfiguration;
use super::{ConfigRoot, expand_home, required};
use crate::error::ConfigError;
use crate::target::Target;

/// Settings of one sync pair.
///
/// Flat targets are read from the document; host targets get a synthesized
/// instance carrying the host's flags and default values for everything else.
#[derive(Debug, Clone)]
pub struct TargetConfiguration {
    /// Local source path.
    pub source: PathBuf,
    /// Destination, either a local path or `<host>:<path>`.
    pub destination: String,
    /// Skip [`Defaults::flags`](super::Defaults::flags).
    pub ignore_default_flags: bool,
    /// Skip [`Defaults::excluded_paths`](super::Defaults::excluded_paths).
    pub ignore_default_excludes: bool,
    /// Extra exclude patterns.
    pub excludes: Vec<String>,
    /// Tree-local excludes file, relative to the source directory.
    pub excludes_file: Option<PathBuf>,
    /// Extra flags.
    pub flags: Vec<String>,
    /// Character set conversion passed as `--iconv`.
    pub iconv: Option<String>,
    root: Arc<ConfigRoot>,
}

impl TargetConfiguration {
    pub(super) fn for_host_target(
        source: PathBuf,
        destination: String,
        flags: Vec<String>,
        root: Arc<ConfigRoot>,
    ) -> Self {
        Self {
            source,
            destination,
            ignore_default_flags: false,
            ignore_default_excludes: false,
            excludes: Vec::new(),
            excludes_file: None,
            flags,
            iconv: None,
            root,
        }
    }

    /// Registries this target was loaded with.
    #[must_use]
    pub fn root(&self) -> &ConfigRoot {
        &self.root
    }

    /// Hostname part of a `<host>:<path>` destination; `None` for local paths.
    #[must_use]
    pub fn destination_host(&self) -> Option<&str> {
        self.destination.split_once(':').map(|(host, _)| host)
    }

    /// Server overrides for the destination host.
    ///
    /// `None` when the destination is local or the host has no `servers`
    /// entry; an empty (but present) entry returns `Some` of an empty section.
    #[must_use]
    pub fn destination_server_settings(&self) -> Option<&ServerConfiguration> {
        self.root.servers.get(self.destination_host()?)
    }

    /// Flags contributed by the destination server, empty when there is none.
    #[must_use]
    pub fn destination_server_flags(&self) -> Vec<String> {
        self.destination_server_settings()
            .map(ServerConfiguration::flags)
            .unwrap_or_default()
    }
}

/// A `targets` entry as written in the document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawTarget {
    source: Option<String>,
    destination: Option<String>,
    ignore_default_flags: bool,
    ignore_default_excludes: bool,
    excludes: Option<Vec<String>>,
    excludes_file: Option<String>,
    flags: Option<Vec<String>>,
    iconv: Option<String>,
}

/// Flat targets by name, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct TargetsSettings {
    targets: Vec<(String, TargetConfiguration)>,
}

impl TargetsSettings {
    /// Validate the document's `targets` mapping. `source` and `destination`
    /// are required for every entry.
    pub(super) fn from_raw(
        raw: Vec<(String, RawTarget)>,
        root: &Arc<ConfigRoot>,
    ) -> Result<Self, ConfigError> {
        let targets = raw
            .into_iter()
            .map(|(name, target)| {
                let section = format!("targets.{name}");
                let settings = TargetConfiguration {
                    source: expand_home(&required(target.source, &section, "source")?),
                    destination: required(target.destination, &section, "destination")?,
                    ignore_default_flags: target.ignore_default_flags,
                    ignore_default_excludes: target.ignore_default_excludes,
                    excludes: target.excludes.unwrap_or_default(),
                    excludes_file: target
                        .excludes_file
                        .filter(|f| !f.is_empty())
                        .map(PathBuf::from),
                    flags: target.flags.unwrap_or_default(),
                    iconv: target.iconv,
                    root: Arc::clone(root),
                };
                Ok((name, settings))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { targets })
    }

    /// Target names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Settings of the named target, if configured.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TargetConfiguration> {
        self.targets
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, settings)| settings)
    }

    /// Materialize the named target.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTarget`] if no flat target has that name.
    pub fn get_target(&self, name: &str) -> Result<Target, ConfigError> {
        let settings = self
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTarget(name.to_string()))?;
        Ok(Target::new(
            name.to_string(),
            settings.source.clone(),
            settings.destination.clone(),
            settings.clone(),
        ))
    }

    /// Iterate `(name, settings)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetConfiguration)> {
        self.targets
            .iter()
            .map(|(name, settings)| (name.as_str(), settings))
    }

    /// Number of flat targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Return `true` when no flat targets are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
