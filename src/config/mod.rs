//! Configuration root: loads the YAML document and resolves sync targets.
pub mod defaults;
pub mod hosts;
pub mod servers;
pub mod sources;
pub mod targets;

pub use defaults::Defaults;
pub use hosts::{HostConfiguration, HostTargetReference, HostsSettings};
pub use servers::{ServerConfiguration, ServersSettings};
pub use sources::{SourceConfiguration, SourcesSettings};
pub use targets::{TargetConfiguration, TargetsSettings};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::constants::CONFIG_FILE_NAME;
use crate::error::ConfigError;
use crate::target::Target;

/// Sections every host and target looks names up in.
///
/// Shared by reference-counting so that resolved targets carry the defaults
/// and registries they were loaded with.
#[derive(Debug, Default)]
pub struct ConfigRoot {
    /// Global defaults.
    pub defaults: Defaults,
    /// Per-destination-host overrides.
    pub servers: ServersSettings,
    /// Named source paths.
    pub sources: SourcesSettings,
}

/// Loaded treesync configuration.
#[derive(Debug, Default)]
pub struct Configuration {
    path: Option<PathBuf>,
    root: Arc<ConfigRoot>,
    hosts: HostsSettings,
    targets: TargetsSettings,
    sync_targets: OnceLock<Vec<Target>>,
}

/// The whole document as written. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocument {
    defaults: Option<defaults::RawDefaults>,
    servers: Option<BTreeMap<String, Option<ServerConfiguration>>>,
    sources: Option<Vec<sources::RawSource>>,
    hosts: Option<Vec<hosts::RawHost>>,
    targets: Option<serde_yaml::Mapping>,
}

impl Configuration {
    /// Default configuration file location: `<user config dir>/treesync.yml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from `path`.
    ///
    /// A missing file yields the empty configuration (defaults only).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or a
    /// required setting is missing.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("configuration file {} not found, using defaults", path.display());
            return Ok(Self {
                path: Some(path.to_path_buf()),
                ..Self::default()
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content, path)?;
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load configuration from [`default_path`](Self::default_path), or the
    /// empty configuration when no user configuration directory exists.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::default_path().map_or_else(|| Ok(Self::default()), |path| Self::load(&path))
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML or a required setting is missing.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<string>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let parse_error = |e: serde_yaml::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        // An empty or comment-only document parses to null.
        let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_error)?;
        let document: RawDocument = if value.is_null() {
            RawDocument::default()
        } else {
            serde_yaml::from_value(value).map_err(parse_error)?
        };

        let flat_targets = document
            .targets
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| {
                let name = key.as_str().map(ToString::to_string).ok_or_else(|| {
                    ConfigError::Parse {
                        path: path.to_path_buf(),
                        message: format!("target names must be strings, found {key:?}"),
                    }
                })?;
                let target = if value.is_null() {
                    targets::RawTarget::default()
                } else {
                    serde_yaml::from_value(value).map_err(parse_error)?
                };
                Ok((name, target))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let root = Arc::new(ConfigRoot {
            defaults: Defaults::from_raw(document.defaults.unwrap_or_default()),
            servers: ServersSettings::from_raw(document.servers.unwrap_or_default()),
            sources: SourcesSettings::from_raw(document.sources.unwrap_or_default())?,
        });
        let hosts = HostsSettings::from_raw(document.hosts.unwrap_or_default(), &root)?;
        let targets = TargetsSettings::from_raw(flat_targets, &root)?;

        tracing::debug!(
            "loaded {} hosts, {} sources, {} servers, {} targets",
            hosts.len(),
            root.sources.len(),
            root.servers.len(),
            targets.len()
        );

        Ok(Self {
            path: None,
            root,
            hosts,
            targets,
            sync_targets: OnceLock::new(),
        })
    }

    /// Path the configuration was loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Global defaults.
    #[must_use]
    pub fn defaults(&self) -> &Defaults {
        &self.root.defaults
    }

    /// Per-destination-host overrides.
    #[must_use]
    pub fn servers(&self) -> &ServersSettings {
        &self.root.servers
    }

    /// Named sources.
    #[must_use]
    pub fn sources(&self) -> &SourcesSettings {
        &self.root.sources
    }

    /// Host definitions.
    #[must_use]
    pub const fn hosts(&self) -> &HostsSettings {
        &self.hosts
    }

    /// Flat target definitions.
    #[must_use]
    pub const fn targets(&self) -> &TargetsSettings {
        &self.targets
    }

    /// All effective sync targets.
    ///
    /// Host targets come first (host order, then reference order), followed by
    /// flat targets in declaration order. A target whose name was already seen
    /// is skipped. The list is computed on first success and cached for the
    /// lifetime of this configuration; failures are not cached.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UndefinedSource`] if a host target references an
    /// undefined source.
    pub fn sync_targets(&self) -> Result<&[Target], ConfigError> {
        if let Some(targets) = self.sync_targets.get() {
            return Ok(targets);
        }
        let targets = self.resolve_sync_targets()?;
        Ok(self.sync_targets.get_or_init(|| targets))
    }

    fn resolve_sync_targets(&self) -> Result<Vec<Target>, ConfigError> {
        let mut resolved = Vec::<Target>::new();
        let mut push_unique = |target: Target| {
            if resolved.iter().any(|existing| existing.name() == target.name()) {
                tracing::debug!("skipping duplicate sync target {}", target.name());
            } else {
                resolved.push(target);
            }
        };

        for host in self.hosts.iter() {
            for target in host.sync_targets()? {
                push_unique(target);
            }
        }
        for name in self.targets.names() {
            push_unique(self.targets.get_target(name)?);
        }
        Ok(resolved)
    }

    /// Materialize the flat target `name`. Host targets are not reachable here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTarget`] if no flat target has that name.
    pub fn get_target(&self, name: &str) -> Result<Target, ConfigError> {
        self.targets.get_target(name)
    }

    /// Remove the sync target at `index` from the cached list.
    ///
    /// Returns `None` when `index` is out of bounds.
    ///
    /// # Errors
    ///
    /// See [`sync_targets`](Self::sync_targets).
    pub fn remove_sync_target(&mut self, index: usize) -> Result<Option<Target>, ConfigError> {
        self.sync_targets()?;
        Ok(self
            .sync_targets
            .get_mut()
            .and_then(|targets| (index < targets.len()).then(|| targets.remove(index))))
    }

    /// Replace the sync target at `index` in the cached list, returning the
    /// previous one, or `None` (leaving the list unchanged) when `index` is
    /// out of bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateTarget`] if another entry already has
    /// the new target's name, or the errors of [`sync_targets`](Self::sync_targets).
    pub fn replace_sync_target(
        &mut self,
        index: usize,
        target: Target,
    ) -> Result<Option<Target>, ConfigError> {
        self.sync_targets()?;
        let Some(targets) = self
            .sync_targets
            .get_mut()
            .filter(|targets| index < targets.len())
        else {
            return Ok(None);
        };
        if targets
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && existing.name() == target.name())
        {
            return Err(ConfigError::DuplicateTarget(target.name().to_string()));
        }
        Ok(targets
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, target)))
    }
}

/// Return the value of a required, non-empty string setting.
pub(crate) fn required(
    value: Option<String>,
    section: &str,
    field: &'static str,
) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingField {
            section: section.to_string(),
            field,
        })
}

/// Expand a leading `~` to the user's home directory.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
