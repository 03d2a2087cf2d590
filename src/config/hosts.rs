//! The `hosts` section: remote endpoints grouping target references to named sources.
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::servers::{ServerConfiguration, override_flags};
use super::sources::SourceConfiguration;
use super::targets::TargetConfiguration;
use super::{ConfigRoot, required};
use crate::error::ConfigError;
use crate::target::Target;

/// A host-level reference to a named source, synced to `destination`.
///
/// The source name is resolved against the source registry only when
/// [`name`](Self::name) or [`source_path`](Self::source_path) is called, so a
/// dangling reference loads fine and fails on first use.
#[derive(Debug, Clone)]
pub struct HostTargetReference {
    /// Name of the referenced source.
    pub source: String,
    /// Destination of the sync.
    pub destination: String,
    hostname: String,
    root: Arc<ConfigRoot>,
}

impl HostTargetReference {
    /// Name of the owning host.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Resolved target name, `<hostname>:<source name>`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UndefinedSource`] if the source is not defined.
    pub fn name(&self) -> Result<String, ConfigError> {
        let source = self.resolve_source()?;
        Ok(format!("{}:{}", self.hostname, source.name))
    }

    /// Local path of the referenced source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UndefinedSource`] if the source is not defined.
    pub fn source_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.resolve_source()?.path.clone())
    }

    fn resolve_source(&self) -> Result<&SourceConfiguration, ConfigError> {
        self.root
            .sources
            .get(&self.source)
            .ok_or_else(|| ConfigError::UndefinedSource {
                host: self.hostname.clone(),
                source_name: self.source.clone(),
            })
    }
}

/// Configuration of a single host.
#[derive(Debug, Clone)]
pub struct HostConfiguration {
    /// Unique host name.
    pub name: String,
    /// Path of the tool on the host, passed as `--rsync-path`.
    pub rsync_path: Option<String>,
    /// Character set conversion passed as `--iconv`.
    pub iconv: Option<String>,
    /// Extra flags for every target of this host.
    pub flags: Vec<String>,
    /// Target references, in declaration order.
    pub targets: Vec<HostTargetReference>,
    root: Arc<ConfigRoot>,
}

impl HostConfiguration {
    /// Server overrides registered under this host's name, if any.
    #[must_use]
    pub fn server_config(&self) -> Option<&ServerConfiguration> {
        self.root.servers.get(&self.name)
    }

    /// Flags this host contributes to each of its targets: `flags`, then
    /// `--iconv`, then `--rsync-path`.
    #[must_use]
    pub fn destination_server_flags(&self) -> Vec<String> {
        override_flags(&self.flags, self.iconv.as_deref(), self.rsync_path.as_deref())
    }

    /// Materialize one [`Target`] per target reference, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UndefinedSource`] if any reference names a
    /// source that is not defined.
    pub fn sync_targets(&self) -> Result<Vec<Target>, ConfigError> {
        let flags = self.destination_server_flags();
        self.targets
            .iter()
            .map(|reference| {
                let name = reference.name()?;
                let source = reference.source_path()?;
                let settings = TargetConfiguration::for_host_target(
                    source.clone(),
                    reference.destination.clone(),
                    flags.clone(),
                    Arc::clone(&self.root),
                );
                tracing::debug!("resolved host target {name}");
                Ok(Target::new(name, source, reference.destination.clone(), settings))
            })
            .collect()
    }
}

/// A `hosts` list item as written in the document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawHost {
    name: Option<String>,
    rsync_path: Option<String>,
    iconv: Option<String>,
    flags: Option<Vec<String>>,
    targets: Option<Vec<RawHostTarget>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawHostTarget {
    source: Option<String>,
    destination: Option<String>,
}

/// Host registry, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct HostsSettings {
    hosts: Vec<HostConfiguration>,
}

impl HostsSettings {
    /// Validate the document's `hosts` list. Host `name` and each target's
    /// `source` and `destination` are required; source names are not checked.
    pub(super) fn from_raw(raw: Vec<RawHost>, root: &Arc<ConfigRoot>) -> Result<Self, ConfigError> {
        let mut hosts = Vec::with_capacity(raw.len());
        for (index, host) in raw.into_iter().enumerate() {
            let name = required(host.name, &format!("hosts[{index}]"), "name")?;
            let targets = host
                .targets
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(target_index, target)| {
                    let section = format!("hosts[{name}].targets[{target_index}]");
                    Ok(HostTargetReference {
                        source: required(target.source, &section, "source")?,
                        destination: required(target.destination, &section, "destination")?,
                        hostname: name.clone(),
                        root: Arc::clone(root),
                    })
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            hosts.push(HostConfiguration {
                name,
                rsync_path: host.rsync_path,
                iconv: host.iconv,
                flags: host.flags.unwrap_or_default(),
                targets,
                root: Arc::clone(root),
            });
        }
        Ok(Self { hosts })
    }

    /// Look up a host by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HostConfiguration> {
        self.hosts.iter().find(|host| host.name == name)
    }

    /// Iterate hosts in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, HostConfiguration> {
        self.hosts.iter()
    }

    /// Number of configured hosts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Return `true` when no hosts are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
