//! The `servers` section: per-destination-host overrides.
use serde::Deserialize;
use std::collections::BTreeMap;

/// Overrides applied to every target whose destination is on this server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfiguration {
    /// Extra flags for the synchronization tool.
    pub flags: Vec<String>,
    /// Character set conversion passed as `--iconv`.
    pub iconv: Option<String>,
    /// Path of the tool on the server, passed as `--rsync-path`.
    pub rsync_path: Option<String>,
}

impl ServerConfiguration {
    /// Return `true` when the section defines no overrides at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.iconv.is_none() && self.rsync_path.is_none()
    }

    /// Flags contributed by this server, in fixed order: explicit flags,
    /// then `--iconv`, then `--rsync-path`.
    #[must_use]
    pub fn flags(&self) -> Vec<String> {
        override_flags(&self.flags, self.iconv.as_deref(), self.rsync_path.as_deref())
    }
}

/// Build an override flag list: `flags`, then `--iconv=<iconv>`, then
/// `--rsync-path=<rsync_path>` for the options that are set.
pub(crate) fn override_flags(
    flags: &[String],
    iconv: Option<&str>,
    rsync_path: Option<&str>,
) -> Vec<String> {
    let mut out = flags.to_vec();
    if let Some(iconv) = iconv {
        out.push(format!("--iconv={iconv}"));
    }
    if let Some(rsync_path) = rsync_path {
        out.push(format!("--rsync-path={rsync_path}"));
    }
    out
}

/// Server overrides keyed by exact hostname.
#[derive(Debug, Clone, Default)]
pub struct ServersSettings {
    servers: BTreeMap<String, ServerConfiguration>,
}

impl ServersSettings {
    /// Build the registry from the document's `servers` mapping. A server
    /// declared with no body is kept as an empty (but present) section.
    pub(super) fn from_raw(raw: BTreeMap<String, Option<ServerConfiguration>>) -> Self {
        Self {
            servers: raw
                .into_iter()
                .map(|(name, server)| (name, server.unwrap_or_default()))
                .collect(),
        }
    }

    /// Look up server overrides by hostname.
    #[must_use]
    pub fn get(&self, hostname: &str) -> Option<&ServerConfiguration> {
        self.servers.get(hostname)
    }

    /// Iterate `(hostname, overrides)` pairs in hostname order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServerConfiguration)> {
        self.servers.iter().map(|(name, server)| (name.as_str(), server))
    }

    /// Number of configured servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Return `true` when no servers are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ServersSettings {
        ServersSettings::from_raw(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn server_flags_fixed_order() {
        let servers = parse(
            "nas:\n  rsync_path: /usr/local/bin/rsync\n  iconv: UTF-8-MAC,UTF-8\n  flags: ['--usermap=demo:dummy']\n",
        );
        let nas = servers.get("nas").unwrap();
        assert_eq!(
            nas.flags(),
            vec![
                "--usermap=demo:dummy",
                "--iconv=UTF-8-MAC,UTF-8",
                "--rsync-path=/usr/local/bin/rsync",
            ]
        );
    }

    #[test]
    fn empty_server_section_is_present() {
        let servers = parse("dummy-server:\n");
        let dummy = servers.get("dummy-server").unwrap();
        assert!(dummy.is_empty());
        assert!(dummy.flags().is_empty());
    }

    #[test]
    fn lookup_is_exact_match() {
        let servers = parse("nas: {}\n");
        assert!(servers.get("nas").is_some());
        assert!(servers.get("NAS").is_none());
        assert!(servers.get("nas.local").is_none());
        assert_eq!(servers.len(), 1);
    }

    #[test]
    fn override_flags_skips_unset_options() {
        let flags = override_flags(&["--compress".to_string()], None, Some("sudo rsync"));
        assert_eq!(flags, vec!["--compress", "--rsync-path=sudo rsync"]);
    }
}
