//! Command: print version information.

/// Version string baked in by the build script, or the package version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("TREESYNC_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the treesync version to stdout.
pub fn run() {
    println!("treesync {}", version());
}
