//! Directory tree synchronization over rsync.
//!
//! A YAML configuration names sync targets, either directly under `targets`
//! or as `hosts` entries pairing named `sources` with remote destinations.
//! Each target resolves to an effective rsync flag list and exclude set and
//! can be pushed (source to destination) or pulled (destination to source).
//!
//! - **[`config`]**: load the document and resolve targets
//! - **[`target`]**: effective flags, excludes and command lines of one target
//! - **[`sync`]**: push or pull several targets, recording every outcome
//! - **[`commands`]**: subcommand orchestration (`list`, `show`, `push`, `pull`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod excludes;
pub mod exec;
pub mod logging;
pub mod sync;
pub mod target;

pub use config::Configuration;
pub use error::{ConfigError, SyncError, TreesyncError};
pub use target::Target;
