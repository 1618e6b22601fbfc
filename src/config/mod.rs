// (c) 2024 Ross Younger
//! # Configuration management
//!
//! sshman obtains run-time configuration from the following sources, in order:
//! 1. Command-line options
//! 2. Environment variables named `SSHMAN_<FIELD>` (for example `SSHMAN_SSH_CONFIG`)
//! 3. The user's configuration file (typically `~/.sshman.toml`)
//! 4. Hard-wired defaults
//!
//! Each option may appear in multiple places, but only the first match is used.
//!
//! ## File format
//!
//! The configuration file is TOML.
//!
//! ### Example
//!
//! ```text
//! ssh_config = "~/work/ssh/config"
//! show_path = true
//! ignore_case = true
//! ```
//!
//! ## Configurable options
//!
//! The full list of supported fields is defined by [Configuration].
//! `sshman show-config` outputs a list of supported fields, their current values, and where each value came from.

mod structure;
pub use structure::{Configuration, Overrides};

mod manager;
pub use manager::Manager;
