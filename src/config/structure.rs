//! Configuration structure
// (c) 2024 Ross Younger

use std::path::PathBuf;

use figment::{
    providers::Serialized,
    value::{Dict, Map},
    Metadata, Profile, Provider,
};
use serde::{Deserialize, Serialize};

use crate::os::{AbstractPlatform as _, Platform};

/// The set of configurable options supported by sshman.
///
/// **Note:** The implementation of `default()` for this struct returns sshman's hard-wired configuration defaults.
///
// Maintainer note: None of the members of this struct should be Option<anything>; unset values come from
// lower-priority sources via `Overrides`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Configuration {
    /// The ssh config file to manage [default: `~/.ssh/config`]
    pub ssh_config: PathBuf,

    /// File that new aliases are written to [default: empty, meaning the `ssh_config` file]
    ///
    /// This should be a file which `ssh_config` includes, otherwise new aliases won't be visible.
    pub add_path: String,

    /// When printing aliases, also print the files they are declared in
    pub show_path: bool,

    /// Match list keywords case-insensitively [default: true]
    pub ignore_case: bool,
}

impl Configuration {
    /// Field names, as they appear in configuration files
    pub const FIELDS: &'static [&'static str] = &["ssh_config", "add_path", "show_path", "ignore_case"];
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            ssh_config: Platform::user_ssh_config()
                .unwrap_or_else(|_| PathBuf::from("~/.ssh/config")),
            add_path: String::new(),
            show_path: false,
            ignore_case: true,
        }
    }
}

/// The same fields as [`Configuration`], all optional.
///
/// The command line produces one of these; wherever the user did not provide a value,
/// values read from lower priority sources (configuration file, environment and system defaults) obtain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overrides {
    /// See [`Configuration::ssh_config`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_config: Option<PathBuf>,
    /// See [`Configuration::add_path`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_path: Option<String>,
    /// See [`Configuration::show_path`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_path: Option<bool>,
    /// See [`Configuration::ignore_case`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
}

impl Overrides {
    const META_NAME: &'static str = "command line";
}

impl Provider for Overrides {
    fn metadata(&self) -> Metadata {
        Metadata::named(Self::META_NAME)
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}
