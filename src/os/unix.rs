// OS abstraction layer for sshman - Unix implementation
// (c) 2024 Ross Younger

use std::path::PathBuf;

use anyhow::Result;
use nix::unistd::{getuid, User};
use tracing::warn;

use super::AbstractPlatform;

/// Concrete implementation for Unix-like platforms
#[derive(Debug, Clone, Copy)]
pub struct Platform {}

const BASE_CONFIG_FILENAME: &str = "sshman.toml";

impl AbstractPlatform for Platform {
    fn user_ssh_config() -> Result<PathBuf> {
        let Some(mut pb) = dirs::home_dir() else {
            anyhow::bail!("could not determine home directory");
        };
        pb.push(".ssh");
        pb.push("config");
        Ok(pb)
    }

    fn user_config_dir() -> Option<PathBuf> {
        // home directory for now
        let home = dirs::home_dir();
        if home.is_none() {
            warn!("could not determine home directory");
        }
        home
    }

    fn user_config_path() -> Option<PathBuf> {
        // ~/.<filename> for now
        let mut d = Self::user_config_dir()?;
        d.push(format!(".{BASE_CONFIG_FILENAME}"));
        Some(d)
    }

    fn username() -> Option<String> {
        match User::from_uid(getuid()) {
            Ok(Some(user)) => Some(user.name),
            Ok(None) => std::env::var("USER").ok(),
            Err(e) => {
                warn!("could not look up current user: {e}");
                std::env::var("USER").ok()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::Platform;
    use crate::os::AbstractPlatform as _;

    #[test]
    fn config_paths() {
        let p = Platform::user_ssh_config().unwrap();
        assert!(p.ends_with(".ssh/config"), "{p:?}");
        let p = Platform::user_config_path().unwrap();
        assert!(p.ends_with(".sshman.toml"), "{p:?}");
    }
}
