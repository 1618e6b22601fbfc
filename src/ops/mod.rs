//! Operations on the aliases in a set of config files
// (c) 2024 Ross Younger
//!
//! Every operation starts from the files on disk: the whole include tree is parsed and resolved afresh
//! each time, and nothing is cached between calls.
//!
//! **Limitations:** there is no locking, and an operation which touches several files writes
//! them one at a time. If one write fails, earlier files stay written.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    os::{AbstractPlatform as _, Platform},
    registry::TreeRegistry,
    resolve::AliasIndex,
    Error, Result,
};

mod backup;
mod connect;
mod mutate;
mod query;

pub use connect::ConnectString;
pub use mutate::{CreateOptions, UpdateOptions};
pub use query::ListOptions;

/// Entry point to the alias engine.
///
/// Holds the explicit configuration every operation needs; there is no global state.
#[derive(Debug, Clone)]
pub struct AliasManager {
    primary: PathBuf,
    invoking_user: Option<String>,
}

impl AliasManager {
    /// Creates a manager for the config file at `primary` (which need not exist yet).
    ///
    /// The fallback `user` is the name of the current user.
    pub fn new<P: AsRef<Path>>(primary: P) -> Result<Self> {
        Ok(Self {
            primary: absolute_path(primary.as_ref())?,
            invoking_user: Platform::username(),
        })
    }

    /// Overrides the user name supplied by the fallback block
    #[must_use]
    pub fn with_invoking_user(mut self, user: Option<String>) -> Self {
        self.invoking_user = user;
        self
    }

    /// The primary config file
    #[must_use]
    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    fn load(&self) -> Result<(TreeRegistry, AliasIndex)> {
        let registry = TreeRegistry::load(&self.primary)?;
        let index = AliasIndex::build(&registry, self.invoking_user.as_deref());
        Ok((registry, index))
    }

    /// Reads every file and resolves every alias, without side effects.
    pub fn index(&self) -> Result<AliasIndex> {
        self.load().map(|(_, index)| index)
    }
}

/// Makes a path absolute, expanding a leading `~`
pub(crate) fn absolute_path(path: &Path) -> Result<PathBuf> {
    let expanded = if path.starts_with("~") {
        expanduser::expanduser(path.to_string_lossy())
            .with_context(|| format!("expanding {path:?}"))
            .map_err(|e| Error::io(path, e))?
    } else {
        path.to_path_buf()
    };
    std::path::absolute(&expanded).map_err(|e| Error::io(path, e))
}
