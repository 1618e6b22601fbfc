// (c) 2024 Ross Younger

//! sshman manages the `Host` aliases in an OpenSSH client configuration file, and every file it includes.
//!
//! ## Overview
//! - Lists aliases with their effective settings, optionally filtered by regular expressions
//! - Looks up a single setting of a single alias
//! - Adds aliases, from a `[user@]host[:port]` connection string and/or explicit options
//! - Renames aliases and changes their settings, across all the files they are declared in
//! - Deletes aliases
//! - Backs up the whole tree of config files
//!
//! ## Effective settings
//!
//! An alias's settings come from two places: those declared in its own `Host` blocks (_explicit_),
//! and those picked up from other patterns which match it (_inherited_), such as `Host db*` or `Host *`.
//! A built-in `Host *` supplies the current user name and port 22 as a last resort.
//! See [`resolve`] for the exact rules.
//!
//! ## Rewriting
//!
//! Files are written back in a canonical layout: one blank line between blocks, four-space indentation,
//! lowercase keywords. Comments and `Include` directives are kept; blank lines are not.
//! Listing aliases rewrites any file which isn't already in canonical layout.
//!
//! ## Library use
//!
//! ```no_run
//! use sshman::{AliasManager, CreateOptions};
//!
//! let manager = AliasManager::new("/home/me/.ssh/config")?;
//! let created = manager.create(&CreateOptions {
//!     alias: "db1".into(),
//!     connect: Some("alice@db1.example.com:2222".into()),
//!     ..Default::default()
//! })?;
//! assert_eq!(created.get("user"), Some("alice"));
//! # Ok::<(), sshman::Error>(())
//! ```
//!
//! ## Limitations
//! * `Match` blocks are not supported; a file containing one cannot be loaded.
//! * There is no file locking. Operations touching several files are not atomic.

mod cli;
pub use cli::cli;

pub mod config;

mod error;
pub use error::{check_argument_count, Error, Result};

pub mod ops;
pub use ops::{AliasManager, ConnectString, CreateOptions, ListOptions, UpdateOptions};

pub mod os;

mod registry;

pub mod resolve;
pub use resolve::ResolvedAlias;

pub mod sshconfig;

mod store;

/// Utilities
pub mod util;
