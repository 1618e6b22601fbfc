//! Error types reported by the alias engine
// (c) 2024 Ross Younger

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong in a library operation.
///
/// Nothing is retried or recovered internally; the first failure aborts the operation.
#[derive(Debug, Error)]
pub enum Error {
    /// The alias is not declared in any reachable file
    #[error("alias [{0}] not found")]
    AliasNotFound(String),

    /// The alias is already declared
    #[error("alias [{0}] already exists")]
    AliasAlreadyExists(String),

    /// The alias has neither an explicit nor an inherited value for the key
    #[error("alias [{alias}] has no value for key [{key}]")]
    KeyNotFound {
        /// The alias looked up
        alias: String,
        /// The (lowercase) key
        key: String,
    },

    /// Too few or too many positional arguments
    #[error("{0}")]
    ArgumentCount(&'static str),

    /// A pattern or search expression could not be used
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending text
        pattern: String,
        /// What is wrong with it
        reason: String,
    },

    /// A setting cannot be written to a config file as given
    #[error("invalid setting `{key}`: {reason}")]
    InvalidSetting {
        /// The key, as given
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// An update was requested which would change nothing
    #[error("the update option is invalid: nothing to change")]
    InvalidUpdate,

    /// Reading, parsing, writing or copying a file failed
    #[error("{}: {cause:#}", path.display())]
    Io {
        /// The file concerned
        path: PathBuf,
        /// What went wrong, with its context chain
        cause: anyhow::Error,
    },
}

impl Error {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, cause: impl Into<anyhow::Error>) -> Self {
        Self::Io {
            path: path.into(),
            cause: cause.into(),
        }
    }
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Checks a count of positional arguments.
///
/// A limit of 0 means "no limit".
pub fn check_argument_count(count: usize, min: usize, max: usize) -> Result<()> {
    if min > 0 && count < min {
        return Err(Error::ArgumentCount("too few arguments"));
    }
    if max > 0 && count > max {
        return Err(Error::ArgumentCount("too many arguments"));
    }
    Ok(())
}
