//! Reading and writing config files
// (c) 2024 Ross Younger

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use tracing::{debug, trace};

use crate::{sshconfig::SyntaxTree, Error, Result};

/// Current bytes of a file; an absent file reads as empty
fn current_contents(path: &Path) -> std::io::Result<Vec<u8>> {
    match fs::read(path) {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Loads a file into a tree. An absent file yields an empty tree (nothing is created on disk).
pub(crate) fn load(path: &Path) -> Result<SyntaxTree> {
    let data = current_contents(path).map_err(|e| Error::io(path, e))?;
    let text = String::from_utf8(data)
        .context("file is not valid UTF-8")
        .map_err(|e| Error::io(path, e))?;
    trace!("loaded {path:?} ({} bytes)", text.len());
    SyntaxTree::parse_named(&text, &path.to_string_lossy()).map_err(|e| Error::io(path, e))
}

/// Writes a tree out, unless the file already holds exactly its serialization.
///
/// Returns whether the file was written.
///
/// # Note
/// There is no locking. If another process changes the file between our read and this write,
/// their change is lost.
pub(crate) fn persist(path: &Path, tree: &SyntaxTree) -> Result<bool> {
    let wanted = tree.to_string();
    let existing = current_contents(path).map_err(|e| Error::io(path, e))?;
    if existing == wanted.as_bytes() {
        trace!("{path:?} unchanged");
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {parent:?}"))
            .map_err(|e| Error::io(path, e))?;
    }
    fs::write(path, wanted).map_err(|e| Error::io(path, e))?;
    debug!("wrote {path:?}");
    Ok(true)
}

/// Copies a file to `dest`, creating parent directories as needed
pub(crate) fn copy(from: &Path, dest: &Path) -> Result<PathBuf> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {parent:?}"))
            .map_err(|e| Error::io(dest, e))?;
    }
    let _ = fs::copy(from, dest)
        .with_context(|| format!("copying to {dest:?}"))
        .map_err(|e| Error::io(from, e))?;
    debug!("copied {from:?} to {dest:?}");
    Ok(dest.to_path_buf())
}
