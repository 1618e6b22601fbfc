//! Include directive logic
// (c) 2024 Ross Younger

use anyhow::{Context, Result};
use glob::{glob_with, MatchOptions};
use std::path::{Path, PathBuf};

/// Wildcard matching and ~ expansion for Include directives.
///
/// Relative paths are taken relative to `base_dir` (the directory holding the primary config file).
/// Results are sorted; a pattern matching nothing yields an empty list.
pub(crate) fn find_include_files(arg: &str, base_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut path = if arg.starts_with('~') {
        expanduser::expanduser(arg)
            .with_context(|| format!("expanding include expression {arg}"))?
    } else {
        PathBuf::from(arg)
    };
    if !path.is_absolute() {
        path = base_dir.join(path);
    }

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_leading_dot: true,
        require_literal_separator: true,
    };
    let pattern = path.to_string_lossy();
    let mut result: Vec<PathBuf> = glob_with(pattern.as_ref(), options)
        .with_context(|| format!("invalid include pattern {pattern}"))?
        .flatten()
        .filter(|p| p.is_file())
        .collect();
    result.sort();
    Ok(result)
}

#[cfg(test)]
mod test {
    use super::find_include_files;

    #[test]
    fn relative_globs() {
        let tempdir = tempfile::tempdir().unwrap();
        let sub = tempdir.path().join("conf.d");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("b.conf"), "").unwrap();
        std::fs::write(sub.join("a.conf"), "").unwrap();
        std::fs::write(sub.join(".hidden.conf"), "").unwrap();
        std::fs::create_dir(sub.join("dir.conf")).unwrap();

        let found = find_include_files("conf.d/*.conf", tempdir.path()).unwrap();
        assert_eq!(found, vec![sub.join("a.conf"), sub.join("b.conf")]);
    }

    #[test]
    fn absolute_and_missing() {
        let tempdir = tempfile::tempdir().unwrap();
        let file = tempdir.path().join("exact");
        std::fs::write(&file, "").unwrap();
        let other = tempfile::tempdir().unwrap();

        let found = find_include_files(file.to_str().unwrap(), other.path()).unwrap();
        assert_eq!(found, vec![file]);
        let found = find_include_files("nonexistent*", other.path()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    #[ignore] // this test is dependent on the current user filespace
    fn tilde_expansion_current_user() {
        let a = find_include_files("~/.ssh/*", std::path::Path::new("/"))
            .expect("~ should expand to home directory");
        assert!(!a.is_empty());
    }
}
