//! Copying the config files somewhere safe
// (c) 2024 Ross Younger

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use super::{absolute_path, AliasManager};
use crate::{store, Result};

/// Where `file` goes under `dest`: files beneath `base` keep their relative path,
/// anything else lands at the top level.
fn backup_location(file: &Path, base: &Path, dest: &Path) -> PathBuf {
    match file.strip_prefix(base) {
        Ok(relative) => dest.join(relative),
        Err(_) => dest.join(file.file_name().unwrap_or(file.as_os_str())),
    }
}

impl AliasManager {
    /// Copies every reachable config file into `dest`, returning the paths written.
    ///
    /// Files which don't exist on disk are skipped. Two files from outside the primary file's directory
    /// which share a name both land at the top level; the later one wins, with a warning.
    /// The first failure stops the backup; anything already copied stays.
    pub fn backup<P: AsRef<Path>>(&self, dest: P) -> Result<Vec<PathBuf>> {
        let dest = absolute_path(dest.as_ref())?;
        let base = self.primary.parent().unwrap_or(Path::new("/"));
        let mut written = Vec::new();
        let mut seen = BTreeSet::new();
        for file in self.file_paths()? {
            if !file.is_file() {
                warn!("{} does not exist, not backing it up", file.display());
                continue;
            }
            let location = backup_location(&file, base, &dest);
            if !seen.insert(location.clone()) {
                warn!(
                    "{} overwrites an earlier file in the backup at {}",
                    file.display(),
                    location.display()
                );
            }
            let copy = store::copy(&file, &location)?;
            info!("backed up {} to {}", file.display(), copy.display());
            written.push(copy);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod test {
    use std::{fs, path::Path};

    use super::backup_location;
    use crate::{ops::AliasManager, util::make_test_tempfile};

    #[test]
    fn locations() {
        let base = Path::new("/home/u/.ssh");
        let dest = Path::new("/backup");
        assert_eq!(
            backup_location(Path::new("/home/u/.ssh/config"), base, dest),
            Path::new("/backup/config")
        );
        assert_eq!(
            backup_location(Path::new("/home/u/.ssh/conf.d/work"), base, dest),
            Path::new("/backup/conf.d/work")
        );
        assert_eq!(
            backup_location(Path::new("/etc/ssh/extra"), base, dest),
            Path::new("/backup/extra")
        );
    }

    #[test]
    fn backup_mirrors_layout() {
        let (path, dir) = make_test_tempfile("Include conf.d/*\nHost a\n  HostName b\n", "config");
        fs::create_dir(dir.path().join("conf.d")).unwrap();
        fs::write(dir.path().join("conf.d/one"), "Host one\n  HostName 1\n").unwrap();
        let dest = tempfile::tempdir().unwrap();
        let target = dest.path().join("nested/backup");

        let written = AliasManager::new(&path).unwrap().backup(&target).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read_to_string(target.join("config")).unwrap(),
            fs::read_to_string(&path).unwrap()
        );
        assert_eq!(
            fs::read_to_string(target.join("conf.d/one")).unwrap(),
            "Host one\n  HostName 1\n"
        );
    }

    #[test]
    fn same_name_outside_the_base_collides() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["main", "x", "y"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
        }
        let (x, y) = (dir.path().join("x/extra"), dir.path().join("y/extra"));
        fs::write(&x, "Host x\n  HostName 1\n").unwrap();
        fs::write(&y, "Host y\n  HostName 2\n").unwrap();
        let primary = dir.path().join("main/config");
        fs::write(
            &primary,
            format!("Include {} {}\n", x.display(), y.display()),
        )
        .unwrap();
        let dest = dir.path().join("out");

        let written = AliasManager::new(&primary).unwrap().backup(&dest).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(
            fs::read_to_string(dest.join("extra")).unwrap(),
            "Host y\n  HostName 2\n"
        );
    }

    #[test]
    fn missing_primary_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mgr = AliasManager::new(dir.path().join("config")).unwrap();
        let dest = dir.path().join("out");
        assert!(mgr.backup(&dest).unwrap().is_empty());
        assert!(!dest.exists());
    }
}
