//! Read-mostly operations
// (c) 2024 Ross Younger

use std::path::PathBuf;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::AliasManager;
use crate::{resolve::ResolvedAlias, store, Error, Result};

/// Filtering for [`AliasManager::list`]
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Regular expressions; an alias is listed if any of them matches its name or any of its own values.
    /// If empty, every alias is listed.
    pub keywords: Vec<String>,
    /// Match the keywords case-insensitively
    pub ignore_case: bool,
}

impl ListOptions {
    fn compile(&self) -> Result<Vec<Regex>> {
        self.keywords
            .iter()
            .map(|k| {
                RegexBuilder::new(k)
                    .case_insensitive(self.ignore_case)
                    .build()
                    .map_err(|e| Error::InvalidPattern {
                        pattern: k.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect()
    }
}

fn is_listed(alias: &ResolvedAlias, keywords: &[Regex]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    std::iter::once(alias.alias.as_str())
        .chain(alias.explicit.values().map(String::as_str))
        .any(|text| keywords.iter().any(|re| re.is_match(text)))
}

impl AliasManager {
    /// Lists the aliases matching the given keywords, in the order they were first seen.
    ///
    /// # Side effects
    /// Every file which holds at least one block is rewritten in canonical form, if it isn't already.
    pub fn list(&self, options: &ListOptions) -> Result<Vec<ResolvedAlias>> {
        let keywords = options.compile()?;
        let (registry, index) = self.load()?;
        for (path, tree) in registry.trees() {
            if !tree.is_empty() && store::persist(path, tree)? {
                debug!("normalised {path:?}");
            }
        }
        Ok(index
            .into_iter()
            .filter(|a| is_listed(a, &keywords))
            .collect())
    }

    /// Looks up one alias
    pub fn get(&self, alias: &str) -> Result<ResolvedAlias> {
        let index = self.index()?;
        index
            .get(alias)
            .cloned()
            .ok_or_else(|| Error::AliasNotFound(alias.to_owned()))
    }

    /// Looks up the effective value of one setting of one alias.
    ///
    /// Keys are not case sensitive.
    pub fn get_option(&self, alias: &str, key: &str) -> Result<String> {
        let resolved = self.get(alias)?;
        resolved
            .get(key)
            .map(str::to_owned)
            .ok_or_else(|| Error::KeyNotFound {
                alias: alias.to_owned(),
                key: key.to_lowercase(),
            })
    }

    /// Every file reachable from the primary file, which need not all exist on disk
    pub fn file_paths(&self) -> Result<Vec<PathBuf>> {
        let (registry, _) = self.load()?;
        Ok(registry.paths().map(PathBuf::from).collect())
    }
}

#[cfg(test)]
mod test {
    use super::ListOptions;
    use crate::{ops::AliasManager, util::make_test_tempfile, Error};
    use assertables::assert_contains;

    const CONFIG: &str = r"
Host web1
    HostName 10.0.0.1
    User www
Host DB1
    HostName db.example.com
Host *
    Port 2222
";

    fn names(list: &[crate::resolve::ResolvedAlias]) -> Vec<&str> {
        list.iter().map(|a| a.alias.as_str()).collect()
    }

    #[test]
    fn list_everything() {
        let (path, _dir) = make_test_tempfile(CONFIG, "config");
        let mgr = AliasManager::new(&path)
            .unwrap()
            .with_invoking_user(Some("tester".into()));
        let all = mgr.list(&ListOptions::default()).unwrap();
        assert_eq!(names(&all), vec!["web1", "DB1", "*"]);
    }

    #[test]
    fn keywords_match_names_and_values() {
        let (path, _dir) = make_test_tempfile(CONFIG, "config");
        let mgr = AliasManager::new(&path).unwrap();
        let opts = |k: &[&str], ignore_case| ListOptions {
            keywords: k.iter().map(|s| (*s).to_owned()).collect(),
            ignore_case,
        };
        assert_eq!(names(&mgr.list(&opts(&["^web"], false)).unwrap()), vec!["web1"]);
        assert_eq!(
            names(&mgr.list(&opts(&["example"], false)).unwrap()),
            vec!["DB1"]
        );
        assert!(mgr.list(&opts(&["^db1$"], false)).unwrap().is_empty());
        assert_eq!(names(&mgr.list(&opts(&["^db1$"], true)).unwrap()), vec!["DB1"]);
        // inherited values don't count
        assert_eq!(names(&mgr.list(&opts(&["^2222$"], false)).unwrap()), vec!["*"]);
    }

    #[test]
    fn bad_keyword() {
        let (path, _dir) = make_test_tempfile(CONFIG, "config");
        let mgr = AliasManager::new(&path).unwrap();
        let err = mgr
            .list(&ListOptions {
                keywords: vec!["(".into()],
                ignore_case: false,
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn list_normalises_once() {
        let (path, _dir) = make_test_tempfile("host a\n\n\n  HOSTNAME b\n", "config");
        let mgr = AliasManager::new(&path).unwrap();
        let _ = mgr.list(&ListOptions::default()).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, "Host a\n    hostname b\n");
        let modified = std::fs::metadata(&path).unwrap().modified().unwrap();
        let _ = mgr.list(&ListOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn get_option_lookups() {
        let (path, _dir) = make_test_tempfile(CONFIG, "config");
        let mgr = AliasManager::new(&path)
            .unwrap()
            .with_invoking_user(Some("tester".into()));
        assert_eq!(mgr.get_option("web1", "HostName").unwrap(), "10.0.0.1");
        assert_eq!(mgr.get_option("web1", "port").unwrap(), "2222");
        assert_eq!(mgr.get_option("DB1", "user").unwrap(), "tester");
        let err = mgr.get_option("web1", "ProxyJump").unwrap_err();
        assert_contains!(err.to_string(), "proxyjump");
        assert!(matches!(
            mgr.get_option("nope", "port").unwrap_err(),
            Error::AliasNotFound(_)
        ));
    }

    #[test]
    fn file_paths_include_missing_primary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        let mgr = AliasManager::new(&path).unwrap();
        assert_eq!(mgr.file_paths().unwrap(), vec![path]);
    }
}
