//! Building the alias index
// (c) 2024 Ross Younger

use std::{collections::BTreeMap, path::Path};

use tracing::trace;

use super::{Occurrence, ResolvedAlias};
use crate::{
    registry::TreeRegistry,
    sshconfig::{pattern_matches, Block, Node},
};

/// The pattern of the built-in fallback block
pub const FALLBACK_PATTERN: &str = "*";
/// Port supplied by the built-in fallback block
pub const FALLBACK_PORT: &str = "22";

/// Every alias found in a set of config files, with its effective settings.
///
/// Entries are kept in the order they were first seen. Resolution depends on that order:
/// inheritance and donation only ever involve aliases already in the index.
#[derive(Debug, Default, Clone)]
pub struct AliasIndex {
    entries: Vec<ResolvedAlias>,
    positions: BTreeMap<String, usize>,
}

impl AliasIndex {
    /// Resolves every block in the registry, then the built-in fallback.
    pub(crate) fn build(registry: &TreeRegistry, invoking_user: Option<&str>) -> Self {
        let mut index = Self::default();
        for r in registry.visit_order() {
            if let Some(block) = registry.block(r) {
                index.ingest(&r.path, Some(r.index), block);
            }
        }
        index.ingest(registry.root(), None, &fallback_block(invoking_user));
        index
    }

    /// Resolves one block: each of its patterns is an occurrence of an alias.
    fn ingest(&mut self, path: &Path, index: Option<usize>, block: &Block) {
        if !block.has_settings() {
            return;
        }
        for alias in &block.patterns {
            let occurrence = Occurrence {
                index,
                block: block.clone(),
            };
            let mut working = ResolvedAlias::new(alias, path, occurrence);

            // Pick up what earlier, matching, patterns declare.
            working.inherited = self.inherited_by(alias);

            // An inherited key suppresses this block's own value for it.
            for (key, value) in block.settings() {
                if working.inherited.contains_key(key) || working.explicit.contains_key(key) {
                    continue;
                }
                let _ = working.explicit.insert(key.to_owned(), value.to_owned());
            }

            // Hand our settings down to earlier aliases which this pattern covers.
            if !working.explicit.is_empty() {
                self.donate(alias, &working.explicit);
            }

            self.merge(working);
        }
    }

    /// Collects the explicit settings of every indexed alias (other than `alias` itself)
    /// whose pattern matches `alias`. The first match for each key wins.
    fn inherited_by(&self, alias: &str) -> BTreeMap<String, String> {
        let mut inherited = BTreeMap::new();
        for entry in &self.entries {
            if entry.alias == alias || !pattern_matches(&entry.alias, alias) {
                continue;
            }
            trace!("{alias} inherits from {}", entry.alias);
            for (k, v) in &entry.explicit {
                let _ = inherited.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }
        inherited
    }

    /// Gives `settings` to every indexed alias (other than `pattern` itself) which `pattern` matches,
    /// where that alias has no value of its own yet.
    fn donate(&mut self, pattern: &str, settings: &BTreeMap<String, String>) {
        for entry in &mut self.entries {
            if entry.alias == pattern || !pattern_matches(pattern, &entry.alias) {
                continue;
            }
            trace!("{pattern} donates to {}", entry.alias);
            for (k, v) in settings {
                if entry.explicit.contains_key(k) || entry.inherited.contains_key(k) {
                    continue;
                }
                let _ = entry.inherited.insert(k.clone(), v.clone());
            }
        }
    }

    fn merge(&mut self, working: ResolvedAlias) {
        let Some(&pos) = self.positions.get(&working.alias) else {
            let _ = self.positions.insert(working.alias.clone(), self.entries.len());
            self.entries.push(working);
            return;
        };
        let existing = &mut self.entries[pos];
        for (k, v) in working.explicit {
            if existing.explicit.contains_key(&k) || existing.inherited.contains_key(&k) {
                continue;
            }
            let _ = existing.explicit.insert(k, v);
        }
        for (path, occurrences) in working.occurrences {
            existing
                .occurrences
                .entry(path)
                .or_default()
                .extend(occurrences);
        }
    }

    /// Looks up an alias by its literal text
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&ResolvedAlias> {
        self.positions.get(alias).map(|&i| &self.entries[i])
    }

    /// Is this literal alias declared?
    #[must_use]
    pub fn contains(&self, alias: &str) -> bool {
        self.positions.contains_key(alias)
    }

    /// All aliases, in the order first seen
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedAlias> {
        self.entries.iter()
    }

    /// Number of aliases
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the index empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The view an undeclared alias would have: only what it would inherit from the indexed patterns.
    #[must_use]
    pub fn probe(&self, alias: &str, path: &Path) -> ResolvedAlias {
        ResolvedAlias {
            alias: alias.to_owned(),
            primary_path: path.to_path_buf(),
            occurrences: BTreeMap::new(),
            explicit: BTreeMap::new(),
            inherited: self.inherited_by(alias),
        }
    }

    /// The resolved alias if it is declared, otherwise its probe.
    #[must_use]
    pub fn resolve_or_probe(&self, alias: &str, path: &Path) -> ResolvedAlias {
        self.get(alias)
            .cloned()
            .unwrap_or_else(|| self.probe(alias, path))
    }
}

impl IntoIterator for AliasIndex {
    type Item = ResolvedAlias;
    type IntoIter = std::vec::IntoIter<ResolvedAlias>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The lowest-priority block, applied after every file has been read
pub(crate) fn fallback_block(invoking_user: Option<&str>) -> Block {
    let mut nodes = Vec::new();
    if let Some(user) = invoking_user.filter(|u| !u.is_empty()) {
        nodes.push(Node::key_value("user", user));
    }
    nodes.push(Node::key_value("port", FALLBACK_PORT));
    Block::new(FALLBACK_PATTERN, nodes)
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::AliasIndex;
    use crate::{registry::TreeRegistry, util::make_test_tempfile};

    fn index_of(config: &str) -> AliasIndex {
        let (path, _dir) = make_test_tempfile(config, "config");
        let registry = TreeRegistry::load(&path).unwrap();
        AliasIndex::build(&registry, Some("tester"))
    }

    fn assert_disjoint(index: &AliasIndex) {
        for a in index.iter() {
            for k in a.explicit.keys() {
                assert!(
                    !a.inherited.contains_key(k),
                    "{}: {k} is both explicit and inherited",
                    a.alias
                );
            }
        }
    }

    #[test]
    fn fallback_supplies_user_and_port() {
        let index = index_of("Host db1\n  HostName h1\n");
        let db1 = index.get("db1").unwrap();
        assert_eq!(db1.explicit.get("hostname").unwrap(), "h1");
        assert_eq!(db1.inherited.get("port").unwrap(), "22");
        assert_eq!(db1.inherited.get("user").unwrap(), "tester");
        assert!(db1.occurrences.values().flatten().all(|o| !o.is_fallback()));
        let star = index.get("*").unwrap();
        assert_eq!(star.explicit.get("port").unwrap(), "22");
        assert!(star.occurrences.values().flatten().all(|o| o.is_fallback()));
        assert_disjoint(&index);
    }

    #[test]
    fn fallback_never_supplies_hostname() {
        let index = index_of("Host db1\n  User admin\n");
        let db1 = index.get("db1").unwrap();
        assert!(!db1.is_displayable());
        assert_eq!(db1.get("user"), Some("admin"));
    }

    #[test]
    fn earlier_wildcard_is_inherited() {
        let index = index_of(
            r"
            Host db*
                Port 2200
                User dba
            Host db1
                HostName h1
        ",
        );
        let db1 = index.get("db1").unwrap();
        assert_eq!(db1.inherited.get("port").unwrap(), "2200");
        assert_eq!(db1.inherited.get("user").unwrap(), "dba");
        assert_eq!(db1.explicit.len(), 1);
        assert_disjoint(&index);
    }

    #[test]
    fn later_wildcard_donates() {
        let index = index_of(
            r"
            Host db1
                HostName h1
                Port 1111
            Host db*
                Port 2200
                Compression yes
        ",
        );
        let db1 = index.get("db1").unwrap();
        assert_eq!(db1.explicit.get("port").unwrap(), "1111");
        assert_eq!(db1.inherited.get("compression").unwrap(), "yes");
        assert_eq!(db1.inherited.get("port"), None);
        assert_disjoint(&index);
    }

    #[test]
    fn inherited_key_suppresses_own_value() {
        // The earlier wildcard's value wins over the alias's own declaration.
        let index = index_of(
            r"
            Host db*
                Port 2200
            Host db1
                Port 3300
                HostName h1
        ",
        );
        let db1 = index.get("db1").unwrap();
        assert_eq!(db1.get("port"), Some("2200"));
        assert!(!db1.explicit.contains_key("port"));
        assert_disjoint(&index);
    }

    #[test]
    fn first_inherited_match_wins() {
        let index = index_of(
            r"
            Host d*
                Port 1
            Host db*
                Port 2
                User u2
            Host db1
                HostName h
        ",
        );
        let db1 = index.get("db1").unwrap();
        assert_eq!(db1.inherited.get("port").unwrap(), "1");
        assert_eq!(db1.inherited.get("user").unwrap(), "u2");
    }

    #[test]
    fn repeated_alias_merges_first_value_wins() {
        let index = index_of(
            r"
            Host web
                HostName first
            Host other
                HostName o
            Host web
                HostName second
                User www
        ",
        );
        let web = index.get("web").unwrap();
        assert_eq!(web.explicit.get("hostname").unwrap(), "first");
        assert_eq!(web.explicit.get("user").unwrap(), "www");
        let occurrences: Vec<_> = web.occurrences.values().flatten().collect();
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].index, Some(0));
        assert_eq!(occurrences[1].index, Some(2));
        // first-seen order is kept
        let names: Vec<_> = index.iter().map(|a| a.alias.as_str()).collect();
        assert_eq!(names, vec!["web", "other", "*"]);
    }

    #[test]
    fn repeated_key_in_one_block_first_wins() {
        let index = index_of("Host web\n  Port 1\n  HostName w\n  Port 2\n");
        let web = index.get("web").unwrap();
        assert_eq!(web.explicit.get("port").unwrap(), "1");
    }

    #[test]
    fn shared_block_serves_every_pattern() {
        let index = index_of("Host a b\n  HostName shared\n");
        assert_eq!(index.get("a").unwrap().get("hostname"), Some("shared"));
        assert_eq!(index.get("b").unwrap().get("hostname"), Some("shared"));
    }

    #[test]
    fn blocks_without_settings_are_dropped() {
        let index = index_of("Host empty\nHost full\n  HostName x\n");
        assert!(!index.contains("empty"));
        assert!(index.contains("full"));
    }

    #[test]
    fn user_star_block_and_fallback() {
        let index = index_of(
            r"
            Host db1
                HostName h
            Host *
                Port 2022
        ",
        );
        let db1 = index.get("db1").unwrap();
        assert_eq!(db1.get("port"), Some("2022"));
        assert_eq!(db1.get("user"), Some("tester"));
        let star = index.get("*").unwrap();
        assert_eq!(star.explicit.get("port").unwrap(), "2022");
        assert_eq!(star.explicit.get("user").unwrap(), "tester");
        assert_disjoint(&index);
    }

    #[test]
    fn probe_of_undeclared_alias() {
        let index = index_of("Host db*\n  Port 2200\n");
        assert!(!index.contains("db1"));
        let probe = index.probe("db1", std::path::Path::new("/x"));
        assert_eq!(probe.get("port"), Some("2200"));
        assert_eq!(probe.get("user"), Some("tester"));
        assert!(probe.explicit.is_empty());
    }
}
