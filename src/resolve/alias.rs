//! The resolved view of one alias
// (c) 2024 Ross Younger

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::sshconfig::Block;

/// One place an alias is declared: a single pattern on a single block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Position of the block within its file.
    /// `None` for the built-in fallback, which lives in no file.
    pub index: Option<usize>,
    /// The block as it was when the index was built
    pub block: Block,
}

impl Occurrence {
    /// Is this the built-in fallback rather than a block in a file?
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.index.is_none()
    }
}

/// The effective settings of an alias, and where it is declared.
///
/// `explicit` and `inherited` never share a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAlias {
    /// The literal pattern text
    pub alias: String,
    /// The file in which the alias was first seen
    pub primary_path: PathBuf,
    /// Every declaration of this alias, by file
    pub occurrences: BTreeMap<PathBuf, Vec<Occurrence>>,
    /// Settings declared in the alias's own blocks
    pub explicit: BTreeMap<String, String>,
    /// Settings picked up from other, matching, patterns
    pub inherited: BTreeMap<String, String>,
}

impl ResolvedAlias {
    pub(crate) fn new(alias: &str, path: &Path, occurrence: Occurrence) -> Self {
        let mut occurrences = BTreeMap::new();
        let _ = occurrences.insert(path.to_path_buf(), vec![occurrence]);
        Self {
            alias: alias.to_owned(),
            primary_path: path.to_path_buf(),
            occurrences,
            explicit: BTreeMap::new(),
            inherited: BTreeMap::new(),
        }
    }

    /// Looks up a setting: the explicit value if there is one, else the inherited value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.explicit
            .get(&key)
            .or_else(|| self.inherited.get(&key))
            .map(String::as_str)
    }

    /// Is there a hostname to connect to?
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        self.get("hostname").is_some_and(|h| !h.is_empty())
    }

    /// `user@hostname:port`, if the alias is displayable
    #[must_use]
    pub fn connection_string(&self) -> Option<String> {
        if !self.is_displayable() {
            return None;
        }
        let field = |k| self.get(k).unwrap_or_default();
        Some(format!(
            "{}@{}:{}",
            field("user"),
            field("hostname"),
            field("port")
        ))
    }

    /// The files this alias is declared in
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.occurrences.keys().map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod test {
    use super::{Occurrence, ResolvedAlias};
    use crate::sshconfig::Block;
    use std::path::Path;

    fn sample() -> ResolvedAlias {
        let occ = Occurrence {
            index: Some(0),
            block: Block::new("db1", vec![]),
        };
        ResolvedAlias::new("db1", Path::new("/x/config"), occ)
    }

    #[test]
    fn explicit_beats_inherited() {
        let mut r = sample();
        let _ = r.explicit.insert("port".into(), "2222".into());
        let _ = r.inherited.insert("user".into(), "me".into());
        assert_eq!(r.get("PORT"), Some("2222"));
        assert_eq!(r.get("user"), Some("me"));
        assert_eq!(r.get("hostname"), None);
    }

    #[test]
    fn displayability() {
        let mut r = sample();
        assert!(!r.is_displayable());
        assert_eq!(r.connection_string(), None);
        let _ = r.inherited.insert("hostname".into(), "h".into());
        let _ = r.inherited.insert("port".into(), "22".into());
        let _ = r.explicit.insert("user".into(), "alice".into());
        assert!(r.is_displayable());
        assert_eq!(r.connection_string().unwrap(), "alice@h:22");
    }
}
