//! Creating, updating and deleting aliases
// (c) 2024 Ross Younger

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use tracing::{debug, trace, warn};

use super::{absolute_path, AliasManager, ConnectString};
use crate::{
    resolve::ResolvedAlias,
    sshconfig::{canonical_value, validate_pattern, validate_setting, Block, Node, SyntaxTree},
    store, Error, Result,
};

/// Parameters for [`AliasManager::create`]
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// The new alias
    pub alias: String,
    /// Optional `[user@]host[:port]`; fills in only what `settings` does not set
    pub connect: Option<String>,
    /// Settings for the new block. Values are stored in canonical (quoted) form;
    /// empty or blank values are skipped.
    pub settings: BTreeMap<String, String>,
    /// File to write the new block to, if not the primary file
    pub target: Option<PathBuf>,
}

/// Parameters for [`AliasManager::update`]
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// The alias to change
    pub alias: String,
    /// Rename the alias to this
    pub new_alias: Option<String>,
    /// Optional `[user@]host[:port]`; fills in only what `changes` does not set
    pub connect: Option<String>,
    /// Settings to change. An empty or blank value removes the setting.
    pub changes: BTreeMap<String, String>,
}

/// Lowercases the keys, folds in a connection string and brings every value into canonical form.
///
/// Fails before anything is written if a setting could not be stored as given.
fn gather(
    settings: &BTreeMap<String, String>,
    connect: Option<&str>,
) -> Result<BTreeMap<String, String>> {
    let mut result = BTreeMap::new();
    for (key, value) in settings {
        let _ = result.insert(key.to_lowercase(), value.clone());
    }
    if let Some(c) = connect {
        ConnectString::from(c).fill_into(&mut result);
    }
    result
        .into_iter()
        .map(|(key, value)| -> Result<(String, String)> {
            validate_setting(&key, &value)?;
            Ok((key, canonical_value(&value)))
        })
        .collect()
}

fn to_nodes<'a, I: IntoIterator<Item = (&'a String, &'a String)>>(settings: I) -> Vec<Node> {
    settings
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| Node::key_value(k, v))
        .collect()
}

/// The trees being edited.
///
/// A removed block leaves a hole, so the block indices recorded in the alias index stay valid
/// throughout an operation.
#[derive(Debug, Default)]
struct Workspace {
    files: BTreeMap<PathBuf, Vec<Option<Block>>>,
    touched: BTreeSet<PathBuf>,
}

impl Workspace {
    fn new(trees: BTreeMap<PathBuf, SyntaxTree>) -> Self {
        Self {
            files: trees
                .into_iter()
                .map(|(path, tree)| (path, tree.blocks.into_iter().map(Some).collect()))
                .collect(),
            touched: BTreeSet::new(),
        }
    }

    fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn add_file(&mut self, path: &Path) -> Result<()> {
        let tree = store::load(path)?;
        let _ = self.files.insert(
            path.to_path_buf(),
            tree.blocks.into_iter().map(Some).collect(),
        );
        Ok(())
    }

    fn block(&self, path: &Path, index: usize) -> Option<&Block> {
        self.files.get(path)?.get(index)?.as_ref()
    }

    fn slot(&mut self, path: &Path, index: usize) -> Option<&mut Option<Block>> {
        let slot = self.files.get_mut(path)?.get_mut(index)?;
        let _ = self.touched.insert(path.to_path_buf());
        Some(slot)
    }

    fn append(&mut self, path: &Path, block: Block) {
        trace!("appending block {:?} to {path:?}", block.patterns);
        self.files
            .entry(path.to_path_buf())
            .or_default()
            .push(Some(block));
        let _ = self.touched.insert(path.to_path_buf());
    }

    /// Replaces a block's patterns and settings. Any `Include` directives it holds are kept.
    fn rewrite(&mut self, path: &Path, index: usize, pattern: &str, settings: Vec<Node>) {
        let Some(Some(block)) = self.slot(path, index) else {
            return;
        };
        let mut nodes: Vec<Node> = block
            .nodes
            .iter()
            .filter(|n| matches!(n, Node::Include { .. }))
            .cloned()
            .collect();
        nodes.extend(settings);
        *block = Block::new(pattern, nodes);
    }

    /// Removes a block.
    /// If it holds `Include` directives, the block stays behind with only those.
    fn remove(&mut self, path: &Path, index: usize) {
        let Some(slot) = self.slot(path, index) else {
            return;
        };
        let Some(block) = slot.as_mut() else {
            return;
        };
        block
            .nodes
            .retain(|n| matches!(n, Node::Include { .. }));
        if block.nodes.is_empty() {
            *slot = None;
        }
    }

    /// Takes `alias` out of a block's patterns, removing the block if nothing else is left.
    fn trim(&mut self, path: &Path, index: usize, alias: &str) {
        let Some(block) = self.block(path, index) else {
            return;
        };
        if !block.patterns.iter().any(|p| p == alias) {
            // already taken out
            return;
        }
        if block.patterns.iter().all(|p| p == alias) {
            self.remove(path, index);
        } else if let Some(Some(block)) = self.slot(path, index) {
            block.patterns.retain(|p| p != alias);
        }
    }

    /// Writes out every file that was changed
    fn persist(mut self) -> Result<()> {
        for path in std::mem::take(&mut self.touched) {
            let blocks = self.files.remove(&path).unwrap_or_default();
            let tree = SyntaxTree {
                blocks: blocks.into_iter().flatten().collect(),
            };
            let _ = store::persist(&path, &tree)?;
        }
        Ok(())
    }
}

impl AliasManager {
    /// Adds a new alias as a single-pattern block at the end of the target file.
    ///
    /// Returns the resolved view of the new alias. If it isn't declared after the write
    /// (it has no settings, or the target is not reachable from the primary file),
    /// what is returned is the inherited view it would have.
    pub fn create(&self, options: &CreateOptions) -> Result<ResolvedAlias> {
        let alias = options.alias.as_str();
        validate_pattern(alias)?;
        let (registry, index) = self.load()?;
        if index.contains(alias) {
            return Err(Error::AliasAlreadyExists(alias.to_owned()));
        }
        let settings = gather(&options.settings, options.connect.as_deref())?;
        let target = match &options.target {
            Some(t) => absolute_path(t)?,
            None => self.primary.clone(),
        };

        let mut workspace = Workspace::new(registry.into_trees());
        if !workspace.contains(&target) {
            warn!(
                "{} is not included from {}; the new alias will not be visible",
                target.display(),
                self.primary.display()
            );
            workspace.add_file(&target)?;
        }
        workspace.append(&target, Block::new(alias, to_nodes(&settings)));
        workspace.persist()?;
        debug!("created {alias} in {target:?}");

        Ok(self.index()?.resolve_or_probe(alias, &target))
    }

    /// Renames an alias and/or changes its settings.
    ///
    /// In the file where the alias was first seen, the alias ends up with a single block of its own
    /// holding its full set of settings. In every other file it is removed.
    pub fn update(&self, options: &UpdateOptions) -> Result<ResolvedAlias> {
        let alias = options.alias.as_str();
        let (registry, index) = self.load()?;
        let existing = index
            .get(alias)
            .ok_or_else(|| Error::AliasNotFound(alias.to_owned()))?;

        let changes = gather(&options.changes, options.connect.as_deref())?;
        let new_alias = options.new_alias.as_deref().filter(|a| !a.is_empty());
        if new_alias.is_none() && changes.is_empty() {
            return Err(Error::InvalidUpdate);
        }
        if let Some(n) = new_alias {
            validate_pattern(n)?;
            if index.contains(n) {
                return Err(Error::AliasAlreadyExists(n.to_owned()));
            }
        }
        let new_alias = new_alias.unwrap_or(alias);

        let mut updated = existing.explicit.clone();
        for (k, v) in &changes {
            if v.is_empty() {
                let _ = updated.remove(k);
            } else {
                let _ = updated.insert(k.clone(), v.clone());
            }
        }
        let full = to_nodes(&updated);

        let primary = &existing.primary_path;
        let mut workspace = Workspace::new(registry.into_trees());
        for (path, occurrences) in &existing.occurrences {
            for (i, occurrence) in occurrences.iter().enumerate() {
                let first = i == 0;
                let Some(block_index) = occurrence.index else {
                    // The built-in fallback lives in no file; add a real block in its place
                    if path == primary && first {
                        workspace.append(path, Block::new(new_alias, to_nodes(&changes)));
                    }
                    continue;
                };
                let Some(single) = workspace
                    .block(path, block_index)
                    .map(|b| b.patterns.len() == 1)
                else {
                    continue;
                };
                if path != primary {
                    workspace.trim(path, block_index, alias);
                } else if single {
                    if first {
                        workspace.rewrite(path, block_index, new_alias, full.clone());
                    } else {
                        workspace.remove(path, block_index);
                    }
                } else {
                    if first {
                        workspace.append(path, Block::new(new_alias, full.clone()));
                    }
                    workspace.trim(path, block_index, alias);
                }
            }
        }
        let primary = primary.clone();
        workspace.persist()?;
        debug!("updated {alias} (now {new_alias})");

        Ok(self.index()?.resolve_or_probe(new_alias, &primary))
    }

    /// Deletes aliases, returning what they looked like beforehand.
    ///
    /// Every alias is checked before anything is changed.
    pub fn delete<S: AsRef<str>>(&self, aliases: &[S]) -> Result<Vec<ResolvedAlias>> {
        let (registry, index) = self.load()?;
        let snapshots = aliases
            .iter()
            .map(|a| {
                let a = a.as_ref();
                index
                    .get(a)
                    .cloned()
                    .ok_or_else(|| Error::AliasNotFound(a.to_owned()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut workspace = Workspace::new(registry.into_trees());
        for snapshot in &snapshots {
            for (path, occurrences) in &snapshot.occurrences {
                for block_index in occurrences.iter().filter_map(|o| o.index) {
                    workspace.trim(path, block_index, &snapshot.alias);
                }
            }
            debug!("deleted {}", snapshot.alias);
        }
        workspace.persist()?;
        Ok(snapshots)
    }
}

///////////////////////////////////////////////////////////////////////////////////////
