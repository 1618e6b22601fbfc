//! Loading a config file together with everything it includes
// (c) 2024 Ross Younger

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use crate::{
    sshconfig::{find_include_files, Block, SyntaxTree},
    store, Error, Result,
};

/// Where a block lives: the file, and its index in that file's tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockRef {
    pub(crate) path: PathBuf,
    pub(crate) index: usize,
}

/// Every tree reachable from a root file, keyed by absolute path.
///
/// Also records the order in which blocks are to be considered for alias resolution:
/// the blocks of an included file come at the point of the `Include`, before the block containing it.
#[derive(Debug, Default)]
pub(crate) struct TreeRegistry {
    root: PathBuf,
    trees: BTreeMap<PathBuf, SyntaxTree>,
    visit_order: Vec<BlockRef>,
}

impl TreeRegistry {
    const INCLUDE_DEPTH_LIMIT: u8 = 16;

    /// Loads `root` and, recursively, all the files it includes.
    pub(crate) fn load(root: &Path) -> Result<Self> {
        let mut registry = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };
        let base_dir = root.parent().unwrap_or(Path::new("/")).to_path_buf();
        registry.load_file(root, &base_dir, 0)?;
        Ok(registry)
    }

    fn load_file(&mut self, path: &Path, base_dir: &Path, depth: u8) -> Result<()> {
        if depth >= Self::INCLUDE_DEPTH_LIMIT {
            return Err(Error::io(
                path,
                anyhow::anyhow!("too many nested includes"),
            ));
        }
        let tree = store::load(path)?;
        debug!("loaded {path:?}: {} blocks", tree.blocks.len());
        let includes: Vec<(usize, Vec<String>)> = tree
            .blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (i, b.includes().map(str::to_owned).collect()))
            .collect();
        let has_settings: Vec<bool> = tree.blocks.iter().map(Block::has_settings).collect();
        let _ = self.trees.insert(path.to_path_buf(), tree);

        for (index, args) in includes {
            for arg in args {
                let files = find_include_files(&arg, base_dir).map_err(|e| {
                    Error::io(path, e.context(format!("Include directive in block {index}")))
                })?;
                trace!("include {arg:?} in {path:?} expands to {files:?}");
                for file in files {
                    self.load_file(&file, base_dir, depth + 1)?;
                }
            }
            if has_settings[index] {
                self.visit_order.push(BlockRef {
                    path: path.to_path_buf(),
                    index,
                });
            }
        }
        Ok(())
    }

    /// The file this registry was loaded from
    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Blocks which declare settings, in resolution order
    pub(crate) fn visit_order(&self) -> &[BlockRef] {
        &self.visit_order
    }

    pub(crate) fn block(&self, r: &BlockRef) -> Option<&Block> {
        self.trees.get(&r.path).and_then(|t| t.blocks.get(r.index))
    }

    pub(crate) fn tree(&self, path: &Path) -> Option<&SyntaxTree> {
        self.trees.get(path)
    }

    /// Takes ownership of the trees, for editing
    pub(crate) fn into_trees(self) -> BTreeMap<PathBuf, SyntaxTree> {
        self.trees
    }

    pub(crate) fn paths(&self) -> impl Iterator<Item = &Path> {
        self.trees.keys().map(PathBuf::as_path)
    }

    pub(crate) fn trees(&self) -> impl Iterator<Item = (&Path, &SyntaxTree)> {
        self.trees.iter().map(|(p, t)| (p.as_path(), t))
    }
}
