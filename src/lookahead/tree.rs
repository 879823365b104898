use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::engine::Move;

/// Every sequence of moves of a fixed length, as nested branches.
///
/// Holds no board data. Each node has one branch per direction in
/// [`Move::SEARCH_ORDER`], all pointing at the same shared subtree, so a tree
/// of depth `D` costs `D` nodes of memory while describing `4^D` paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTree {
    branches: Vec<(Move, Arc<MoveTree>)>,
}

static TREES: OnceLock<Mutex<HashMap<u32, Arc<MoveTree>>>> = OnceLock::new();

impl MoveTree {
    /// Build the tree for `depth` plies. Depth 0 has no branches.
    pub fn build(depth: u32) -> Self {
        if depth == 0 {
            return MoveTree { branches: Vec::new() };
        }
        let child = Arc::new(MoveTree::build(depth - 1));
        let branches = Move::SEARCH_ORDER.iter().map(|&dir| (dir, Arc::clone(&child))).collect();
        MoveTree { branches }
    }

    /// Process-wide tree for `depth`, built on first request and reused afterwards.
    pub fn shared(depth: u32) -> Arc<MoveTree> {
        let trees = TREES.get_or_init(|| Mutex::new(HashMap::new()));
        let mut trees = trees.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(trees.entry(depth).or_insert_with(|| Arc::new(MoveTree::build(depth))))
    }

    #[inline]
    pub fn branches(&self) -> &[(Move, Arc<MoveTree>)] { &self.branches }

    #[inline]
    pub fn is_leaf(&self) -> bool { self.branches.is_empty() }

    pub fn depth(&self) -> u32 {
        self.branches.first().map_or(0, |(_, child)| child.depth() + 1)
    }

    /// Number of complete move sequences (4^depth).
    pub fn leaf_count(&self) -> u64 {
        if self.is_leaf() {
            return 1;
        }
        self.branches.iter().map(|(_, child)| child.leaf_count()).sum()
    }

    /// All move sequences, in search order.
    pub fn paths(&self) -> Vec<Vec<Move>> {
        if self.is_leaf() {
            return vec![Vec::new()];
        }
        let mut out = Vec::new();
        for (dir, child) in &self.branches {
            for mut tail in child.paths() {
                tail.insert(0, *dir);
                out.push(tail);
            }
        }
        out
    }
}
