use std::sync::Arc;

use log::trace;

use crate::engine::{execute, Board, Move, Score};

use super::{BranchValue, ConfigError, LookaheadConfig, MoveTree, SearchStats};

/// Fixed-depth lookahead over the agent's own moves.
///
/// The move tree for the configured depth is built once at construction and
/// reused by every search. Each search starts from scratch; nothing learned on
/// one board is carried to the next.
#[derive(Debug, Clone)]
pub struct Lookahead {
    cfg: LookaheadConfig,
    tree: Arc<MoveTree>,
    stats: SearchStats,
}

#[derive(Default)]
struct Counters {
    simulated: u64,
    pruned: u64,
}

#[derive(Debug, Clone, Copy)]
struct PlyResult {
    value: Score,
    move_dir: Move,
}

impl Lookahead {
    pub fn new() -> Self {
        let cfg = LookaheadConfig::default();
        Self { cfg, tree: MoveTree::shared(cfg.depth), stats: SearchStats::default() }
    }

    pub fn with_config(cfg: LookaheadConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self { cfg, tree: MoveTree::shared(cfg.depth), stats: SearchStats::default() })
    }

    #[inline]
    pub fn depth(&self) -> u32 { self.cfg.depth }

    /// First move of the best-valued move sequence, or `None` if every
    /// direction is a no-op on `board`.
    ///
    /// Ties go to the direction that comes first in [`Move::SEARCH_ORDER`].
    ///
    /// ```
    /// use lookahead_2048::engine::{Board, Move};
    /// use lookahead_2048::lookahead::Lookahead;
    ///
    /// let b = Board::from_rows([[4, 4, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]]);
    /// let mut la = Lookahead::new();
    /// assert!(la.best_move(&b).is_some());
    /// ```
    pub fn best_move<const N: usize>(&mut self, board: &Board<N>) -> Option<Move> {
        let mut counters = Counters::default();
        let result = evaluate(board, &self.tree, &mut counters);
        self.record(counters);
        trace!(
            "depth {} search chose {:?} (value {:?})",
            self.cfg.depth,
            result.map(|r| r.move_dir),
            result.map(|r| r.value)
        );
        result.map(|r| r.move_dir)
    }

    /// Best cumulative value reachable from `board`, if any move is legal.
    pub fn state_value<const N: usize>(&mut self, board: &Board<N>) -> Option<Score> {
        let mut counters = Counters::default();
        let result = evaluate(board, &self.tree, &mut counters);
        self.record(counters);
        result.map(|r| r.value)
    }

    /// Cumulative value of each top-ply move.
    ///
    /// Returns a fixed array in [`Move::SEARCH_ORDER`] and marks no-op moves
    /// as `legal = false` with value 0.
    ///
    /// ```
    /// use lookahead_2048::engine::{Board, Move};
    /// use lookahead_2048::lookahead::Lookahead;
    ///
    /// let b = Board::from_rows([[2, 0, 0, 2], [0; 4], [0; 4], [0; 4]]);
    /// let branches = Lookahead::new().branch_values(&b);
    /// assert_eq!(branches[0].dir, Move::Up);
    /// assert!(!branches[0].legal);
    /// ```
    pub fn branch_values<const N: usize>(&mut self, board: &Board<N>) -> [BranchValue; 4] {
        let mut counters = Counters::default();
        let mut out = Move::SEARCH_ORDER.map(|dir| BranchValue { dir, value: 0, legal: false });
        for (slot, (dir, subtree)) in out.iter_mut().zip(self.tree.branches()) {
            if let Some(value) = branch_value(board, *dir, subtree, &mut counters) {
                *slot = BranchValue { dir: *dir, value, legal: true };
            }
        }
        self.record(counters);
        out
    }

    /// Statistics collected from the last call to [`Self::best_move`],
    /// [`Self::state_value`] or [`Self::branch_values`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    /// Reset accumulated stats to zero.
    #[inline]
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    fn record(&mut self, counters: Counters) {
        self.stats.simulated = counters.simulated;
        self.stats.pruned = counters.pruned;
        self.stats.peak_simulated = self.stats.peak_simulated.max(counters.simulated);
    }
}

impl Default for Lookahead {
    fn default() -> Self { Self::new() }
}

/// Best move and value from `board` over the plies left in `tree`.
///
/// `None` means every direction at this ply was a no-op.
fn evaluate<const N: usize>(board: &Board<N>, tree: &MoveTree, counters: &mut Counters) -> Option<PlyResult> {
    let mut best: Option<PlyResult> = None;
    for (dir, subtree) in tree.branches() {
        let Some(value) = branch_value(board, *dir, subtree, counters) else { continue };
        if best.map_or(true, |b| value > b.value) {
            best = Some(PlyResult { value, move_dir: *dir });
        }
    }
    best
}

/// Value of playing `dir` on `board` then continuing through `subtree`.
///
/// `None` when `dir` is a no-op. A dead end below contributes nothing further.
fn branch_value<const N: usize>(
    board: &Board<N>,
    dir: Move,
    subtree: &MoveTree,
    counters: &mut Counters,
) -> Option<Score> {
    counters.simulated += 1;
    let outcome = execute(board, dir);
    if outcome.is_noop(board) {
        counters.pruned += 1;
        return None;
    }
    let future = if subtree.is_leaf() {
        0
    } else {
        evaluate(&outcome.board, subtree, counters).map_or(0, |r| r.value)
    };
    Some(outcome.score + future)
}
