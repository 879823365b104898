//! Fixed-depth self-move lookahead policy for 2048.
//!
//! The policy enumerates every sequence of the agent's own moves up to a
//! configured depth, simulates each with [`engine::execute`], and picks the
//! first move of the sequence with the highest summed merge score.
//!
//! Notes
//! - Only the agent's moves are simulated. The tile the game inserts after
//!   each real move is never modelled, so deeper search is not reliably
//!   better: depth 2 often plays stronger games than depth 3.
//! - Moves that leave a board unchanged are pruned at every ply.
//! - Scores are summed across plies with no discount.
//!
//! Quick start
//! ```
//! use lookahead_2048::engine::{Board, Move};
//! use lookahead_2048::lookahead::{Lookahead, LookaheadConfig};
//!
//! let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! let mut policy = Lookahead::with_config(LookaheadConfig { depth: 1 }).unwrap();
//! assert_eq!(policy.best_move(&board), Some(Move::Left));
//! ```
//!
//! [`engine::execute`]: crate::engine::execute

use crate::engine::{Board, Move, Score};

mod search;
mod tree;

pub use search::Lookahead;
pub use tree::MoveTree;

/// Search horizon used when no depth is configured.
pub const DEFAULT_DEPTH: u32 = 2;

/// Configurable knobs for the lookahead.
///
/// - `depth`: number of plies searched; must be at least 1. Cost grows as 4^depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookaheadConfig {
    pub depth: u32,
}

impl Default for LookaheadConfig {
    fn default() -> Self { Self { depth: DEFAULT_DEPTH } }
}

impl LookaheadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("search depth must be at least 1")]
    ZeroDepth,
}

/// Cumulative value of one top-ply move.
///
/// - `value` is the move's own merge score plus the best value reachable after it.
/// - `legal` is false when the move is a no-op for the current board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchValue {
    pub dir: Move,
    pub value: Score,
    pub legal: bool,
}

/// Basic search stats.
///
/// `simulated` and `pruned` describe the last search; `peak_simulated` is the
/// largest `simulated` seen since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub simulated: u64,
    pub pruned: u64,
    pub peak_simulated: u64,
}

/// Pick the best move for `board` searching `depth` plies.
///
/// Returns `None` when `depth` is 0 or every direction is a no-op.
///
/// ```
/// use lookahead_2048::engine::Board;
/// use lookahead_2048::lookahead::select_best_move;
///
/// let stuck = Board::from_rows([[2, 4], [4, 2]]);
/// assert_eq!(select_best_move(&stuck, 3), None);
/// ```
pub fn select_best_move<const N: usize>(board: &Board<N>, depth: u32) -> Option<Move> {
    let mut policy = Lookahead::with_config(LookaheadConfig { depth }).ok()?;
    policy.best_move(board)
}
