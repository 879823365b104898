//! Turn loop tying the lookahead policy to a live game.
//!
//! The game itself sits behind [`GameSession`]: something that can report the
//! current board, take a move, and say whether the game is over. Each turn the
//! driver reads the board, asks the policy for a move, dispatches it, then
//! checks the game status. Turns never overlap and the loop can only be stopped
//! between turns.
//!
//! ```
//! use lookahead_2048::driver::{DriverConfig, Termination, TurnLoop};
//! use lookahead_2048::lookahead::Lookahead;
//! use lookahead_2048::simulated::SimulatedGame;
//!
//! let game = SimulatedGame::<4>::new(42);
//! let mut driver = TurnLoop::with_config(game, Lookahead::new(), DriverConfig { max_turns: Some(20) });
//! let summary = driver.run().unwrap();
//! assert!(summary.turns <= 20);
//! assert_ne!(summary.termination, Termination::Failed);
//! ```

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::engine::{Board, Move, Tile};
use crate::lookahead::Lookahead;

/// Failure reported by a [`GameSession`].
pub type SessionError = Box<dyn std::error::Error + Send + Sync>;

/// Status of the external game after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// The external game the driver plays against.
pub trait GameSession<const N: usize> {
    /// Snapshot the current tiles.
    fn read_board(&mut self) -> Result<Board<N>, SessionError>;

    /// Perform `direction` against the live game.
    fn apply_move(&mut self, direction: Move) -> Result<(), SessionError>;

    /// Whether the game has been won or lost.
    fn status(&mut self) -> GameStatus;
}

#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("could not read the board")]
    UnreadableState(#[source] SessionError),
    #[error("could not dispatch move {direction}")]
    DispatchFailure {
        direction: Move,
        #[source]
        source: SessionError,
    },
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Won,
    Lost,
    /// Every direction was a no-op, whether or not the game has noticed yet.
    NoLegalMove,
    /// `DriverConfig::max_turns` was reached.
    TurnLimit,
    /// A session call failed.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Playing,
    Terminated(Termination),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverConfig {
    /// Stop after this many dispatched moves.
    pub max_turns: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub turns: u64,
    pub termination: Termination,
    /// Highest tile on the last board read.
    pub highest_tile: Tile,
}

pub struct TurnLoop<S, const N: usize> {
    session: S,
    policy: Lookahead,
    cfg: DriverConfig,
    state: DriverState,
    turns: u64,
    last_board: Option<Board<N>>,
}

impl<S: GameSession<N>, const N: usize> TurnLoop<S, N> {
    pub fn new(session: S, policy: Lookahead) -> Self { Self::with_config(session, policy, DriverConfig::default()) }

    pub fn with_config(session: S, policy: Lookahead, cfg: DriverConfig) -> Self {
        Self { session, policy, cfg, state: DriverState::Playing, turns: 0, last_board: None }
    }

    #[inline]
    pub fn state(&self) -> DriverState { self.state }

    /// Moves dispatched so far.
    #[inline]
    pub fn turns(&self) -> u64 { self.turns }

    #[inline]
    pub fn session(&self) -> &S { &self.session }

    #[inline]
    pub fn policy(&self) -> &Lookahead { &self.policy }

    /// Board read at the start of the most recent turn.
    #[inline]
    pub fn last_board(&self) -> Option<&Board<N>> { self.last_board.as_ref() }

    pub fn into_session(self) -> S { self.session }

    /// Play exactly one turn. Once terminated, further calls do nothing.
    pub fn step(&mut self) -> Result<DriverState, DriverError> {
        if let DriverState::Terminated(_) = self.state {
            return Ok(self.state);
        }
        if self.cfg.max_turns.is_some_and(|limit| self.turns >= limit) {
            return Ok(self.terminate(Termination::TurnLimit));
        }

        let board = match self.session.read_board() {
            Ok(board) => board,
            Err(source) => {
                error!("turn {}: failed to read board: {source}", self.turns + 1);
                self.terminate(Termination::Failed);
                return Err(DriverError::UnreadableState(source));
            }
        };

        let chosen = self.policy.best_move(&board);
        self.last_board = Some(board);
        let Some(direction) = chosen else {
            return Ok(self.terminate(Termination::NoLegalMove));
        };

        if let Err(source) = self.session.apply_move(direction) {
            error!("turn {}: failed to dispatch {direction}: {source}", self.turns + 1);
            self.terminate(Termination::Failed);
            return Err(DriverError::DispatchFailure { direction, source });
        }
        self.turns += 1;
        let stats = self.policy.last_stats();
        debug!(
            "turn {}: {direction} ({} boards simulated, {} pruned)",
            self.turns, stats.simulated, stats.pruned
        );

        match self.session.status() {
            GameStatus::InProgress => Ok(self.state),
            GameStatus::Won => Ok(self.terminate(Termination::Won)),
            GameStatus::Lost => Ok(self.terminate(Termination::Lost)),
        }
    }

    /// Play turns until the loop terminates.
    pub fn run(&mut self) -> Result<GameSummary, DriverError> {
        loop {
            if let DriverState::Terminated(termination) = self.step()? {
                return Ok(self.summary(termination));
            }
        }
    }

    fn summary(&self, termination: Termination) -> GameSummary {
        GameSummary {
            turns: self.turns,
            termination,
            highest_tile: self.last_board.as_ref().map_or(0, Board::highest_tile),
        }
    }

    fn terminate(&mut self, termination: Termination) -> DriverState {
        info!("game over after {} turns: {termination:?}", self.turns);
        self.state = DriverState::Terminated(termination);
        self.state
    }
}
