use log::trace;
use rand::{rngs::StdRng, SeedableRng};

use crate::driver::{GameSession, GameStatus, SessionError};
use crate::engine::{execute, Board, Move, Score, Tile};

/// Tile value that wins a game unless configured otherwise.
pub const DEFAULT_TARGET: Tile = 2048;

/// An in-process 2048 game.
///
/// Starts with two random tiles. After every move that changes the board a 2
/// (90%) or 4 (10%) lands on a random empty cell. All randomness comes from a
/// seeded RNG, so a seed fully determines the game for a given move sequence.
#[derive(Debug, Clone)]
pub struct SimulatedGame<const N: usize = 4> {
    board: Board<N>,
    score: Score,
    moves: u64,
    target: Tile,
    rng: StdRng,
}

impl<const N: usize> SimulatedGame<N> {
    pub fn new(seed: u64) -> Self { Self::with_target(seed, DEFAULT_TARGET) }

    pub fn with_target(seed: u64, target: Tile) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::<N>::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
        Self { board, score: 0, moves: 0, target, rng }
    }

    /// Continue a game from an existing position.
    pub fn from_board(board: Board<N>, seed: u64, target: Tile) -> Self {
        Self { board, score: 0, moves: 0, target, rng: StdRng::seed_from_u64(seed) }
    }

    #[inline]
    pub fn board(&self) -> &Board<N> { &self.board }

    /// Sum of every merge made so far.
    #[inline]
    pub fn score(&self) -> Score { self.score }

    /// Moves that changed the board.
    #[inline]
    pub fn moves(&self) -> u64 { self.moves }

    #[inline]
    pub fn target(&self) -> Tile { self.target }

    /// Perform a move then insert a random tile if the move changed the board.
    ///
    /// Returns whether the board changed.
    pub fn play(&mut self, direction: Move) -> bool {
        let outcome = execute(&self.board, direction);
        if outcome.is_noop(&self.board) {
            trace!("{direction} left the board unchanged");
            return false;
        }
        self.score += outcome.score;
        self.moves += 1;
        self.board = outcome.board.with_random_tile(&mut self.rng);
        true
    }

    pub fn game_status(&self) -> GameStatus {
        if self.board.highest_tile() >= self.target {
            GameStatus::Won
        } else if self.board.is_stuck() {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }
}

impl<const N: usize> GameSession<N> for SimulatedGame<N> {
    fn read_board(&mut self) -> Result<Board<N>, SessionError> { Ok(self.board.clone()) }

    fn apply_move(&mut self, direction: Move) -> Result<(), SessionError> {
        self.play(direction);
        Ok(())
    }

    fn status(&mut self) -> GameStatus { self.game_status() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Termination, TurnLoop};
    use crate::lookahead::{Lookahead, LookaheadConfig};

    #[test]
    fn starts_with_two_tiles() {
        let game = SimulatedGame::<4>::new(1);
        assert_eq!(game.board().len(), 2);
        assert_eq!(game.score(), 0);
        assert_eq!(game.game_status(), GameStatus::InProgress);
    }

    #[test]
    fn same_seed_same_game() {
        let mut a = SimulatedGame::<4>::new(99);
        let mut b = SimulatedGame::<4>::new(99);
        for dir in [Move::Left, Move::Up, Move::Right, Move::Down, Move::Left] {
            a.play(dir);
            b.play(dir);
        }
        assert_eq!(a.board(), b.board());
        assert_eq!(a.score(), b.score());
    }

    #[test]
    fn noop_move_spawns_nothing() {
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut game = SimulatedGame::from_board(board.clone(), 3, DEFAULT_TARGET);
        assert!(!game.play(Move::Up));
        assert_eq!(game.board(), &board);
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn merges_add_to_score_and_spawn_a_tile() {
        let board = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut game = SimulatedGame::from_board(board, 3, DEFAULT_TARGET);
        assert!(game.play(Move::Left));
        assert_eq!(game.score(), 4);
        assert_eq!(game.board().len(), 2);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn reports_win_and_loss() {
        let won = SimulatedGame::from_board(Board::from_rows([[8, 0], [0, 0]]), 0, 8);
        assert_eq!(won.game_status(), GameStatus::Won);
        let lost = SimulatedGame::from_board(Board::from_rows([[2, 4], [4, 2]]), 0, 8);
        assert_eq!(lost.game_status(), GameStatus::Lost);
    }

    #[test]
    fn small_game_plays_to_completion() {
        for depth in 1..=3 {
            let game = SimulatedGame::<3>::with_target(5, 1 << 20);
            let policy = Lookahead::with_config(LookaheadConfig { depth }).unwrap();
            let mut driver = TurnLoop::new(game, policy);
            let summary = driver.run().unwrap();
            assert!(matches!(summary.termination, Termination::Lost | Termination::NoLegalMove));
            assert!(summary.turns > 0);
            let game = driver.into_session();
            assert!(game.board().is_stuck());
            assert_eq!(game.moves(), summary.turns);
        }
    }
}
