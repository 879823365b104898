//! lookahead-2048: a 2048 move engine + fixed-depth lookahead policy
//!
//! This crate provides:
//! - A sparse, value-typed `Board` with a pure move simulator (`engine::execute`)
//! - A lookahead policy (`lookahead` module) that searches every sequence of the
//!   agent's own moves up to a fixed depth and plays the first move of the best one
//! - A turn-loop driver (`driver` module) that plays against any [`driver::GameSession`]
//! - An in-process game (`simulated` module) to drive it against
//!
//! Quick start:
//! ```
//! use lookahead_2048::engine::{execute, Board, Move};
//! use lookahead_2048::lookahead::select_best_move;
//!
//! let b = Board::from_rows([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
//! let out = execute(&b, Move::Left);
//! assert_eq!(out.score, 4);
//! assert_eq!(out.board, Board::from_rows([[4, 4, 0, 0], [0; 4], [0; 4], [0; 4]]));
//! assert_eq!(select_best_move(&b, 2), Some(Move::Left));
//! ```
//!
//! Full loop (simplest possible)
//! ```
//! use lookahead_2048::driver::{DriverConfig, TurnLoop};
//! use lookahead_2048::lookahead::Lookahead;
//! use lookahead_2048::simulated::SimulatedGame;
//!
//! let game = SimulatedGame::<4>::new(123);
//! let mut driver = TurnLoop::with_config(game, Lookahead::new(), DriverConfig { max_turns: Some(8) });
//! let summary = driver.run().unwrap();
//! assert!(summary.turns > 0);
//! ```
//!
pub mod driver;
pub mod engine;
pub mod logging;
pub mod lookahead;
pub mod simulated;
