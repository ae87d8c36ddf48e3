//! Bitboard chess engine core.
//!
//! This crate provides:
//! - [`Position`] - the board with in-place make/undo, Zobrist hashing and
//!   repetition tracking
//! - [`MoveGenerator`] - strictly legal move generation using magic bitboards
//!   and precomputed check and pin masks
//! - [`EngineTables`] - the immutable lookup tables every position shares
//! - [`rules`] - checkmate, stalemate and draw detection
//! - [`san`] and [`uci`] move notation
//! - [`Game`] and the [`Bot`] boundary for playing whole games
//! - [`perft`] for validating the move generator
//!
//! # Example
//!
//! ```
//! use chess_engine::{perft, Game, Position};
//!
//! let mut position = Position::startpos();
//! assert_eq!(position.legal_moves(false).len(), 20);
//! assert_eq!(perft(&mut position, 2), 400);
//!
//! let mut game = Game::new();
//! game.make_move_san("e4").unwrap();
//! game.make_move_san("e5").unwrap();
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod bitboard;
mod bot;
mod game;
pub mod movegen;
mod position;
pub mod rules;
pub mod san;
mod tables;
pub mod uci;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use bot::{Bot, Timer};
pub use game::{Game, GameError, GameMove};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{AttackData, MoveGenConfig, MoveGenerator, MoveList, PromotionMode};
pub use position::{EnPassantField, GameState, PieceList, Position, RepetitionHistory};
pub use rules::{game_result, DrawReason, GameResult};
pub use san::{move_to_san, san_to_move, SanError};
pub use tables::EngineTables;
pub use uci::UciError;
pub use zobrist::ZobristKeys;

pub use chess_core;
