//! Core types for chess.
//!
//! This crate provides the fundamental types used across the engine:
//! - [`Piece`], [`Color`] and the packed [`ColoredPiece`] code
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for the 16-bit move encoding
//! - [`CastlingRights`] as a 4-bit mask
//! - FEN parsing and serialization via [`Fen`]

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use color::Color;
pub use fen::{en_passant_square, Fen, FenError};
pub use mov::{Move, MoveFlag};
pub use piece::{ColoredPiece, Piece};
pub use square::{File, Rank, Square};
