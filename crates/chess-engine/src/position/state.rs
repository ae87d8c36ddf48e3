//! Irreversible per-ply state saved on the history stack.

use chess_core::{CastlingRights, Piece};

/// Snapshot of what a move cannot be reconstructed from.
///
/// A new one is pushed by every make and popped by the matching undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    /// Piece type removed by the move that produced this state.
    pub captured: Option<Piece>,
    /// En-passant file + 1, or 0 when no double push just happened.
    pub en_passant_file: u8,
    pub castling: CastlingRights,
    /// Half-moves since the last pawn move or capture.
    pub fifty_move_counter: u32,
    pub zobrist_key: u64,
}

impl GameState {
    /// The en-passant file index (0-7), if any.
    #[inline]
    pub fn en_passant_file_index(&self) -> Option<u8> {
        self.en_passant_file.checked_sub(1)
    }
}
