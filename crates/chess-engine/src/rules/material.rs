//! Insufficient-material detection.

use crate::{Bitboard, Position};
use chess_core::{Color, Piece};

/// True when neither side can force mate with the material left.
///
/// Recognises bare kings, a single minor piece, and bishops that all
/// stand on one square colour with no knights. Other minor-piece endings
/// are treated as playable.
pub fn has_insufficient_material(position: &Position) -> bool {
    let mut knights = Bitboard::EMPTY;
    let mut bishops = Bitboard::EMPTY;
    for color in Color::ALL {
        let heavy = position.pieces(Piece::Pawn, color)
            | position.pieces(Piece::Rook, color)
            | position.pieces(Piece::Queen, color);
        if heavy.is_not_empty() {
            return false;
        }
        knights |= position.pieces(Piece::Knight, color);
        bishops |= position.pieces(Piece::Bishop, color);
    }

    let minors = knights.count() + bishops.count();
    if minors <= 1 {
        return true;
    }
    if knights.is_not_empty() || bishops.count() != 2 {
        return false;
    }
    let light = (bishops & Bitboard::LIGHT_SQUARES).count();
    light == 0 || light == bishops.count()
}
