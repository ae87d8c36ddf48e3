//! Piece types and the packed (type, color) piece code.

use crate::Color;
use std::fmt;

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// All piece types in order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Returns the index of this piece type (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Piece> {
        match index {
            0 => Some(Piece::Pawn),
            1 => Some(Piece::Knight),
            2 => Some(Piece::Bishop),
            3 => Some(Piece::Rook),
            4 => Some(Piece::Queen),
            5 => Some(Piece::King),
            _ => None,
        }
    }

    /// Lowercase letter used by FEN and UCI promotion suffixes.
    pub const fn to_char(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    /// Parses a piece letter, ignoring case.
    pub const fn from_char(c: char) -> Option<Piece> {
        match c.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A piece type and its color packed into one byte.
///
/// The code is `color * 6 + piece`, so it doubles as a dense index (0-11)
/// into per-piece tables such as bitboards, piece lists and hash keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColoredPiece(u8);

impl ColoredPiece {
    /// Number of distinct codes.
    pub const COUNT: usize = 12;

    #[inline]
    pub const fn new(piece: Piece, color: Color) -> Self {
        ColoredPiece(color as u8 * 6 + piece as u8)
    }

    /// Rebuilds a code from its dense index.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(ColoredPiece(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn piece(self) -> Piece {
        match Piece::from_index((self.0 % 6) as usize) {
            Some(p) => p,
            None => unreachable!(),
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 < 6 {
            Color::White
        } else {
            Color::Black
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub const fn to_fen_char(self) -> char {
        let c = self.piece().to_char();
        match self.color() {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub const fn from_fen_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match Piece::from_char(c) {
            Some(piece) => Some(ColoredPiece::new(piece, color)),
            None => None,
        }
    }
}

impl fmt::Debug for ColoredPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColoredPiece({})", self.to_fen_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_code_round_trips() {
        for color in Color::ALL {
            for piece in Piece::ALL {
                let code = ColoredPiece::new(piece, color);
                assert_eq!(code.piece(), piece);
                assert_eq!(code.color(), color);
                assert_eq!(ColoredPiece::from_index(code.index()), Some(code));
            }
        }
        assert_eq!(ColoredPiece::from_index(12), None);
    }

    #[test]
    fn codes_are_dense() {
        assert_eq!(ColoredPiece::new(Piece::Pawn, Color::White).index(), 0);
        assert_eq!(ColoredPiece::new(Piece::King, Color::White).index(), 5);
        assert_eq!(ColoredPiece::new(Piece::Pawn, Color::Black).index(), 6);
        assert_eq!(ColoredPiece::new(Piece::King, Color::Black).index(), 11);
    }

    #[test]
    fn fen_letters() {
        let white_knight = ColoredPiece::new(Piece::Knight, Color::White);
        assert_eq!(white_knight.to_fen_char(), 'N');
        assert_eq!(ColoredPiece::from_fen_char('q'), Some(ColoredPiece::new(Piece::Queen, Color::Black)));
        assert_eq!(ColoredPiece::from_fen_char('x'), None);
    }
}
