//! Compact 16-bit move encoding.

use crate::{Piece, Square};
use std::fmt;

/// The 4-bit move flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// No special handling.
    Normal = 0,
    /// Pawn captures the pawn beside it, landing on the en-passant square.
    EnPassant = 1,
    /// King moves two squares; the rook on that wing jumps over it.
    Castle = 2,
    /// Pawn double push from its starting rank.
    DoublePush = 3,
    PromoteQueen = 4,
    PromoteKnight = 5,
    PromoteRook = 6,
    PromoteBishop = 7,
}

impl MoveFlag {
    const fn from_bits(bits: u16) -> MoveFlag {
        match bits {
            1 => MoveFlag::EnPassant,
            2 => MoveFlag::Castle,
            3 => MoveFlag::DoublePush,
            4 => MoveFlag::PromoteQueen,
            5 => MoveFlag::PromoteKnight,
            6 => MoveFlag::PromoteRook,
            7 => MoveFlag::PromoteBishop,
            _ => MoveFlag::Normal,
        }
    }

    /// Promotion flag for a piece type, `None` for pawns and kings.
    pub const fn promotion(piece: Piece) -> Option<MoveFlag> {
        match piece {
            Piece::Queen => Some(MoveFlag::PromoteQueen),
            Piece::Knight => Some(MoveFlag::PromoteKnight),
            Piece::Rook => Some(MoveFlag::PromoteRook),
            Piece::Bishop => Some(MoveFlag::PromoteBishop),
            Piece::Pawn | Piece::King => None,
        }
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self {
            MoveFlag::PromoteKnight => Some(Piece::Knight),
            MoveFlag::PromoteBishop => Some(Piece::Bishop),
            MoveFlag::PromoteRook => Some(Piece::Rook),
            MoveFlag::PromoteQueen => Some(Piece::Queen),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        (self as u8) >= MoveFlag::PromoteQueen as u8
    }
}

/// A chess move: 6 bits start square, 6 bits target square, 4 bits flag.
///
/// The all-zero value ([`Move::NULL`]) has the same start and target square,
/// which no real move has.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// Sentinel that never equals a real move.
    pub const NULL: Move = Move(0);

    const START_MASK: u16 = 0b0000_0000_0011_1111;
    const TARGET_MASK: u16 = 0b0000_1111_1100_0000;

    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move((from.index() as u16) | ((to.index() as u16) << 6) | ((flag as u16) << 12))
    }

    /// A move without a flag.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Normal)
    }

    /// Rebuilds a move from its packed value.
    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        Move(value)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn from(self) -> Square {
        // SAFETY: masked to 6 bits
        unsafe { Square::from_index_unchecked((self.0 & Self::START_MASK) as u8) }
    }

    #[inline]
    pub const fn to(self) -> Square {
        // SAFETY: masked to 6 bits
        unsafe { Square::from_index_unchecked(((self.0 & Self::TARGET_MASK) >> 6) as u8) }
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        MoveFlag::from_bits(self.0 >> 12)
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.flag().is_promotion()
    }

    /// Long algebraic (UCI) form, e.g. `e2e4`, `e7e8q`. The null move prints
    /// as `0000`.
    pub fn to_uci(self) -> String {
        if self.is_null() {
            return "0000".to_string();
        }
        match self.flag().promotion_piece() {
            Some(piece) => format!("{}{}{}", self.from(), self.to(), piece.to_char()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}
