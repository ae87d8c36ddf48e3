//! Castling rights as a 4-bit mask.

use crate::Color;
use std::fmt;

/// Castling rights: bit 0 white kingside, bit 1 white queenside, bit 2 black
/// kingside, bit 3 black queenside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;

    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// The raw mask (0-15), also the index of its hash key.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    #[inline]
    pub const fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        self.0 & Self::kingside_flag(color) != 0
    }

    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        self.0 & Self::queenside_flag(color) != 0
    }

    /// Rights with every flag in `flags` cleared.
    #[inline]
    pub const fn without(self, flags: u8) -> Self {
        CastlingRights(self.0 & !flags)
    }

    /// Rights with both flags of `color` cleared.
    #[inline]
    pub const fn without_color(self, color: Color) -> Self {
        self.without(Self::kingside_flag(color) | Self::queenside_flag(color))
    }

    /// Rights with the colours exchanged.
    #[inline]
    pub const fn swapped(self) -> Self {
        CastlingRights(((self.0 & 0b0011) << 2) | ((self.0 & 0b1100) >> 2))
    }

    /// Parses the FEN castling field (`KQkq` subset or `-`).
    pub fn from_fen(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(Self::NONE);
        }
        let mut flags = 0u8;
        for c in field.chars() {
            flags |= match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => return None,
            };
        }
        Some(CastlingRights(flags))
    }
}

impl fmt::Display for CastlingRights {
    /// Writes the FEN castling field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.0 & flag != 0 {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}
