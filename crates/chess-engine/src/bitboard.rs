//! 64-bit square sets.
//!
//! Bit `i` stands for square `i` (a1 = 0, h8 = 63). Occupancy, attack sets,
//! check rays and pin rays are all bitboards.

use chess_core::{Color, Square};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// A set of squares, one bit each.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    pub const FULL: Bitboard = Bitboard(!0);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);
    pub const NOT_FILE_A: Bitboard = Bitboard(!Self::FILE_A.0);
    pub const NOT_FILE_H: Bitboard = Bitboard(!Self::FILE_H.0);

    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const RANK_4: Bitboard = Bitboard(0x0000_0000_FF00_0000);
    pub const RANK_5: Bitboard = Bitboard(0x0000_00FF_0000_0000);
    pub const RANK_8: Bitboard = Bitboard(0xFF00_0000_0000_0000);

    /// Light squares (h1, a8, ...).
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55AA_55AA_55AA_55AA);

    /// Creates a bitboard from a raw u64.
    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    /// Creates a bitboard with a single square set.
    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(1u64 << sq.index())
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Returns the number of set bits (population count).
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if the given square is set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1u64 << sq.index())) != 0
    }

    /// Sets the given square.
    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1u64 << sq.index();
    }

    /// Clears the given square.
    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !(1u64 << sq.index());
    }

    /// Lowest set square, if any.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            // SAFETY: trailing_zeros of a non-zero u64 is below 64
            Some(unsafe { Square::from_index_unchecked(self.0.trailing_zeros() as u8) })
        }
    }

    /// Removes and returns the lowest set square.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// Shifts by a signed square delta: positive towards h8, negative towards a1.
    /// Bits shifted off the board are dropped; file wrap is the caller's concern.
    #[inline]
    pub const fn shift(self, delta: i8) -> Bitboard {
        if delta >= 0 {
            Bitboard(self.0 << delta)
        } else {
            Bitboard(self.0 >> -delta)
        }
    }

    /// Squares attacked by pawns of `color` standing on this set.
    #[inline]
    pub const fn pawn_attacks(self, color: Color) -> Bitboard {
        match color {
            Color::White => Bitboard(self.north_east().0 | self.north_west().0),
            Color::Black => Bitboard(self.south_east().0 | self.south_west().0),
        }
    }

    // One-step shifts; east and west variants mask off the wrapped file.

    #[inline]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    #[inline]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    #[inline]
    pub const fn east(self) -> Bitboard {
        Bitboard((self.0 << 1) & !Self::FILE_A.0)
    }

    #[inline]
    pub const fn west(self) -> Bitboard {
        Bitboard((self.0 >> 1) & !Self::FILE_H.0)
    }

    #[inline]
    pub const fn north_east(self) -> Bitboard {
        Bitboard((self.0 << 9) & !Self::FILE_A.0)
    }

    #[inline]
    pub const fn north_west(self) -> Bitboard {
        Bitboard((self.0 << 7) & !Self::FILE_H.0)
    }

    #[inline]
    pub const fn south_east(self) -> Bitboard {
        Bitboard((self.0 >> 7) & !Self::FILE_A.0)
    }

    #[inline]
    pub const fn south_west(self) -> Bitboard {
        Bitboard((self.0 >> 9) & !Self::FILE_H.0)
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return write!(f, "Bitboard({:#018x})", self.0);
        }
        // `{:#?}` draws the board, rank 8 first.
        for rank in (0..8u8).rev() {
            let row: String = (0..8u8)
                .map(|file| if self.0 >> (rank * 8 + file) & 1 == 1 { 'X' } else { '.' })
                .collect();
            writeln!(f, "{} {}", rank + 1, row)?;
        }
        write!(f, "  abcdefgh")
    }
}

/// Iterator over set squares in a bitboard.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count() as usize;
        (count, Some(count))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn set_and_clear() {
        let mut bb = Bitboard::EMPTY;
        bb.set(sq("e4"));
        bb.set(sq("a1"));
        assert_eq!(bb.count(), 2);
        assert!(bb.contains(sq("e4")));
        bb.clear(sq("e4"));
        bb.clear(sq("a1"));
        assert!(bb.is_empty());
    }

    #[test]
    fn pop_lsb_walks_upwards() {
        let mut bb = Bitboard::new(0b1010);
        assert_eq!(bb.pop_lsb().map(|s| s.index()), Some(1));
        assert_eq!(bb.pop_lsb().map(|s| s.index()), Some(3));
        assert_eq!(bb.pop_lsb(), None);
    }

    #[test]
    fn shifts_do_not_wrap_files() {
        let h4 = Bitboard::from_square(sq("h4"));
        assert!(h4.east().is_empty());
        assert!(h4.north_east().is_empty());
        assert_eq!(h4.west(), Bitboard::from_square(sq("g4")));
        let a4 = Bitboard::from_square(sq("a4"));
        assert!(a4.south_west().is_empty());
        assert_eq!(a4.shift(8), Bitboard::from_square(sq("a5")));
        assert_eq!(a4.shift(-16), Bitboard::from_square(sq("a2")));
    }

    #[test]
    fn set_wise_pawn_attacks() {
        let pawns = Bitboard::from_square(sq("a2")) | Bitboard::from_square(sq("e4"));
        let white = pawns.pawn_attacks(Color::White);
        assert_eq!(white.count(), 3);
        assert!(white.contains(sq("b3")) && white.contains(sq("d5")) && white.contains(sq("f5")));
        let black = pawns.pawn_attacks(Color::Black);
        assert!(black.contains(sq("b1")) && black.contains(sq("d3")) && black.contains(sq("f3")));
    }

    #[test]
    fn light_square_mask() {
        assert!(Bitboard::LIGHT_SQUARES.contains(Square::H1));
        assert!(!Bitboard::LIGHT_SQUARES.contains(Square::A1));
        assert_eq!(Bitboard::LIGHT_SQUARES.count(), 32);
    }

    #[test]
    fn iterates_in_square_order() {
        let squares: Vec<Square> = Bitboard::FILE_A.into_iter().collect();
        assert_eq!(squares.len(), 8);
        assert_eq!(squares[0], Square::A1);
        assert_eq!(squares[7], Square::A8);
    }
}
