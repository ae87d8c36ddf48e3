//! Files, ranks and squares (a1 = 0 ... h8 = 63).

use std::fmt;

/// A board column, `a` through `h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

/// A board row, `1` through `8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rank {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Accepts either case.
    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        c.is_ascii_lowercase()
            .then(|| c as u8 - b'a')
            .and_then(Self::from_index)
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.is_ascii_digit()
            .then(|| (c as u8).wrapping_sub(b'1'))
            .and_then(Self::from_index)
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A board square as its index, `rank * 8 + file`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank as u8 * 8 + file as u8)
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// # Safety
    /// `index` must be below 64.
    #[inline]
    pub const unsafe fn from_index_unchecked(index: u8) -> Self {
        debug_assert!(index < 64);
        Square(index)
    }

    /// Parses `e4`-style coordinates.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        chars.next().is_none().then(|| Square::new(file, rank))
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn idx(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn file(self) -> File {
        File::ALL[usize::from(self.0 & 7)]
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::ALL[usize::from(self.0 >> 3)]
    }

    /// Moves by a raw index delta; the result must stay on the board.
    #[inline]
    pub const fn offset(self, delta: i8) -> Square {
        let index = self.0 as i8 + delta;
        debug_assert!(index >= 0 && index < 64);
        Square(index as u8)
    }

    /// a1 <-> a8.
    #[inline]
    pub const fn flip_rank(self) -> Square {
        Square(self.0 ^ 56)
    }

    pub fn to_algebraic(self) -> String {
        self.to_string()
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_splits_into_file_and_rank() {
        let e4 = Square::new(File::E, Rank::R4);
        assert_eq!(e4.index(), 28);
        assert_eq!(e4.file(), File::E);
        assert_eq!(e4.rank(), Rank::R4);
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn algebraic_parsing() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::A1));
        assert_eq!(Square::from_algebraic("H8"), Some(Square::H8));
        for bad in ["i1", "a9", "a0", "e", "e44", ""] {
            assert_eq!(Square::from_algebraic(bad), None, "{bad}");
        }
        assert_eq!(Square::G1.to_algebraic(), "g1");
    }

    #[test]
    fn char_conversions_cover_the_board() {
        for file in File::ALL {
            assert_eq!(File::from_char(file.to_char()), Some(file));
        }
        for rank in Rank::ALL {
            assert_eq!(Rank::from_char(rank.to_char()), Some(rank));
        }
        assert_eq!(File::from_char('x'), None);
        assert_eq!(Rank::from_char('9'), None);
        assert_eq!(Rank::from_char('0'), None);
    }

    #[test]
    fn offsets_and_mirroring() {
        assert_eq!(Square::E1.offset(8).to_algebraic(), "e2");
        assert_eq!(Square::E8.offset(-9).to_algebraic(), "d7");
        assert_eq!(Square::C1.flip_rank(), Square::C8);
        assert_eq!(Square::H8.flip_rank(), Square::H1);
    }
}
