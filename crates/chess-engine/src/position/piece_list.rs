//! Dense per-piece square lists with O(1) add, remove and move.

use chess_core::Square;

/// The squares holding one kind of piece, in no particular order.
///
/// `slots` maps a square back to its index in `squares`, so removal swaps
/// the last entry into the hole instead of shifting.
#[derive(Clone)]
pub struct PieceList {
    squares: [Square; PieceList::CAPACITY],
    slots: [u8; 64],
    len: usize,
}

impl PieceList {
    /// One side never has more than 16 pieces.
    pub const CAPACITY: usize = 16;

    pub const fn new() -> Self {
        PieceList {
            squares: [Square::A1; Self::CAPACITY],
            slots: [0; 64],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Square] {
        &self.squares[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Square> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn add(&mut self, sq: Square) {
        debug_assert!(self.len < Self::CAPACITY, "piece list overflow");
        self.squares[self.len] = sq;
        self.slots[sq.idx()] = self.len as u8;
        self.len += 1;
    }

    /// Removes `sq`, which must be in the list.
    #[inline]
    pub fn remove(&mut self, sq: Square) {
        let slot = self.slots[sq.idx()] as usize;
        debug_assert!(slot < self.len && self.squares[slot] == sq, "{} not in piece list", sq);
        self.len -= 1;
        let last = self.squares[self.len];
        self.squares[slot] = last;
        self.slots[last.idx()] = slot as u8;
    }

    /// Moves the entry at `from` to `to`, keeping its slot.
    #[inline]
    pub fn relocate(&mut self, from: Square, to: Square) {
        let slot = self.slots[from.idx()] as usize;
        debug_assert!(slot < self.len && self.squares[slot] == from, "{} not in piece list", from);
        self.squares[slot] = to;
        self.slots[to.idx()] = slot as u8;
    }
}

impl Default for PieceList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PieceList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a PieceList {
    type Item = &'a Square;
    type IntoIter = std::slice::Iter<'a, Square>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn sorted(list: &PieceList) -> Vec<Square> {
        let mut squares = list.as_slice().to_vec();
        squares.sort();
        squares
    }

    #[test]
    fn add_remove_swaps_last_into_hole() {
        let mut list = PieceList::new();
        for s in ["a2", "b2", "c2", "d2"] {
            list.add(sq(s));
        }
        list.remove(sq("a2"));
        assert_eq!(list.len(), 3);
        assert_eq!(list.as_slice()[0], sq("d2"));
        list.remove(sq("d2"));
        assert_eq!(sorted(&list), vec![sq("b2"), sq("c2")]);
    }

    #[test]
    fn relocate_keeps_membership_consistent() {
        let mut list = PieceList::new();
        list.add(sq("g1"));
        list.add(sq("b1"));
        list.relocate(sq("g1"), sq("f3"));
        list.remove(sq("f3"));
        assert_eq!(list.as_slice(), &[sq("b1")]);
        list.relocate(sq("b1"), sq("c3"));
        list.remove(sq("c3"));
        assert!(list.is_empty());
    }
}
