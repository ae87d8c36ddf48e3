//! Zobrist keys for incremental position hashing.
//!
//! A position's key is the XOR of:
//! - one key per (piece, color, square) for every occupied square,
//! - one key for the castling-rights mask (16 keys, one per mask value),
//! - one key for the en-passant file (index 0 means none and is zero),
//! - one key when Black is to move.

use chess_core::{CastlingRights, ColoredPiece, Square};

/// Default generator seed; keys are identical across runs.
pub const DEFAULT_SEED: u64 = 29_426_028;

/// Zobrist hash keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristKeys {
    /// Keys indexed by [`ColoredPiece::index`] then square.
    pub pieces: [[u64; 64]; ColoredPiece::COUNT],
    /// Keys indexed by the raw castling mask.
    pub castling: [u64; 16],
    /// Keys indexed by en-passant file + 1; entry 0 is zero.
    pub en_passant: [u64; 9],
    pub black_to_move: u64,
}

impl ZobristKeys {
    /// Generates keys from `seed` with a xorshift64* sequence.
    pub const fn with_seed(seed: u64) -> Self {
        // xorshift needs a non-zero state
        let mut state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        let mut pieces = [[0u64; 64]; ColoredPiece::COUNT];
        let mut castling = [0u64; 16];
        let mut en_passant = [0u64; 9];

        let mut piece = 0;
        while piece < ColoredPiece::COUNT {
            let mut square = 0;
            while square < 64 {
                let (next, value) = next_random(state);
                state = next;
                pieces[piece][square] = value;
                square += 1;
            }
            piece += 1;
        }

        let mut i = 0;
        while i < 16 {
            let (next, value) = next_random(state);
            state = next;
            castling[i] = value;
            i += 1;
        }

        let mut file = 1;
        while file < 9 {
            let (next, value) = next_random(state);
            state = next;
            en_passant[file] = value;
            file += 1;
        }

        let (_, black_to_move) = next_random(state);

        ZobristKeys {
            pieces,
            castling,
            en_passant,
            black_to_move,
        }
    }

    #[inline]
    pub fn piece(&self, piece: ColoredPiece, square: Square) -> u64 {
        self.pieces[piece.index()][square.idx()]
    }

    #[inline]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.index()]
    }

    /// Key for an en-passant file stored as file + 1 (0 = none).
    #[inline]
    pub fn en_passant(&self, file_plus_one: u8) -> u64 {
        self.en_passant[file_plus_one as usize]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

const fn next_random(state: u64) -> (u64, u64) {
    let mut x = state;
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    (x, x.wrapping_mul(0x2545_F491_4F6C_DD1D))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Color, Piece};
    use std::collections::HashSet;

    #[test]
    fn same_seed_same_keys() {
        assert_eq!(ZobristKeys::with_seed(7), ZobristKeys::with_seed(7));
        assert_ne!(ZobristKeys::with_seed(7), ZobristKeys::with_seed(8));
        assert_eq!(ZobristKeys::default(), ZobristKeys::with_seed(DEFAULT_SEED));
    }

    #[test]
    fn no_en_passant_is_neutral() {
        let keys = ZobristKeys::default();
        assert_eq!(keys.en_passant(0), 0);
        assert!(keys.en_passant[1..].iter().all(|&k| k != 0));
    }

    #[test]
    fn keys_are_distinct() {
        let keys = ZobristKeys::default();
        let mut seen = HashSet::new();
        for table in keys.pieces.iter() {
            for &k in table.iter() {
                assert!(seen.insert(k));
            }
        }
        for &k in keys.castling.iter().chain(keys.en_passant[1..].iter()) {
            assert!(seen.insert(k));
        }
        assert!(seen.insert(keys.black_to_move));
    }

    #[test]
    fn lookup_helpers_index_the_tables() {
        let keys = ZobristKeys::default();
        let knight = ColoredPiece::new(Piece::Knight, Color::Black);
        assert_eq!(keys.piece(knight, Square::G8), keys.pieces[knight.index()][62]);
        assert_eq!(keys.castling(CastlingRights::ALL), keys.castling[15]);
    }
}
