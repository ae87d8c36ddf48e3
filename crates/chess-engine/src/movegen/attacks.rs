//! Knight, king and pawn attack tables, computed at compile time.

use crate::Bitboard;
use chess_core::{Color, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const WHITE_PAWN_DELTAS: [(i8, i8); 2] = [(-1, 1), (1, 1)];
const BLACK_PAWN_DELTAS: [(i8, i8); 2] = [(-1, -1), (1, -1)];

static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_DELTAS);
static KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_DELTAS);
static PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&WHITE_PAWN_DELTAS),
    leaper_table(&BLACK_PAWN_DELTAS),
];

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.idx()]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.idx()]
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.idx()]
}

/// For every square, the union of on-board targets reached by the
/// (file, rank) deltas.
const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let (df, dr) = deltas[i];
            let (f, r) = (file + df, rank + dr);
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn knight_counts_by_region() {
        assert_eq!(knight_attacks(sq("d4")).count(), 8);
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(sq("a4")).count(), 4);
        assert_eq!(knight_attacks(sq("b2")).count(), 4);
    }

    #[test]
    fn knight_targets_from_e4() {
        let attacks = knight_attacks(sq("e4"));
        for target in ["d6", "f6", "g5", "g3", "f2", "d2", "c3", "c5"] {
            assert!(attacks.contains(sq(target)), "missing {}", target);
        }
    }

    #[test]
    fn king_counts_by_region() {
        assert_eq!(king_attacks(sq("d4")).count(), 8);
        assert_eq!(king_attacks(Square::A1).count(), 3);
        assert_eq!(king_attacks(sq("a4")).count(), 5);
        assert_eq!(king_attacks(Square::H8).count(), 3);
    }

    #[test]
    fn pawn_attacks_face_forward() {
        let d4 = Square::new(File::D, Rank::R4);
        let white = pawn_attacks(d4, Color::White);
        assert_eq!(white, Bitboard::from_square(sq("c5")) | Bitboard::from_square(sq("e5")));
        let black = pawn_attacks(d4, Color::Black);
        assert_eq!(black, Bitboard::from_square(sq("c3")) | Bitboard::from_square(sq("e3")));
        assert_eq!(pawn_attacks(sq("a4"), Color::White).count(), 1);
        assert!(pawn_attacks(sq("d8"), Color::White).is_empty());
    }

    #[test]
    fn tables_agree_with_set_wise_shifts() {
        for index in 0..64 {
            let square = Square::from_index(index).unwrap();
            let single = Bitboard::from_square(square);
            for color in Color::ALL {
                assert_eq!(pawn_attacks(square, color), single.pawn_attacks(color));
            }
        }
    }
}
