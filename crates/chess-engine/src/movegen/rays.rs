//! Ray directions, distances to the board edge and line masks.

use crate::Bitboard;
use chess_core::Square;

/// The eight ray directions. The first four are orthogonal, the last four
/// diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    South = 1,
    West = 2,
    East = 3,
    NorthWest = 4,
    SouthEast = 5,
    NorthEast = 6,
    SouthWest = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::NorthEast,
        Direction::SouthWest,
    ];

    /// Square-index delta of one step.
    #[inline]
    pub const fn offset(self) -> i8 {
        match self {
            Direction::North => 8,
            Direction::South => -8,
            Direction::West => -1,
            Direction::East => 1,
            Direction::NorthWest => 7,
            Direction::SouthEast => -7,
            Direction::NorthEast => 9,
            Direction::SouthWest => -9,
        }
    }

    /// (file, rank) delta of one step.
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
            Direction::NorthEast => (1, 1),
            Direction::SouthWest => (-1, -1),
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        (self as u8) >= 4
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

static SQUARES_TO_EDGE: [[u8; 8]; 64] = compute_squares_to_edge();
static RAY_MASKS: [[Bitboard; 64]; 8] = compute_ray_masks();

/// Number of steps from `sq` to the board edge in `dir`.
#[inline]
pub fn squares_to_edge(sq: Square, dir: Direction) -> u8 {
    SQUARES_TO_EDGE[sq.idx()][dir.index()]
}

/// Every square strictly beyond `sq` in `dir`, up to the edge.
#[inline]
pub fn ray_mask(sq: Square, dir: Direction) -> Bitboard {
    RAY_MASKS[dir.index()][sq.idx()]
}

const fn compute_squares_to_edge() -> [[u8; 8]; 64] {
    let mut table = [[0u8; 8]; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as u8;
        let rank = (sq / 8) as u8;
        let north = 7 - rank;
        let south = rank;
        let west = file;
        let east = 7 - file;
        table[sq] = [
            north,
            south,
            west,
            east,
            min(north, west),
            min(south, east),
            min(north, east),
            min(south, west),
        ];
        sq += 1;
    }
    table
}

const fn min(a: u8, b: u8) -> u8 {
    if a < b {
        a
    } else {
        b
    }
}

const fn compute_ray_masks() -> [[Bitboard; 64]; 8] {
    let mut table = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = Direction::ALL[dir].delta();
        let mut sq = 0;
        while sq < 64 {
            let mut f = (sq % 8) as i8 + df;
            let mut r = (sq / 8) as i8 + dr;
            let mut bits = 0u64;
            while f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << (r * 8 + f);
                f += df;
                r += dr;
            }
            table[dir][sq] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    table
}

/// Builds the 64x64 alignment table, indexed `a * 64 + b`: the full line
/// (edge to edge) through `a` and `b` when they share a rank, file or
/// diagonal, otherwise empty.
pub(crate) fn build_align_masks() -> Vec<Bitboard> {
    let mut masks = vec![Bitboard::EMPTY; 64 * 64];
    for sq_a in Bitboard::FULL {
        for dir in Direction::ALL {
            let line = ray_mask(sq_a, dir) | ray_mask(sq_a, opposite(dir)) | Bitboard::from_square(sq_a);
            for b in ray_mask(sq_a, dir) {
                masks[sq_a.idx() * 64 + b.idx()] = line;
            }
        }
    }
    masks
}

const fn opposite(dir: Direction) -> Direction {
    match dir {
        Direction::North => Direction::South,
        Direction::South => Direction::North,
        Direction::West => Direction::East,
        Direction::East => Direction::West,
        Direction::NorthWest => Direction::SouthEast,
        Direction::SouthEast => Direction::NorthWest,
        Direction::NorthEast => Direction::SouthWest,
        Direction::SouthWest => Direction::NorthEast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn edge_distances() {
        assert_eq!(squares_to_edge(Square::A1, Direction::North), 7);
        assert_eq!(squares_to_edge(Square::A1, Direction::SouthWest), 0);
        assert_eq!(squares_to_edge(sq("c6"), Direction::NorthEast), 2);
        assert_eq!(squares_to_edge(sq("c6"), Direction::SouthEast), 5);
    }

    #[test]
    fn rays_stop_at_the_edge() {
        assert_eq!(ray_mask(Square::A1, Direction::NorthEast).count(), 7);
        assert!(ray_mask(Square::A1, Direction::NorthEast).contains(Square::H8));
        assert!(ray_mask(sq("d4"), Direction::West).contains(Square::from_algebraic("a4").unwrap()));
        assert!(!ray_mask(sq("d4"), Direction::West).contains(sq("d4")));
        assert!(ray_mask(Square::H1, Direction::East).is_empty());
    }

    #[test]
    fn offsets_match_deltas() {
        for dir in Direction::ALL {
            let (df, dr) = dir.delta();
            assert_eq!(dir.offset(), dr * 8 + df);
            assert_eq!(dir.is_diagonal(), df != 0 && dr != 0);
        }
    }

    #[test]
    fn align_masks_cover_shared_lines_only() {
        let masks = build_align_masks();
        let at = |a: &str, b: &str| masks[sq(a).idx() * 64 + sq(b).idx()];

        let diagonal = at("c3", "e5");
        assert!(diagonal.contains(Square::A1) && diagonal.contains(Square::H8));
        assert_eq!(diagonal.count(), 8);
        assert_eq!(at("e5", "c3"), diagonal);

        let file = at("e1", "e8");
        assert_eq!(file.count(), 8);
        assert!(at("a1", "b3").is_empty());
        assert!(at("d4", "d4").is_empty());
    }
}
