//! Magic bitboard tables for sliding piece attacks.
//!
//! For every square a movement mask (the slider's rays without their final
//! edge square) selects the relevant blockers, and
//! `((occupied & mask) * magic) >> shift` indexes a dense attack table that
//! was filled by ray casting every blocker subset once.

use super::rays::{squares_to_edge, Direction};
use crate::Bitboard;
use chess_core::Square;

const ORTHOGONAL: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

const DIAGONAL: [Direction; 4] = [
    Direction::NorthWest,
    Direction::SouthEast,
    Direction::NorthEast,
    Direction::SouthWest,
];

/// The two sliding move patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    fn directions(self) -> &'static [Direction; 4] {
        match self {
            Slider::Rook => &ORTHOGONAL,
            Slider::Bishop => &DIAGONAL,
        }
    }

    fn magics(self) -> &'static [u64; 64] {
        match self {
            Slider::Rook => &ROOK_MAGICS,
            Slider::Bishop => &BISHOP_MAGICS,
        }
    }
}

/// Magic entry for a single square.
#[derive(Debug, Clone, Copy)]
pub struct Magic {
    /// Relevant blocker squares (rays without their edge square).
    pub mask: Bitboard,
    pub magic: u64,
    /// 64 minus the number of mask bits.
    pub shift: u8,
    /// Start of this square's slice in the shared attack table.
    pub offset: usize,
}

impl Magic {
    #[inline]
    fn index(&self, occupied: Bitboard) -> usize {
        self.offset + ((occupied & self.mask).0.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// Rook and bishop magic tables. Built once, read-only afterwards.
pub struct MagicTables {
    rook: [Magic; 64],
    bishop: [Magic; 64],
    attacks: Vec<Bitboard>,
}

impl MagicTables {
    /// Builds both tables.
    ///
    /// # Panics
    /// Panics if a multiplier sends two blocker subsets with different
    /// attack sets to the same slot.
    pub fn new() -> Self {
        let mut attacks = Vec::new();
        let rook = build_slider(Slider::Rook, &mut attacks);
        let bishop = build_slider(Slider::Bishop, &mut attacks);
        attacks.shrink_to_fit();
        MagicTables {
            rook,
            bishop,
            attacks,
        }
    }

    #[inline]
    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.attacks[self.rook[sq.idx()].index(occupied)]
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.attacks[self.bishop[sq.idx()].index(occupied)]
    }

    #[inline]
    pub fn queen_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook_attacks(sq, occupied) | self.bishop_attacks(sq, occupied)
    }

    #[inline]
    pub fn slider_attacks(&self, slider: Slider, sq: Square, occupied: Bitboard) -> Bitboard {
        match slider {
            Slider::Rook => self.rook_attacks(sq, occupied),
            Slider::Bishop => self.bishop_attacks(sq, occupied),
        }
    }

    pub fn magic(&self, slider: Slider, sq: Square) -> &Magic {
        match slider {
            Slider::Rook => &self.rook[sq.idx()],
            Slider::Bishop => &self.bishop[sq.idx()],
        }
    }

    /// Number of attack entries across both tables.
    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }
}

impl Default for MagicTables {
    fn default() -> Self {
        Self::new()
    }
}

fn build_slider(slider: Slider, attacks: &mut Vec<Bitboard>) -> [Magic; 64] {
    let magics = slider.magics();
    let mut entries = [Magic {
        mask: Bitboard::EMPTY,
        magic: 0,
        shift: 0,
        offset: 0,
    }; 64];

    for sq in Bitboard::FULL {
        let mask = movement_mask(slider, sq);
        let bits = mask.count() as u8;
        let entry = Magic {
            mask,
            magic: magics[sq.idx()],
            shift: 64 - bits,
            offset: attacks.len(),
        };
        attacks.resize(entry.offset + (1usize << bits), Bitboard::EMPTY);

        for blockers in blocker_subsets(mask) {
            let reachable = slider_attacks_slow(slider, sq, blockers);
            let slot = &mut attacks[entry.index(blockers)];
            // A slider always reaches at least one square, so an empty slot is unused.
            assert!(
                slot.is_empty() || *slot == reachable,
                "{:?} magic for {} collides",
                slider,
                sq
            );
            *slot = reachable;
        }
        entries[sq.idx()] = entry;
    }
    entries
}

/// Squares along the slider's rays from `sq`, without the final edge square
/// of each ray.
pub fn movement_mask(slider: Slider, sq: Square) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    for &dir in slider.directions() {
        let steps = squares_to_edge(sq, dir) as i8;
        for step in 1..steps {
            mask.set(sq.offset(dir.offset() * step));
        }
    }
    mask
}

/// All 2^n subsets of `mask`, built by mapping each bit pattern of `n` bits
/// onto the mask's squares.
pub fn blocker_subsets(mask: Bitboard) -> Vec<Bitboard> {
    let squares: Vec<Square> = mask.into_iter().collect();
    let count = 1usize << squares.len();
    let mut subsets = Vec::with_capacity(count);
    for pattern in 0..count {
        let mut blockers = Bitboard::EMPTY;
        for (bit, &sq) in squares.iter().enumerate() {
            if pattern & (1 << bit) != 0 {
                blockers.set(sq);
            }
        }
        subsets.push(blockers);
    }
    subsets
}

/// Reference ray cast: walks each ray until (and including) the first blocker.
pub fn slider_attacks_slow(slider: Slider, sq: Square, blockers: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &dir in slider.directions() {
        let mut current = sq;
        for _ in 0..squares_to_edge(sq, dir) {
            current = current.offset(dir.offset());
            attacks.set(current);
            if blockers.contains(current) {
                break;
            }
        }
    }
    attacks
}

// Multipliers for a shift of 64 - popcount(mask). Each one maps every blocker
// subset of its square's mask to a slot without destructive collisions.
const BISHOP_MAGICS: [u64; 64] = [
    0x89a1121896040240,
    0x2004844802002010,
    0x2068080051921000,
    0x62880a0220200808,
    0x0004042004000000,
    0x0100822020200011,
    0xc00444222012000a,
    0x0028808801216001,
    0x0400492088408100,
    0x0201c401040c0084,
    0x00840800910a0010,
    0x0000082080240060,
    0x2000840504006000,
    0x30010c4108405004,
    0x1008005410080802,
    0x8144042209100900,
    0x0208081020014400,
    0x004800201208ca00,
    0x0f18140408012008,
    0x1004002802102001,
    0x0841000820080811,
    0x0040200200a42008,
    0x0000800054042000,
    0x88010400410c9000,
    0x0520040470104290,
    0x1004040051500081,
    0x2002081833080021,
    0x000400c00c010142,
    0x941408200c002000,
    0x0658810000806011,
    0x0188071040440a00,
    0x4800404002011c00,
    0x0104442040404200,
    0x4103a81801200248,
    0x0004022401120400,
    0x80c0040400080120,
    0x8040010040820802,
    0x0480810700020090,
    0x0102008e00040242,
    0x0809005202050100,
    0x8002024220104080,
    0x0431008804142000,
    0x0019001802081400,
    0x0200014208040080,
    0x3308082008200100,
    0x041010500040c020,
    0x4012020c04210308,
    0x208220a202004080,
    0x0111040120082000,
    0x6803040141280a00,
    0x2101004202410000,
    0x8200000041108022,
    0x0000021082088000,
    0x0002410204010040,
    0x0040100400809000,
    0x0822088220820214,
    0x0040808090012004,
    0x00910224040218c9,
    0x0402814422015008,
    0x0090014004842410,
    0x0001000042304105,
    0x0010008830412a00,
    0x2520081090008908,
    0x40102000a0a60140,
];

const ROOK_MAGICS: [u64; 64] = [
    0x0a8002c000108020,
    0x06c00049b0002001,
    0x0100200010090040,
    0x2480041000800801,
    0x0280028004000800,
    0x0900410008040022,
    0x0280020001001080,
    0x2880002041000080,
    0xa000800080400034,
    0x0004808020004000,
    0x2290802004801000,
    0x0411000d00100020,
    0x0402800800040080,
    0x000b000401004208,
    0x2409000100040200,
    0x0001002100004082,
    0x0022878001e24000,
    0x1090810021004010,
    0x0801030040200012,
    0x0500808008001000,
    0x0a08018014000880,
    0x8000808004000200,
    0x0201008080010200,
    0x0801020000441091,
    0x0000800080204005,
    0x1040200040100048,
    0x0000120200402082,
    0x0d14880480100080,
    0x0012040280080080,
    0x0100040080020080,
    0x9020010080800200,
    0x0813241200148449,
    0x0491604001800080,
    0x0100401000402001,
    0x4820010021001040,
    0x0400402202000812,
    0x0209009005000802,
    0x0810800601800400,
    0x4301083214000150,
    0x204026458e001401,
    0x0040204000808000,
    0x8001008040010020,
    0x8410820820420010,
    0x1003001000090020,
    0x0804040008008080,
    0x0012000810020004,
    0x1000100200040208,
    0x430000a044020001,
    0x0280009023410300,
    0x00e0100040002240,
    0x0000200100401700,
    0x2244100408008080,
    0x0008000400801980,
    0x0002000810040200,
    0x8010100228810400,
    0x2000009044210200,
    0x4080008040102101,
    0x0040002080411d01,
    0x2005524060000901,
    0x0502001008400422,
    0x489a000810200402,
    0x0001004400080a13,
    0x4000011008020084,
    0x0026002114058042,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn bb(squares: &[&str]) -> Bitboard {
        squares.iter().fold(Bitboard::EMPTY, |acc, s| acc | Bitboard::from_square(sq(s)))
    }

    #[test]
    fn mask_sizes_match_the_multipliers() {
        assert_eq!(movement_mask(Slider::Rook, Square::A1).count(), 12);
        assert_eq!(movement_mask(Slider::Rook, sq("d4")).count(), 10);
        assert_eq!(movement_mask(Slider::Bishop, Square::A1).count(), 6);
        assert_eq!(movement_mask(Slider::Bishop, sq("d4")).count(), 9);
        assert!(!movement_mask(Slider::Rook, sq("d4")).contains(sq("d8")));
    }

    #[test]
    fn subsets_are_exhaustive() {
        let mask = bb(&["b2", "c3", "d4"]);
        let subsets = blocker_subsets(mask);
        assert_eq!(subsets.len(), 8);
        assert!(subsets.contains(&Bitboard::EMPTY));
        assert!(subsets.contains(&mask));
        assert!(subsets.iter().all(|s| (*s & !mask).is_empty()));
    }

    #[test]
    fn empty_board_counts() {
        let tables = MagicTables::new();
        assert_eq!(tables.bishop_attacks(sq("d4"), Bitboard::EMPTY).count(), 13);
        assert_eq!(tables.rook_attacks(sq("d4"), Bitboard::EMPTY).count(), 14);
        assert_eq!(tables.queen_attacks(sq("d4"), Bitboard::EMPTY).count(), 27);
        assert_eq!(tables.bishop_attacks(Square::A1, Bitboard::EMPTY).count(), 7);
        assert_eq!(tables.rook_attacks(Square::A1, Bitboard::EMPTY).count(), 14);
    }

    #[test]
    fn blockers_are_included_and_stop_the_ray() {
        let tables = MagicTables::new();
        let attacks = tables.bishop_attacks(sq("d4"), bb(&["e5", "c3"]));
        assert!(attacks.contains(sq("e5")) && attacks.contains(sq("c3")));
        assert!(!attacks.contains(sq("f6")) && !attacks.contains(sq("b2")));

        let attacks = tables.rook_attacks(sq("d4"), bb(&["d6", "h4"]));
        assert!(attacks.contains(sq("d6")) && attacks.contains(sq("h4")));
        assert!(!attacks.contains(sq("d7")));
    }

    #[test]
    fn every_subset_of_every_mask_hits_its_own_attack_set() {
        let tables = MagicTables::new();
        for slider in [Slider::Rook, Slider::Bishop] {
            for square in Bitboard::FULL {
                let mask = tables.magic(slider, square).mask;
                for blockers in blocker_subsets(mask) {
                    assert_eq!(
                        tables.slider_attacks(slider, square, blockers),
                        slider_attacks_slow(slider, square, blockers),
                        "{:?} on {} with blockers {:#x}",
                        slider,
                        square,
                        blockers.0
                    );
                }
            }
        }
    }

    #[test]
    fn bishop_on_b5_has_a_dense_table() {
        let tables = MagicTables::new();
        let b5 = sq("b5");
        let magic = tables.magic(Slider::Bishop, b5);
        assert_eq!(magic.shift, 59);
        let mut seen = std::collections::HashMap::new();
        for blockers in blocker_subsets(magic.mask) {
            let reachable = slider_attacks_slow(Slider::Bishop, b5, blockers);
            let slot = magic.index(blockers) - magic.offset;
            assert_eq!(*seen.entry(slot).or_insert(reachable), reachable);
        }
        assert_eq!(
            tables.bishop_attacks(b5, bb(&["d7", "c4"])),
            bb(&["a6", "c6", "d7", "a4", "c4"])
        );
    }

    #[test]
    fn bits_outside_the_mask_are_ignored() {
        let tables = MagicTables::new();
        let edge_noise = Bitboard::RANK_8 | Bitboard::FILE_H;
        assert_eq!(
            tables.rook_attacks(sq("d4"), edge_noise),
            tables.rook_attacks(sq("d4"), Bitboard::EMPTY)
        );
    }
}
