//! Move generation.
//!
//! Generates strictly legal moves in one pass: the check, pin and attack
//! masks in [`AttackData`] are computed first and every piece generator
//! intersects its destinations with them, so no move is made and tested.

mod attack_data;
pub(crate) mod attacks;
pub(crate) mod magics;
pub mod perft;
pub(crate) mod rays;

use crate::tables::EngineTables;
use crate::{Bitboard, Position};
use chess_core::{en_passant_square, Color, Move, MoveFlag, Piece, Square};

pub use attack_data::AttackData;
pub use attacks::{king_attacks, knight_attacks, pawn_attacks};
pub use magics::{slider_attacks_slow, MagicTables, Slider};
pub use rays::Direction;

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of legal moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Which under-promotions quiet generation produces.
///
/// Capture-only generation always emits queen promotions alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromotionMode {
    #[default]
    All,
    QueenOnly,
    QueenAndKnight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveGenConfig {
    pub promotions: PromotionMode,
}

/// Legal move generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator {
    config: MoveGenConfig,
}

impl MoveGenerator {
    pub const fn new(config: MoveGenConfig) -> Self {
        MoveGenerator { config }
    }

    pub fn config(&self) -> MoveGenConfig {
        self.config
    }

    /// Legal moves for the side to move. With `captures_only`, destinations
    /// are restricted to enemy pieces, plus queen push-promotions.
    pub fn generate(&self, pos: &Position, captures_only: bool) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_into(pos, captures_only, &mut moves);
        moves
    }

    /// Like [`MoveGenerator::generate`], reusing `moves`. Returns the masks
    /// the moves were derived from.
    pub fn generate_into(
        &self,
        pos: &Position,
        captures_only: bool,
        moves: &mut MoveList,
    ) -> AttackData {
        moves.clear();
        let data = AttackData::compute(pos);
        pos.cache_in_check(data.in_check);

        let mut gen = Generator::new(pos, &data, !captures_only, self.config.promotions, moves);
        gen.king_moves();
        if !data.in_double_check {
            gen.slider_moves();
            gen.knight_moves();
            gen.pawn_moves();
        }
        data
    }
}

/// Per-call state shared by the piece generators.
struct Generator<'a> {
    pos: &'a Position,
    tables: &'a EngineTables,
    data: &'a AttackData,
    us: Color,
    them: Color,
    king: Square,
    enemy: Bitboard,
    occupied: Bitboard,
    empty: Bitboard,
    empty_or_enemy: Bitboard,
    /// Every square in quiet mode, enemy pieces only in capture mode.
    move_type_mask: Bitboard,
    quiet: bool,
    promotions: PromotionMode,
    moves: &'a mut MoveList,
}

impl<'a> Generator<'a> {
    fn new(
        pos: &'a Position,
        data: &'a AttackData,
        quiet: bool,
        promotions: PromotionMode,
        moves: &'a mut MoveList,
    ) -> Self {
        let us = pos.side_to_move();
        let them = us.opposite();
        let enemy = pos.colour_bitboard(them);
        let occupied = pos.all_pieces();
        let empty = !occupied;
        Generator {
            pos,
            tables: pos.tables(),
            data,
            us,
            them,
            king: pos.king_square(us),
            enemy,
            occupied,
            empty,
            empty_or_enemy: empty | enemy,
            move_type_mask: if quiet { Bitboard::FULL } else { enemy },
            quiet,
            promotions,
            moves,
        }
    }

    #[inline]
    fn is_pinned(&self, sq: Square) -> bool {
        self.data.is_pinned(sq)
    }

    /// A pinned piece may only move along the line through the king.
    #[inline]
    fn keeps_alignment(&self, from: Square, to: Square) -> bool {
        !self.is_pinned(from) || self.tables.align(from, self.king) == self.tables.align(to, self.king)
    }

    fn king_moves(&mut self) {
        let friendly = self.pos.colour_bitboard(self.us);
        let targets = king_attacks(self.king)
            & !(self.data.opponent_attacks | friendly)
            & self.move_type_mask;
        for to in targets {
            self.moves.push(Move::normal(self.king, to));
        }

        if !self.quiet || self.data.in_check {
            return;
        }
        let home = match self.us {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        };
        if self.king != home {
            return;
        }

        let rights = self.pos.castling_rights();
        let rooks = self.pos.pieces(Piece::Rook, self.us);
        let attacked = self.data.opponent_attacks;

        if rights.can_castle_kingside(self.us) && rooks.contains(home.offset(3)) {
            let path = Bitboard::from_square(home.offset(1)) | Bitboard::from_square(home.offset(2));
            if (path & (attacked | self.occupied)).is_empty() {
                self.moves
                    .push(Move::new(home, home.offset(2), MoveFlag::Castle));
            }
        }

        if rights.can_castle_queenside(self.us) && rooks.contains(home.offset(-4)) {
            let path = Bitboard::from_square(home.offset(-1)) | Bitboard::from_square(home.offset(-2));
            let between = path | Bitboard::from_square(home.offset(-3));
            if (path & attacked).is_empty() && (between & self.occupied).is_empty() {
                self.moves
                    .push(Move::new(home, home.offset(-2), MoveFlag::Castle));
            }
        }
    }

    fn slider_moves(&mut self) {
        let move_mask = self.empty_or_enemy & self.data.check_ray & self.move_type_mask;
        let mut orthogonal = self.pos.orthogonal_sliders(self.us);
        let mut diagonal = self.pos.diagonal_sliders(self.us);

        // A pinned piece cannot both stay on its pin and resolve a check.
        if self.data.in_check {
            orthogonal &= !self.data.pin_rays;
            diagonal &= !self.data.pin_rays;
        }

        for from in orthogonal {
            let targets = self.tables.rook_attacks(from, self.occupied) & move_mask;
            self.push_slider(from, targets);
        }
        for from in diagonal {
            let targets = self.tables.bishop_attacks(from, self.occupied) & move_mask;
            self.push_slider(from, targets);
        }
    }

    fn push_slider(&mut self, from: Square, mut targets: Bitboard) {
        if self.is_pinned(from) {
            targets &= self.tables.align(from, self.king);
        }
        for to in targets {
            self.moves.push(Move::normal(from, to));
        }
    }

    fn knight_moves(&mut self) {
        let knights = self.pos.pieces(Piece::Knight, self.us) & !self.data.pin_rays;
        let move_mask = self.empty_or_enemy & self.data.check_ray & self.move_type_mask;
        for from in knights {
            for to in knight_attacks(from) & move_mask {
                self.moves.push(Move::normal(from, to));
            }
        }
    }

    fn pawn_moves(&mut self) {
        let pawns = self.pos.pieces(Piece::Pawn, self.us);
        let push = self.us.push_offset();
        let (promotion_rank, double_push_rank) = match self.us {
            Color::White => (Bitboard::RANK_8, Bitboard::RANK_4),
            Color::Black => (Bitboard::RANK_1, Bitboard::RANK_5),
        };
        let check_ray = self.data.check_ray;

        let single_push = pawns.shift(push) & self.empty;
        let push_promotions = single_push & promotion_rank & check_ray;

        // Captures towards the a-file and towards the h-file, from White's
        // point of view.
        let (left_edge, right_edge) = match self.us {
            Color::White => (Bitboard::NOT_FILE_A, Bitboard::NOT_FILE_H),
            Color::Black => (Bitboard::NOT_FILE_H, Bitboard::NOT_FILE_A),
        };
        let dir: i8 = if self.us == Color::White { 1 } else { -1 };
        let left_offset = dir * 7;
        let right_offset = dir * 9;
        let captures_left = (pawns & left_edge).shift(left_offset) & self.enemy & check_ray;
        let captures_right = (pawns & right_edge).shift(right_offset) & self.enemy & check_ray;

        if self.quiet {
            for to in single_push & !promotion_rank & check_ray {
                let from = to.offset(-push);
                if self.keeps_alignment(from, to) {
                    self.moves.push(Move::normal(from, to));
                }
            }

            let double_push = single_push.shift(push) & self.empty & double_push_rank & check_ray;
            for to in double_push {
                let from = to.offset(-2 * push);
                if self.keeps_alignment(from, to) {
                    self.moves.push(Move::new(from, to, MoveFlag::DoublePush));
                }
            }
        }

        for (captures, offset) in [(captures_left, left_offset), (captures_right, right_offset)] {
            for to in captures & !promotion_rank {
                let from = to.offset(-offset);
                if self.keeps_alignment(from, to) {
                    self.moves.push(Move::normal(from, to));
                }
            }
            for to in captures & promotion_rank {
                let from = to.offset(-offset);
                if self.keeps_alignment(from, to) {
                    self.push_promotions(from, to);
                }
            }
        }

        for to in push_promotions {
            let from = to.offset(-push);
            if !self.is_pinned(from) {
                self.push_promotions(from, to);
            }
        }

        self.en_passant_moves(pawns);
    }

    fn push_promotions(&mut self, from: Square, to: Square) {
        self.moves.push(Move::new(from, to, MoveFlag::PromoteQueen));
        if !self.quiet {
            return;
        }
        match self.promotions {
            PromotionMode::All => {
                self.moves.push(Move::new(from, to, MoveFlag::PromoteKnight));
                self.moves.push(Move::new(from, to, MoveFlag::PromoteRook));
                self.moves.push(Move::new(from, to, MoveFlag::PromoteBishop));
            }
            PromotionMode::QueenAndKnight => {
                self.moves.push(Move::new(from, to, MoveFlag::PromoteKnight));
            }
            PromotionMode::QueenOnly => {}
        }
    }

    fn en_passant_moves(&mut self, pawns: Bitboard) {
        let Some(file) = self.pos.en_passant_file() else {
            return;
        };
        let target = en_passant_square(file, self.us);
        let captured = target.offset(-self.us.push_offset());
        let resolving = Bitboard::from_square(target) | Bitboard::from_square(captured);
        if (self.data.check_ray & resolving).is_empty()
            || self.pos.piece_at(captured)
                != Some(chess_core::ColoredPiece::new(Piece::Pawn, self.them))
        {
            return;
        }

        for from in pawns & pawn_attacks(target, self.them) {
            if self.keeps_alignment(from, target) && !self.exposes_king_after_en_passant(from, target, captured) {
                self.moves.push(Move::new(from, target, MoveFlag::EnPassant));
            }
        }
    }

    /// Both pawns leave the capture rank at once, which the pin masks do not
    /// model, so the resulting occupancy is tested directly.
    fn exposes_king_after_en_passant(&self, from: Square, target: Square, captured: Square) -> bool {
        let occupied = self.occupied
            ^ Bitboard::from_square(from)
            ^ Bitboard::from_square(captured)
            ^ Bitboard::from_square(target);
        let orthogonal = self.pos.orthogonal_sliders(self.them);
        let diagonal = self.pos.diagonal_sliders(self.them);
        (self.tables.rook_attacks(self.king, occupied) & orthogonal).is_not_empty()
            || (self.tables.bishop_attacks(self.king, occupied) & diagonal).is_not_empty()
    }
}
