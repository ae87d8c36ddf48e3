//! Check, pin and attack masks for the side to move.

use super::attacks;
use super::rays::{ray_mask, squares_to_edge, Direction};
use crate::{Bitboard, Position};
use chess_core::{Piece, Square};

/// What every piece generator needs to know about the opponent, computed
/// once per generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackData {
    pub in_check: bool,
    pub in_double_check: bool,
    /// Squares that resolve a single check: the checker and, for a slider,
    /// the squares between it and the king. Every square when not in check.
    pub check_ray: Bitboard,
    /// Union of the rays from the king through a pinned piece to its pinner.
    pub pin_rays: Bitboard,
    /// Everything the opponent attacks, with our king removed from the
    /// blockers so it cannot hide behind itself.
    pub opponent_attacks: Bitboard,
    pub opponent_sliding_attacks: Bitboard,
    pub opponent_pawn_attacks: Bitboard,
}

impl AttackData {
    pub fn compute(pos: &Position) -> Self {
        let tables = pos.tables();
        let us = pos.side_to_move();
        let them = us.opposite();
        let king = pos.king_square(us);
        let enemy_orthogonal = pos.orthogonal_sliders(them);
        let enemy_diagonal = pos.diagonal_sliders(them);

        let blockers = pos.all_pieces() ^ Bitboard::from_square(king);
        let mut sliding = Bitboard::EMPTY;
        for sq in enemy_orthogonal {
            sliding |= tables.rook_attacks(sq, blockers);
        }
        for sq in enemy_diagonal {
            sliding |= tables.bishop_attacks(sq, blockers);
        }

        let mut in_check = false;
        let mut in_double_check = false;
        let mut check_ray = Bitboard::EMPTY;
        let mut pin_rays = Bitboard::EMPTY;

        for dir in Direction::ALL {
            let sliders = if dir.is_diagonal() {
                enemy_diagonal
            } else {
                enemy_orthogonal
            };
            if (ray_mask(king, dir) & sliders).is_empty() {
                continue;
            }

            let mut ray = Bitboard::EMPTY;
            let mut shield = false;
            let mut sq = king;
            for _ in 0..squares_to_edge(king, dir) {
                sq = sq.offset(dir.offset());
                ray.set(sq);
                let Some(piece) = pos.piece_at(sq) else {
                    continue;
                };
                if piece.color() == us {
                    if shield {
                        break;
                    }
                    shield = true;
                    continue;
                }
                if sliders.contains(sq) {
                    if shield {
                        pin_rays |= ray;
                    } else {
                        check_ray |= ray;
                        in_double_check = in_check;
                        in_check = true;
                    }
                }
                break;
            }

            if in_double_check {
                break;
            }
        }

        let enemy_knights = pos.pieces(Piece::Knight, them);
        let mut knight_attacks = Bitboard::EMPTY;
        for sq in enemy_knights {
            knight_attacks |= attacks::knight_attacks(sq);
        }
        let knight_checkers = attacks::knight_attacks(king) & enemy_knights;
        if knight_checkers.is_not_empty() {
            in_double_check |= in_check;
            in_check = true;
            check_ray |= knight_checkers;
        }

        let enemy_pawns = pos.pieces(Piece::Pawn, them);
        let pawn_attacks = enemy_pawns.pawn_attacks(them);
        let pawn_checkers = attacks::pawn_attacks(king, us) & enemy_pawns;
        if pawn_checkers.is_not_empty() {
            in_double_check |= in_check;
            in_check = true;
            check_ray |= pawn_checkers;
        }

        let king_attacks = attacks::king_attacks(pos.king_square(them));

        if !in_check {
            check_ray = Bitboard::FULL;
        }

        AttackData {
            in_check,
            in_double_check,
            check_ray,
            pin_rays,
            opponent_attacks: sliding | knight_attacks | pawn_attacks | king_attacks,
            opponent_sliding_attacks: sliding,
            opponent_pawn_attacks: pawn_attacks,
        }
    }

    #[inline]
    pub fn is_pinned(&self, sq: Square) -> bool {
        self.pin_rays.contains(sq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(fen: &str) -> AttackData {
        AttackData::compute(&Position::from_fen(fen).unwrap())
    }

    fn bb(squares: &[&str]) -> Bitboard {
        squares
            .iter()
            .map(|s| Bitboard::from_square(Square::from_algebraic(s).unwrap()))
            .fold(Bitboard::EMPTY, |acc, b| acc | b)
    }

    #[test]
    fn quiet_position_has_unrestricted_check_ray() {
        let d = data(chess_core::Fen::STARTPOS);
        assert!(!d.in_check);
        assert_eq!(d.check_ray, Bitboard::FULL);
        assert!(d.pin_rays.is_empty());
    }

    #[test]
    fn slider_check_ray_includes_the_checker() {
        let d = data("4k3/8/8/8/r7/8/8/4K3 w - - 0 1");
        assert!(!d.in_check);

        let d = data("4k3/8/8/8/4r3/8/8/4K3 w - - 0 1");
        assert!(d.in_check);
        assert!(!d.in_double_check);
        assert_eq!(d.check_ray, bb(&["e2", "e3", "e4"]));
    }

    #[test]
    fn pinned_piece_is_on_the_pin_ray() {
        let d = data("4k3/8/8/1b6/8/3N4/8/6K1 w - - 0 1");
        assert!(d.pin_rays.is_empty());

        let d = data("4k3/8/8/1b6/8/3N4/4K3/8 w - - 0 1");
        assert_eq!(d.pin_rays, bb(&["d3", "c4", "b5"]));
        assert!(d.is_pinned(Square::from_algebraic("d3").unwrap()));
    }

    #[test]
    fn two_friendly_blockers_void_the_pin() {
        let d = data("4k3/8/8/4r3/8/4N3/4B3/4K3 w - - 0 1");
        assert!(d.pin_rays.is_empty());
        assert!(!d.in_check);
    }

    #[test]
    fn knight_and_slider_make_double_check() {
        let d = data("4k3/8/8/8/4r3/3n4/8/4K3 w - - 0 1");
        assert!(d.in_check);
        assert!(d.in_double_check);
    }

    #[test]
    fn pawn_check_sets_check_ray_to_the_pawn() {
        let d = data("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1");
        assert!(d.in_check);
        assert_eq!(d.check_ray, bb(&["d2"]));
    }

    #[test]
    fn king_does_not_shadow_slider_attacks() {
        let d = data("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        assert!(d.opponent_attacks.contains(Square::F1));
        assert!(d.opponent_sliding_attacks.contains(Square::H1));
    }
}
