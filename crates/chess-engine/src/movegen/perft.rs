//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a fixed depth,
//! which can be compared against known-correct values.

use super::{MoveGenerator, MoveList};
use crate::Position;

/// Counts leaf nodes at `depth`, making and undoing moves in place.
///
/// The position is left as it was found.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut moves = MoveList::new();
    MoveGenerator::default().generate_into(position, false, &mut moves);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        position.make_move(m);
        nodes += perft(position, depth - 1);
        position.undo_move(m);
    }
    nodes
}

/// Node count below each root move, keyed and sorted by UCI name.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = position.legal_moves(false);
    let mut results = Vec::with_capacity(moves.len());
    for &m in &moves {
        position.make_move(m);
        let nodes = perft(position, depth.saturating_sub(1));
        position.undo_move(m);
        results.push((m.to_uci(), nodes));
    }
    results.sort();
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &[(&str, &[u64])] = &[
        (chess_core::Fen::STARTPOS, &[20, 400, 8902]),
        (
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[48, 2039, 97862],
        ),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812]),
        (
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            &[6, 264, 9467],
        ),
        (
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            &[44, 1486, 62379],
        ),
    ];

    #[test]
    fn shallow_perft_counts() {
        for (fen, expected) in CASES {
            let mut position = Position::from_fen(fen).unwrap();
            for (depth, &nodes) in expected.iter().enumerate() {
                assert_eq!(
                    perft(&mut position, depth as u32 + 1),
                    nodes,
                    "{} at depth {}",
                    fen,
                    depth + 1
                );
            }
        }
    }

    #[test]
    fn perft_leaves_the_position_untouched() {
        let mut position = Position::from_fen(CASES[1].0).unwrap();
        let fen = position.to_fen();
        let key = position.zobrist_key();
        perft(&mut position, 3);
        assert_eq!(position.to_fen(), fen);
        assert_eq!(position.zobrist_key(), key);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut position = Position::startpos();
        let results = perft_divide(&mut position, 2);
        assert_eq!(results.len(), 20);
        assert_eq!(results.iter().map(|(_, n)| n).sum::<u64>(), 400);
        assert!(results.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(results.contains(&("g1f3".to_string(), 20)));
    }
}
