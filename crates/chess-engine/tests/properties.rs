//! Cross-module properties: slider tables, hashing, draw rules and FEN.

use chess_core::{Fen, Square};
use chess_engine::movegen::{slider_attacks_slow, Slider};
use chess_engine::{uci, Bitboard, EngineTables, Position};
use proptest::prelude::*;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn play(position: &mut Position, moves: &[&str]) {
    for text in moves {
        let m = uci::parse_move(position, text).unwrap();
        assert!(position.legal_moves(false).contains(m), "{} is illegal", text);
        position.play_move(m);
    }
}

fn after(moves: &[&str]) -> Position {
    let mut position = Position::startpos();
    play(&mut position, moves);
    position
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 10_000, .. ProptestConfig::default() })]

    #[test]
    fn magic_lookups_match_the_ray_cast(dense in any::<u64>(), mask in any::<u64>()) {
        let tables = EngineTables::shared();
        // Mix dense and sparse boards.
        let occupied = Bitboard::new(dense & (mask | mask.rotate_left(17)));
        for index in 0..64 {
            let sq = Square::from_index(index).unwrap();
            prop_assert_eq!(
                tables.rook_attacks(sq, occupied),
                slider_attacks_slow(Slider::Rook, sq, occupied)
            );
            prop_assert_eq!(
                tables.bishop_attacks(sq, occupied),
                slider_attacks_slow(Slider::Bishop, sq, occupied)
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn incremental_key_matches_a_fresh_load(choices in prop::collection::vec(any::<prop::sample::Index>(), 1..40)) {
        let mut position = Position::from_fen(KIWIPETE).unwrap();
        for choice in choices {
            let moves = position.legal_moves(false);
            if moves.is_empty() {
                break;
            }
            position.make_move(moves[choice.index(moves.len())]);
            prop_assert_eq!(position.zobrist_key(), position.compute_zobrist_key());
            let reloaded = Position::from_fen(&position.to_fen()).unwrap();
            prop_assert_eq!(reloaded.zobrist_key(), position.zobrist_key());
        }
    }
}

#[test]
fn transpositions_hash_alike() {
    let a = after(&["g1f3", "g8f6", "b1c3", "b8c6"]);
    let b = after(&["b1c3", "b8c6", "g1f3", "g8f6"]);
    assert_eq!(a.zobrist_key(), b.zobrist_key());

    // The double push leaves the same en-passant file either way.
    let a = after(&["e2e4", "e7e5"]);
    let b = after(&["g1f3", "g8f6", "f3g1", "f6g8", "e2e4", "e7e5"]);
    assert_eq!(a.zobrist_key(), b.zobrist_key());
}

#[test]
fn lost_rights_and_en_passant_change_the_key() {
    let castled_rights = after(&["e2e4", "e7e5", "e1e2", "e8e7", "e2e1", "e7e8"]);
    let untouched = after(&["e2e4", "e7e5", "g1f3", "g8f6", "f3g1", "f6g8"]);
    assert_eq!(castled_rights.to_fen().split(' ').next(), untouched.to_fen().split(' ').next());
    assert_ne!(castled_rights.zobrist_key(), untouched.zobrist_key());

    let single_steps = after(&["e2e3", "e7e6", "e3e4", "e6e5"]);
    let double_push = after(&["e2e4", "e7e5"]);
    assert_ne!(single_steps.zobrist_key(), double_push.zobrist_key());
}

#[test]
fn draw_edge_cases() {
    let bare_kings = Position::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
    assert!(bare_kings.has_insufficient_material());
    assert!(bare_kings.is_draw());

    let same_colour_bishops = Position::from_fen("8/8/4k3/8/3b4/3KB3/8/8 w - - 0 1").unwrap();
    assert!(same_colour_bishops.has_insufficient_material());
    assert!(same_colour_bishops.is_draw());

    let opposite_bishops = Position::from_fen("8/8/4k3/3b4/8/3KB3/8/8 w - - 0 1").unwrap();
    assert!(!opposite_bishops.has_insufficient_material());

    let rook = "8/8/4k3/8/8/3K4/8/7R w - - {} 80";
    let at_99 = Position::from_fen(&rook.replace("{}", "99")).unwrap();
    let at_100 = Position::from_fen(&rook.replace("{}", "100")).unwrap();
    assert!(!at_99.is_fifty_move_draw());
    assert!(!at_99.is_draw());
    assert!(at_100.is_fifty_move_draw());
    assert!(at_100.is_draw());
}

#[test]
fn soft_repetition_fires_before_the_threefold_rule() {
    let mut position = Position::startpos();
    play(&mut position, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert!(position.is_repeated_position());
    assert!(position.is_draw());
    assert_eq!(position.repetition_count(), 2);
    assert!(!position.is_threefold_repetition());

    play(&mut position, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert_eq!(position.repetition_count(), 3);
    assert!(position.is_threefold_repetition());

    // A pawn move closes the window.
    play(&mut position, &["e2e4"]);
    assert!(!position.is_repeated_position());
    assert_eq!(position.repetition_history().len(), 1);
}

fn sample_positions(position: &mut Position, depth: u32, counter: &mut usize, out: &mut Vec<String>) {
    *counter += 1;
    if *counter % 13 == 0 {
        out.push(position.to_fen());
    }
    if depth == 0 {
        return;
    }
    for &m in &position.legal_moves(false) {
        position.play_move(m);
        sample_positions(position, depth - 1, counter, out);
        position.unplay_move(m);
    }
}

#[test]
fn fen_round_trips_over_sampled_positions() {
    let mut fens = Vec::new();
    for start in [Fen::STARTPOS, KIWIPETE] {
        let mut position = Position::from_fen(start).unwrap();
        let mut counter = 0;
        sample_positions(&mut position, 2, &mut counter, &mut fens);
    }
    assert!(fens.len() >= 100, "only {} samples", fens.len());

    for fen in fens.iter().take(100) {
        let position = Position::from_fen(fen).unwrap();
        assert_eq!(&position.to_fen(), fen);
        assert_eq!(position.fen(), Fen::parse(fen).unwrap());
        assert_eq!(position.zobrist_key(), position.compute_zobrist_key());
    }
}
