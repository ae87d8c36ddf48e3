//! UCI long algebraic move names (`e2e4`, `e7e8q`).
//!
//! Parsing fills in the move flag from the position the move is played in.
//! It does not check legality; compare against [`Position::legal_moves`].

use crate::Position;
use chess_core::{Move, MoveFlag, Piece, Square};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UciError {
    #[error("invalid UCI move syntax: '{0}'")]
    InvalidSyntax(String),

    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),

    #[error("no piece on {0}")]
    NoPieceOnSquare(Square),
}

/// Parses a long algebraic move in the context of `position`.
pub fn parse_move(position: &Position, text: &str) -> Result<Move, UciError> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(UciError::InvalidSyntax(text.to_string()));
    }
    let from = Square::from_algebraic(&text[0..2])
        .ok_or_else(|| UciError::InvalidSyntax(text.to_string()))?;
    let to = Square::from_algebraic(&text[2..4])
        .ok_or_else(|| UciError::InvalidSyntax(text.to_string()))?;

    let piece = position
        .piece_at(from)
        .ok_or(UciError::NoPieceOnSquare(from))?
        .piece();

    if let Some(c) = text[4..].chars().next() {
        let flag = Piece::from_char(c.to_ascii_lowercase())
            .and_then(MoveFlag::promotion)
            .ok_or(UciError::InvalidPromotion(c))?;
        return Ok(Move::new(from, to, flag));
    }

    let file_delta = (i16::from(to.file().index()) - i16::from(from.file().index())).abs();
    let rank_delta = (i16::from(to.rank().index()) - i16::from(from.rank().index())).abs();
    let flag = match piece {
        Piece::Pawn if rank_delta == 2 => MoveFlag::DoublePush,
        Piece::Pawn if file_delta == 1 && position.piece_at(to).is_none() => MoveFlag::EnPassant,
        Piece::King if file_delta == 2 => MoveFlag::Castle,
        _ => MoveFlag::Normal,
    };
    Ok(Move::new(from, to, flag))
}

/// Formats a move in long algebraic notation.
pub fn format_move(m: Move) -> String {
    m.to_uci()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_inferred_from_the_position() {
        let position =
            Position::from_fen("r3k2r/8/8/3pP3/8/8/1p6/R3K2R w KQkq d6 0 1").unwrap();
        let cases = [
            ("e1g1", MoveFlag::Castle),
            ("e1c1", MoveFlag::Castle),
            ("e5d6", MoveFlag::EnPassant),
            ("e5e6", MoveFlag::Normal),
            ("a1a8", MoveFlag::Normal),
        ];
        for (text, flag) in cases {
            assert_eq!(parse_move(&position, text).unwrap().flag(), flag, "{}", text);
        }

        let position = Position::startpos();
        assert_eq!(parse_move(&position, "e2e4").unwrap().flag(), MoveFlag::DoublePush);
        assert_eq!(parse_move(&position, "g1f3").unwrap().flag(), MoveFlag::Normal);
    }

    #[test]
    fn promotions_accept_either_case() {
        let position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(parse_move(&position, "a7a8q").unwrap().flag(), MoveFlag::PromoteQueen);
        assert_eq!(parse_move(&position, "a7a8N").unwrap().flag(), MoveFlag::PromoteKnight);
        assert_eq!(
            parse_move(&position, "a7a8k"),
            Err(UciError::InvalidPromotion('k'))
        );
    }

    #[test]
    fn malformed_input_is_rejected() {
        let position = Position::startpos();
        for text in ["", "e2", "e2e9", "z2e4", "e2e4qq", "é2e4"] {
            assert!(
                matches!(parse_move(&position, text), Err(UciError::InvalidSyntax(_))),
                "{}",
                text
            );
        }
        assert_eq!(
            parse_move(&position, "e4e5"),
            Err(UciError::NoPieceOnSquare(Square::from_algebraic("e4").unwrap()))
        );
    }

    #[test]
    fn format_round_trips_generated_moves() {
        let position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        for &m in &position.legal_moves(false) {
            assert_eq!(parse_move(&position, &format_move(m)), Ok(m));
        }
    }
}
