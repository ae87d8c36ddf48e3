//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use crate::Position;
use chess_core::{File, Move, MoveFlag, Piece, Rank, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SanError {
    #[error("empty SAN string")]
    Empty,

    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),

    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),

    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Converts a move to SAN given the position before the move.
///
/// The move must be legal in `position`.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let from = m.from();
    let to = m.to();

    let mut san = if m.flag() == MoveFlag::Castle {
        if to.file() == File::G {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        }
    } else {
        let piece = position.piece_at(from).map_or(Piece::Pawn, |p| p.piece());
        let is_capture = position.piece_at(to).is_some() || m.flag() == MoveFlag::EnPassant;
        let mut san = String::with_capacity(8);

        if piece == Piece::Pawn {
            if is_capture {
                san.push(from.file().to_char());
            }
        } else {
            san.push(piece_to_san_char(piece));
            san.push_str(&disambiguation(position, m, piece));
        }
        if is_capture {
            san.push('x');
        }
        san.push_str(&to.to_algebraic());
        if let Some(promoted) = m.flag().promotion_piece() {
            san.push('=');
            san.push(piece_to_san_char(promoted));
        }
        san
    };

    let mut after = position.clone();
    after.make_move(m);
    if after.is_in_check() {
        san.push(if after.legal_moves(false).is_empty() {
            '#'
        } else {
            '+'
        });
    }
    san
}

/// Parses a SAN string and returns the matching legal move.
///
/// Accepts `0-0` for castling and ignores trailing `+`, `#`, `!` and `?`.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let trimmed = san.trim();
    if trimmed.is_empty() {
        return Err(SanError::Empty);
    }
    let body = trimmed.trim_end_matches(['+', '#', '!', '?']);

    let moves = position.legal_moves(false);
    match body {
        "O-O" | "0-0" | "O-O-O" | "0-0-0" => {
            let kingside = body.len() == 3;
            return moves
                .iter()
                .copied()
                .find(|m| m.flag() == MoveFlag::Castle && (m.to().file() == File::G) == kingside)
                .ok_or_else(|| SanError::NoMatchingMove(trimmed.to_string()));
        }
        _ => {}
    }

    let parsed = ParsedSan::parse(body)?;
    let mut matching = moves.iter().copied().filter(|&m| parsed.matches(position, m));
    match (matching.next(), matching.next()) {
        (None, _) => Err(SanError::NoMatchingMove(trimmed.to_string())),
        (Some(m), None) => Ok(m),
        (Some(_), Some(_)) => Err(SanError::AmbiguousMove(trimmed.to_string())),
    }
}

/// The parts of a non-castling SAN move.
#[derive(Debug)]
struct ParsedSan {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<Piece>,
}

impl ParsedSan {
    fn parse(san: &str) -> Result<Self, SanError> {
        let invalid = || SanError::InvalidFormat(san.to_string());

        let (piece, rest) = match san.chars().next() {
            Some(c) if c.is_ascii_uppercase() => (san_char_to_piece(c).ok_or_else(invalid)?, &san[1..]),
            Some(_) => (Piece::Pawn, san),
            None => return Err(SanError::Empty),
        };

        let (rest, promotion) = match rest.split_once('=') {
            Some((head, promo)) => {
                let mut chars = promo.chars();
                let promoted = chars.next().and_then(san_char_to_piece).ok_or_else(invalid)?;
                if chars.next().is_some() || matches!(promoted, Piece::Pawn | Piece::King) {
                    return Err(invalid());
                }
                (head, Some(promoted))
            }
            None => (rest, None),
        };

        // Everything but the last two characters is disambiguation and an
        // optional capture marker.
        let chars: Vec<char> = rest.chars().filter(|&c| c != 'x').collect();
        if chars.len() < 2 || chars.len() > 4 || rest.matches('x').count() > 1 {
            return Err(invalid());
        }
        let (prefix, target) = chars.split_at(chars.len() - 2);
        let to = Square::new(
            File::from_char(target[0]).ok_or_else(invalid)?,
            Rank::from_char(target[1]).ok_or_else(invalid)?,
        );

        let mut from_file = None;
        let mut from_rank = None;
        for &c in prefix {
            if let Some(file) = File::from_char(c).filter(|_| from_file.is_none() && from_rank.is_none()) {
                from_file = Some(file);
            } else if let Some(rank) = Rank::from_char(c).filter(|_| from_rank.is_none()) {
                from_rank = Some(rank);
            } else {
                return Err(invalid());
            }
        }

        Ok(ParsedSan {
            piece,
            from_file,
            from_rank,
            to,
            promotion,
        })
    }

    fn matches(&self, position: &Position, m: Move) -> bool {
        m.to() == self.to
            && m.flag() != MoveFlag::Castle
            && position.piece_at(m.from()).map(|p| p.piece()) == Some(self.piece)
            && self.from_file.map_or(true, |f| m.from().file() == f)
            && self.from_rank.map_or(true, |r| m.from().rank() == r)
            && m.flag().promotion_piece() == self.promotion
    }
}

/// File if that alone is unique, then rank, then both.
fn disambiguation(position: &Position, m: Move, piece: Piece) -> String {
    let from = m.from();
    let rivals: Vec<Square> = position
        .legal_moves(false)
        .iter()
        .filter(|o| o.to() == m.to() && o.from() != from)
        .filter(|o| position.piece_at(o.from()).map(|p| p.piece()) == Some(piece))
        .map(|o| o.from())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|sq| sq.file() != from.file()) {
        return from.file().to_char().to_string();
    }
    if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        return from.rank().to_char().to_string();
    }
    from.to_algebraic()
}

fn piece_to_san_char(piece: Piece) -> char {
    piece.to_char().to_ascii_uppercase()
}

fn san_char_to_piece(c: char) -> Option<Piece> {
    if c.is_ascii_uppercase() {
        Piece::from_char(c.to_ascii_lowercase())
    } else {
        None
    }
}
