//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{CastlingRights, Color, ColoredPiece, File, Piece, Rank, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 2 to 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("expected exactly one {color} king, found {count}")]
    InvalidKingCount { color: Color, count: usize },

    #[error("{color} has {count} pieces, at most 16 are allowed")]
    TooManyPieces { color: Color, count: usize },
}

/// A parsed FEN record.
///
/// Missing trailing fields default to `- - 0 1`, so both the four-field EPD
/// form and a bare `placement side` pair are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Piece on each square, indexed a1 = 0 ... h8 = 63.
    pub board: [Option<ColoredPiece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// En-passant target square (the square the capturing pawn lands on).
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if !(2..=6).contains(&parts.len()) {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let board = parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling_field = parts.get(2).copied().unwrap_or("-");
        let castling = CastlingRights::from_fen(castling_field)
            .ok_or_else(|| FenError::InvalidCastlingRights(castling_field.to_string()))?;

        let en_passant = match parts.get(3).copied().unwrap_or("-") {
            "-" => None,
            field => Some(parse_en_passant(field, side_to_move)?),
        };

        let halfmove_clock = match parts.get(4) {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(field.to_string()))?,
            None => 0,
        };

        let fullmove_number = match parts.get(5) {
            Some(field) => field
                .parse::<u32>()
                .ok()
                .filter(|&number| number >= 1)
                .ok_or_else(|| FenError::InvalidFullmoveNumber(field.to_string()))?,
            None => 1,
        };

        Ok(Fen {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// The piece-placement field alone.
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(64);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.board[(rank * 8 + file) as usize] {
                    Some(piece) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    /// The same position seen from the other side: ranks mirrored, colours
    /// exchanged, side to move toggled.
    pub fn flipped(&self) -> Fen {
        let mut board = [None; 64];
        for (index, piece) in self.board.iter().enumerate() {
            if let Some(piece) = piece {
                let mirrored = index ^ 56;
                board[mirrored] = Some(ColoredPiece::new(piece.piece(), piece.color().opposite()));
            }
        }
        Fen {
            board,
            side_to_move: self.side_to_move.opposite(),
            castling: self.castling.swapped(),
            en_passant: self.en_passant.map(Square::flip_rank),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }
}

impl Default for Fen {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} ", self.placement(), self.side_to_move.fen_char(), self.castling)?;
        match self.en_passant {
            Some(square) => write!(f, "{}", square)?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

fn parse_placement(placement: &str) -> Result<[Option<ColoredPiece>; 64], FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut board = [None; 64];
    let mut kings = [0usize; 2];
    let mut totals = [0usize; 2];
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += run as usize;
                continue;
            }
            let piece = ColoredPiece::from_fen_char(c).ok_or_else(|| {
                FenError::InvalidPiecePlacement(format!("invalid character '{}' in rank {}", c, rank + 1))
            })?;
            if file >= 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has more than 8 squares",
                    rank + 1
                )));
            }
            if piece.piece() == Piece::Pawn && (rank == 0 || rank == 7) {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "pawn on back rank {}",
                    rank + 1
                )));
            }
            if piece.piece() == Piece::King {
                kings[piece.color().index()] += 1;
            }
            totals[piece.color().index()] += 1;
            board[rank * 8 + file] = Some(piece);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                rank + 1,
                file
            )));
        }
    }

    for color in Color::ALL {
        let count = kings[color.index()];
        if count != 1 {
            return Err(FenError::InvalidKingCount { color, count });
        }
        let count = totals[color.index()];
        if count > 16 {
            return Err(FenError::TooManyPieces { color, count });
        }
    }
    Ok(board)
}

fn parse_en_passant(field: &str, side_to_move: Color) -> Result<Square, FenError> {
    let square = Square::from_algebraic(field)
        .ok_or_else(|| FenError::InvalidEnPassantSquare(field.to_string()))?;
    let expected = match side_to_move {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    };
    if square.rank() != expected {
        return Err(FenError::InvalidEnPassantSquare(field.to_string()));
    }
    Ok(square)
}

/// En-passant target square for a file, given the side that may capture.
pub fn en_passant_square(file: File, side_to_move: Color) -> Square {
    let rank = match side_to_move {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    };
    Square::new(file, rank)
}
