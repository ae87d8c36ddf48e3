//! Incremental make/undo.
//!
//! Moves must come from the move generator for the current position. Make
//! and undo calls pair up in LIFO order; the board is only consistent
//! between calls.

use super::{GameState, Position};
use chess_core::{CastlingRights, ColoredPiece, File, Move, MoveFlag, Piece, Square};

/// Castling rights lost when a piece leaves or lands on `sq`.
#[inline]
fn castling_loss(sq: Square) -> u8 {
    match sq {
        Square::H1 => CastlingRights::WHITE_KINGSIDE,
        Square::A1 => CastlingRights::WHITE_QUEENSIDE,
        Square::H8 => CastlingRights::BLACK_KINGSIDE,
        Square::A8 => CastlingRights::BLACK_QUEENSIDE,
        _ => 0,
    }
}

/// Rook origin and destination for a castle whose king lands on `king_to`.
#[inline]
fn castle_rook_squares(king_to: Square) -> (Square, Square) {
    if king_to.file() == File::G {
        (king_to.offset(1), king_to.offset(-1))
    } else {
        (king_to.offset(-2), king_to.offset(1))
    }
}

impl Position {
    /// Makes a move inside search.
    ///
    /// The resulting position counts for [`Position::is_repeated_position`]
    /// but not for the played-game history.
    pub fn make_move(&mut self, m: Move) {
        self.make(m, false);
    }

    /// Plays a move in the game, recording it in the game move history and
    /// the legal repetition count.
    pub fn play_move(&mut self, m: Move) {
        self.make(m, true);
    }

    fn make(&mut self, m: Move, played: bool) {
        let us = self.side_to_move;
        let from = m.from();
        let to = m.to();
        let flag = m.flag();
        let Some(moving) = self.squares[from.idx()] else {
            panic!("make_move({}) with no piece on {}", m, from);
        };

        let prev = self.state;
        let mut key = prev.zobrist_key;
        let mut castling = prev.castling;
        let mut en_passant_file = 0;
        let mut captured = None;

        let capture_sq = if flag == MoveFlag::EnPassant {
            to.offset(-us.push_offset())
        } else {
            to
        };
        if let Some(victim) = self.squares[capture_sq.idx()] {
            captured = Some(victim.piece());
            self.remove_piece(victim, capture_sq);
            key ^= self.tables.zobrist().piece(victim, capture_sq);
        }

        self.move_piece(moving, from, to);
        key ^= self.tables.zobrist().piece(moving, from);
        key ^= self.tables.zobrist().piece(moving, to);

        if moving.piece() == Piece::King {
            castling = castling.without_color(us);
            if flag == MoveFlag::Castle {
                let rook = ColoredPiece::new(Piece::Rook, us);
                let (rook_from, rook_to) = castle_rook_squares(to);
                self.move_piece(rook, rook_from, rook_to);
                key ^= self.tables.zobrist().piece(rook, rook_from);
                key ^= self.tables.zobrist().piece(rook, rook_to);
            }
        }

        if let Some(promoted) = flag.promotion_piece() {
            let promoted = ColoredPiece::new(promoted, us);
            self.remove_piece(moving, to);
            self.put_piece(promoted, to);
            key ^= self.tables.zobrist().piece(moving, to);
            key ^= self.tables.zobrist().piece(promoted, to);
        }

        if flag == MoveFlag::DoublePush {
            en_passant_file = from.file().index() + 1;
        }
        key ^= self.tables.zobrist().en_passant(prev.en_passant_file);
        key ^= self.tables.zobrist().en_passant(en_passant_file);

        if !castling.is_empty() {
            castling = castling.without(castling_loss(from) | castling_loss(to));
        }
        if castling != prev.castling {
            key ^= self.tables.zobrist().castling(prev.castling);
            key ^= self.tables.zobrist().castling(castling);
        }

        key ^= self.tables.zobrist().black_to_move;
        self.side_to_move = us.opposite();
        self.ply_count += 1;

        let irreversible = moving.piece() == Piece::Pawn || captured.is_some();
        let fifty_move_counter = if irreversible {
            0
        } else {
            prev.fifty_move_counter + 1
        };

        self.history.push(prev);
        self.state = GameState {
            captured,
            en_passant_file,
            castling,
            fifty_move_counter,
            zobrist_key: key,
        };
        self.in_check.set(None);

        self.repetition.push(key, irreversible, played);
        if played {
            self.game_moves.push(m);
        }
    }

    /// Reverts the most recent [`Position::make_move`] or
    /// [`Position::play_move`], which must have been `m`.
    ///
    /// # Panics
    ///
    /// Panics if there is no move to undo.
    pub fn undo_move(&mut self, m: Move) {
        let Some(prev) = self.history.pop() else {
            panic!("undo_move({}) with an empty history", m);
        };
        let undone = std::mem::replace(&mut self.state, prev);
        let us = self.side_to_move.opposite();
        self.side_to_move = us;
        self.ply_count -= 1;

        let from = m.from();
        let to = m.to();
        let flag = m.flag();

        if let Some(promoted) = flag.promotion_piece() {
            self.remove_piece(ColoredPiece::new(promoted, us), to);
            self.put_piece(ColoredPiece::new(Piece::Pawn, us), to);
        }

        let Some(moving) = self.squares[to.idx()] else {
            panic!("undo_move({}) with no piece on {}", m, to);
        };
        self.move_piece(moving, to, from);

        if flag == MoveFlag::Castle {
            let (rook_from, rook_to) = castle_rook_squares(to);
            self.move_piece(ColoredPiece::new(Piece::Rook, us), rook_to, rook_from);
        }

        if let Some(captured) = undone.captured {
            let capture_sq = if flag == MoveFlag::EnPassant {
                to.offset(-us.push_offset())
            } else {
                to
            };
            self.put_piece(ColoredPiece::new(captured, us.opposite()), capture_sq);
        }

        self.in_check.set(None);
        if self.repetition.pop() == Some(true) {
            self.game_moves.pop();
        }
    }

    /// Takes back a move made with [`Position::play_move`].
    pub fn unplay_move(&mut self, m: Move) {
        debug_assert_eq!(self.game_moves.last(), Some(&m), "unplay_move of an unplayed move");
        self.undo_move(m);
    }

    /// Passes the turn without moving.
    ///
    /// Search only. The side to move must not be in check; this is not
    /// verified here, see [`Position::try_skip_turn`].
    pub fn make_null_move(&mut self) {
        let prev = self.state;
        let keys = self.tables.zobrist();
        let zobrist_key =
            prev.zobrist_key ^ keys.black_to_move ^ keys.en_passant(prev.en_passant_file);

        self.history.push(prev);
        self.state = GameState {
            captured: None,
            en_passant_file: 0,
            castling: prev.castling,
            fifty_move_counter: prev.fifty_move_counter + 1,
            zobrist_key,
        };
        self.side_to_move = self.side_to_move.opposite();
        self.ply_count += 1;
        self.in_check.set(Some(false));
    }

    /// Reverts [`Position::make_null_move`].
    ///
    /// # Panics
    ///
    /// Panics if there is no move to undo.
    pub fn undo_null_move(&mut self) {
        let Some(prev) = self.history.pop() else {
            panic!("undo_null_move with an empty history");
        };
        self.state = prev;
        self.side_to_move = self.side_to_move.opposite();
        self.ply_count -= 1;
        self.in_check.set(Some(false));
    }

    /// Makes a null move unless the side to move is in check.
    pub fn try_skip_turn(&mut self) -> bool {
        if self.is_in_check() {
            return false;
        }
        self.make_null_move();
        true
    }
}
