//! Chess position representation.
//!
//! A [`Position`] keeps three synchronised views of the board: a square
//! grid for piece-at lookups, one bitboard per coloured piece for attack
//! unions, and dense [`PieceList`]s for iterating pieces of one kind. All
//! three are updated together inside [`Position::make_move`] and
//! [`Position::undo_move`].

mod make_move;
mod piece_list;
mod repetition;
mod state;

pub use piece_list::PieceList;
pub use repetition::RepetitionHistory;
pub use state::GameState;

use crate::movegen::{attacks, AttackData, MoveGenerator, MoveList};
use crate::rules;
use crate::tables::EngineTables;
use crate::Bitboard;
use chess_core::{
    en_passant_square, CastlingRights, Color, ColoredPiece, Fen, FenError, File, Move, MoveFlag,
    Piece, Square,
};
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

/// How [`Position::to_fen_with`] writes the en-passant field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnPassantField {
    /// Write the target square after every double push.
    #[default]
    Always,
    /// Write `-` unless a legal en-passant capture exists.
    OnlyIfCapturable,
}

/// A chess position with its undo history.
///
/// Cloning is cheap enough for handing a private copy to a bot, but search
/// code should make and undo moves in place.
#[derive(Clone)]
pub struct Position {
    tables: Arc<EngineTables>,
    squares: [Option<ColoredPiece>; 64],
    pieces: [Bitboard; ColoredPiece::COUNT],
    colors: [Bitboard; 2],
    occupied: Bitboard,
    king_squares: [Square; 2],
    piece_lists: [PieceList; ColoredPiece::COUNT],
    side_to_move: Color,
    ply_count: u32,
    state: GameState,
    /// States that `state` replaced, most recent last.
    history: Vec<GameState>,
    repetition: RepetitionHistory,
    game_moves: Vec<Move>,
    in_check: Cell<Option<bool>>,
}

impl Position {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self::from_parsed(&Fen::default(), EngineTables::shared())
    }

    /// Parses a FEN string using the process-wide tables.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::from_fen_with_tables(fen, EngineTables::shared())
    }

    /// Parses a FEN string using a caller-supplied table instance.
    pub fn from_fen_with_tables(fen: &str, tables: Arc<EngineTables>) -> Result<Self, FenError> {
        Ok(Self::from_parsed(&Fen::parse(fen)?, tables))
    }

    /// Builds a position from an already validated FEN record.
    pub fn from_parsed(fen: &Fen, tables: Arc<EngineTables>) -> Self {
        let mut position = Position {
            tables,
            squares: [None; 64],
            pieces: [Bitboard::EMPTY; ColoredPiece::COUNT],
            colors: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            king_squares: [Square::E1, Square::E8],
            piece_lists: std::array::from_fn(|_| PieceList::new()),
            side_to_move: fen.side_to_move,
            ply_count: fen.fullmove_number.saturating_sub(1) * 2
                + u32::from(fen.side_to_move == Color::Black),
            state: GameState {
                captured: None,
                en_passant_file: fen.en_passant.map_or(0, |sq| sq.file().index() + 1),
                castling: fen.castling,
                fifty_move_counter: fen.halfmove_clock,
                zobrist_key: 0,
            },
            history: Vec::with_capacity(64),
            repetition: RepetitionHistory::new(),
            game_moves: Vec::new(),
            in_check: Cell::new(None),
        };

        for (sq, piece) in Bitboard::FULL.into_iter().zip(fen.board) {
            if let Some(piece) = piece {
                position.put_piece(piece, sq);
            }
        }

        position.state.zobrist_key = position.compute_zobrist_key();
        position
            .repetition
            .push(position.state.zobrist_key, false, true);
        position
    }

    /// Hashes the position from scratch.
    pub fn compute_zobrist_key(&self) -> u64 {
        let keys = self.tables.zobrist();
        let mut key = 0;
        for (index, bitboard) in self.pieces.iter().enumerate() {
            let Some(piece) = ColoredPiece::from_index(index) else {
                continue;
            };
            for sq in *bitboard {
                key ^= keys.piece(piece, sq);
            }
        }
        key ^= keys.en_passant(self.state.en_passant_file);
        key ^= keys.castling(self.state.castling);
        if self.side_to_move == Color::Black {
            key ^= keys.black_to_move;
        }
        key
    }

    /// Snapshot of the position as a FEN record.
    pub fn fen(&self) -> Fen {
        self.fen_with(EnPassantField::Always)
    }

    fn fen_with(&self, field: EnPassantField) -> Fen {
        let en_passant = self.en_passant_file().and_then(|file| {
            let include = match field {
                EnPassantField::Always => true,
                EnPassantField::OnlyIfCapturable => self.has_en_passant_capture(),
            };
            include.then(|| en_passant_square(file, self.side_to_move))
        });
        Fen {
            board: self.squares,
            side_to_move: self.side_to_move,
            castling: self.state.castling,
            en_passant,
            halfmove_clock: self.state.fifty_move_counter,
            fullmove_number: self.fullmove_number(),
        }
    }

    /// Serialises to FEN, always writing the en-passant square when set.
    pub fn to_fen(&self) -> String {
        self.fen().to_string()
    }

    /// Serialises to FEN with a chosen en-passant policy.
    pub fn to_fen_with(&self, field: EnPassantField) -> String {
        self.fen_with(field).to_string()
    }

    fn has_en_passant_capture(&self) -> bool {
        self.legal_moves(true)
            .iter()
            .any(|m| m.flag() == MoveFlag::EnPassant)
    }

    // Board accessors

    #[inline]
    pub fn tables(&self) -> &Arc<EngineTables> {
        &self.tables
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.squares[sq.idx()]
    }

    #[inline]
    pub fn pieces(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[ColoredPiece::new(piece, color).index()]
    }

    #[inline]
    pub fn colour_bitboard(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn all_pieces(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn piece_list(&self, piece: Piece, color: Color) -> &PieceList {
        &self.piece_lists[ColoredPiece::new(piece, color).index()]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// Rooks and queens of `color`.
    #[inline]
    pub fn orthogonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(Piece::Rook, color) | self.pieces(Piece::Queen, color)
    }

    /// Bishops and queens of `color`.
    #[inline]
    pub fn diagonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(Piece::Bishop, color) | self.pieces(Piece::Queen, color)
    }

    // State accessors

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Half-moves since the game started, derived from the FEN move number
    /// on load.
    #[inline]
    pub fn ply_count(&self) -> u32 {
        self.ply_count
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.ply_count / 2 + 1
    }

    #[inline]
    pub fn fifty_move_counter(&self) -> u32 {
        self.state.fifty_move_counter
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.state.castling
    }

    #[inline]
    pub fn en_passant_file(&self) -> Option<File> {
        self.state
            .en_passant_file_index()
            .and_then(File::from_index)
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.state.zobrist_key
    }

    #[inline]
    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    /// Moves played with [`Position::play_move`], oldest first.
    pub fn game_move_history(&self) -> &[Move] {
        &self.game_moves
    }

    /// Keys of played positions since the last irreversible played move,
    /// current position included.
    pub fn repetition_history(&self) -> Vec<u64> {
        self.repetition.played_keys()
    }

    // Queries

    /// Legal moves for the side to move.
    pub fn legal_moves(&self, captures_only: bool) -> MoveList {
        MoveGenerator::default().generate(self, captures_only)
    }

    /// Check, pin and attack masks for the side to move.
    pub fn attack_data(&self) -> AttackData {
        AttackData::compute(self)
    }

    pub fn is_in_check(&self) -> bool {
        if let Some(cached) = self.in_check.get() {
            return cached;
        }
        let in_check = self.compute_in_check();
        self.in_check.set(Some(in_check));
        in_check
    }

    fn compute_in_check(&self) -> bool {
        let us = self.side_to_move;
        let them = us.opposite();
        let king = self.king_square(us);

        let orthogonal = self.orthogonal_sliders(them);
        if orthogonal.is_not_empty()
            && (self.tables.rook_attacks(king, self.occupied) & orthogonal).is_not_empty()
        {
            return true;
        }
        let diagonal = self.diagonal_sliders(them);
        if diagonal.is_not_empty()
            && (self.tables.bishop_attacks(king, self.occupied) & diagonal).is_not_empty()
        {
            return true;
        }
        (attacks::knight_attacks(king) & self.pieces(Piece::Knight, them)).is_not_empty()
            || (attacks::pawn_attacks(king, us) & self.pieces(Piece::Pawn, them)).is_not_empty()
    }

    pub(crate) fn cache_in_check(&self, in_check: bool) {
        self.in_check.set(Some(in_check));
    }

    pub fn is_in_checkmate(&self) -> bool {
        self.is_in_check() && self.legal_moves(false).is_empty()
    }

    pub fn is_in_stalemate(&self) -> bool {
        !self.is_in_check() && self.legal_moves(false).is_empty()
    }

    /// Whether the opponent attacks `sq`, treating our king as transparent.
    pub fn square_is_attacked_by_opponent(&self, sq: Square) -> bool {
        self.attack_data().opponent_attacks.contains(sq)
    }

    /// The current position occurred earlier since the last irreversible
    /// move, counting positions reached in search.
    ///
    /// A single earlier occurrence is enough. Search uses this to steer away
    /// from repetitions; it is not the threefold rule, see
    /// [`Position::is_threefold_repetition`].
    pub fn is_repeated_position(&self) -> bool {
        let key = self.zobrist_key();
        let recorded = usize::from(self.repetition.last_key() == Some(key));
        self.repetition.occurrences(key) > recorded
    }

    /// How often the current position has occurred in the played game,
    /// itself included.
    pub fn repetition_count(&self) -> usize {
        let key = self.zobrist_key();
        let played = self.repetition.played_occurrences(key);
        if self.repetition.last() == Some((key, true)) {
            played
        } else {
            played + 1
        }
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 3
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.state.fifty_move_counter >= 100
    }

    pub fn has_insufficient_material(&self) -> bool {
        rules::has_insufficient_material(self)
    }

    /// Stalemate, fifty moves, insufficient material, or a repeated position.
    ///
    /// Uses [`Position::is_repeated_position`], so a single repeat counts.
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw()
            || self.has_insufficient_material()
            || self.is_in_stalemate()
            || self.is_repeated_position()
    }

    // Board mutation primitives shared by loading and make/undo.

    fn put_piece(&mut self, piece: ColoredPiece, sq: Square) {
        let color = piece.color().index();
        self.squares[sq.idx()] = Some(piece);
        self.pieces[piece.index()].set(sq);
        self.colors[color].set(sq);
        self.occupied.set(sq);
        self.piece_lists[piece.index()].add(sq);
        if piece.piece() == Piece::King {
            self.king_squares[color] = sq;
        }
    }

    fn remove_piece(&mut self, piece: ColoredPiece, sq: Square) {
        self.squares[sq.idx()] = None;
        self.pieces[piece.index()].clear(sq);
        self.colors[piece.color().index()].clear(sq);
        self.occupied.clear(sq);
        self.piece_lists[piece.index()].remove(sq);
    }

    fn move_piece(&mut self, piece: ColoredPiece, from: Square, to: Square) {
        let color = piece.color().index();
        let delta = Bitboard::from_square(from) | Bitboard::from_square(to);
        self.squares[from.idx()] = None;
        self.squares[to.idx()] = Some(piece);
        self.pieces[piece.index()] ^= delta;
        self.colors[color] ^= delta;
        self.occupied ^= delta;
        self.piece_lists[piece.index()].relocate(from, to);
        if piece.piece() == Piece::King {
            self.king_squares[color] = to;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = self.squares[usize::from(rank * 8 + file)].map_or('.', ColoredPiece::to_fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.to_fen())
            .field("zobrist_key", &format_args!("{:#018x}", self.state.zobrist_key))
            .field("history", &self.history.len())
            .finish()
    }
}
