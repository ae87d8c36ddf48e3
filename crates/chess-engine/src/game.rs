//! Game management on top of [`Position`].
//!
//! A [`Game`] accepts moves from outside (typed `Move`, UCI or SAN, or a
//! [`Bot`]), checks them against the legal move list before playing them,
//! and keeps the SAN record and the result.

use crate::bot::{Bot, Timer};
use crate::rules::{game_result, GameResult};
use crate::san::{move_to_san, san_to_move, SanError};
use crate::uci::{self, UciError};
use crate::{MoveList, Position};
use chess_core::{Color, FenError, Move};
use thiserror::Error;

/// A move in the game record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    pub mov: Move,
    /// SAN as written before the move was played.
    pub san: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error(transparent)]
    InvalidSan(#[from] SanError),

    #[error(transparent)]
    InvalidUci(#[from] UciError),

    #[error("the game is already over ({0})")]
    GameOver(GameResult),

    #[error("no move to undo")]
    NothingToUndo,
}

/// A game in progress or finished.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    moves: Vec<GameMove>,
    /// Results the arbiter cannot see from the board (timeouts and illegal
    /// bot replies).
    forfeit: Option<GameResult>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    pub fn from_position(position: Position) -> Self {
        Game {
            position,
            moves: Vec::new(),
            forfeit: None,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn legal_moves(&self) -> MoveList {
        self.position.legal_moves(false)
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// The result, if the game has ended.
    pub fn result(&self) -> Option<GameResult> {
        self.forfeit.or_else(|| game_result(&self.position))
    }

    pub fn is_over(&self) -> bool {
        self.result().is_some()
    }

    /// Plays `m` if it is legal in the current position.
    pub fn make_move(&mut self, m: Move) -> Result<(), GameError> {
        if let Some(result) = self.result() {
            return Err(GameError::GameOver(result));
        }
        if !self.legal_moves().contains(m) {
            tracing::warn!(mov = %m, fen = %self.to_fen(), "rejected illegal move");
            return Err(GameError::IllegalMove(m.to_uci()));
        }
        self.apply(m);
        Ok(())
    }

    pub fn make_move_uci(&mut self, text: &str) -> Result<(), GameError> {
        let m = uci::parse_move(&self.position, text)?;
        self.make_move(m)
    }

    pub fn make_move_san(&mut self, text: &str) -> Result<(), GameError> {
        if let Some(result) = self.result() {
            return Err(GameError::GameOver(result));
        }
        let m = san_to_move(&self.position, text)?;
        self.apply(m);
        Ok(())
    }

    /// Takes back the last move. A forfeit is cleared along with it.
    pub fn undo(&mut self) -> Result<GameMove, GameError> {
        let last = self.moves.pop().ok_or(GameError::NothingToUndo)?;
        self.position.unplay_move(last.mov);
        self.forfeit = None;
        Ok(last)
    }

    /// Asks `bot` for a move on a copy of the position and plays it.
    ///
    /// The bot's clock is charged for the time it took. Running out of time
    /// or answering with an illegal move ends the game against the side to
    /// move; the returned result says which.
    pub fn play_bot_move<B: Bot + ?Sized>(
        &mut self,
        bot: &mut B,
        timer: &mut Timer,
    ) -> Result<Option<GameResult>, GameError> {
        if let Some(result) = self.result() {
            return Err(GameError::GameOver(result));
        }
        let mover = self.side_to_move();

        timer.start_turn();
        let mut scratch = self.position.clone();
        let m = bot.choose_move(&mut scratch, timer);
        let spent = timer.end_turn();

        if timer.is_flagged() {
            tracing::warn!(color = %mover, spent_ms = spent.as_millis() as u64, "bot ran out of time");
            self.forfeit = Some(GameResult::Timeout(mover));
        } else if !self.legal_moves().contains(m) {
            tracing::warn!(color = %mover, mov = %m, fen = %self.to_fen(), "bot played an illegal move");
            self.forfeit = Some(GameResult::IllegalMove(mover));
        } else {
            self.apply(m);
        }
        Ok(self.result())
    }

    fn apply(&mut self, m: Move) {
        let san = move_to_san(&self.position, m);
        self.position.play_move(m);
        self.moves.push(GameMove { mov: m, san });
    }
}
