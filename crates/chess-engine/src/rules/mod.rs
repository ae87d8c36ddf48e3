//! Game-ending conditions.
//!
//! [`game_result`] is the arbiter: it decides whether a played game is over
//! using the legal threefold rule. The softer repetition check used by
//! search lives on [`Position::is_repeated_position`].

mod material;

pub use material::has_insufficient_material;

use crate::Position;
use chess_core::Color;
use std::fmt;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// The side to move has been checkmated.
    Checkmate { winner: Color },
    /// Draw with a specific reason.
    Draw(DrawReason),
    /// The given side attempted an illegal move and loses.
    IllegalMove(Color),
    /// The given side ran out of time and loses.
    Timeout(Color),
}

impl GameResult {
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::Checkmate { winner } => Some(winner),
            GameResult::IllegalMove(loser) | GameResult::Timeout(loser) => Some(loser.opposite()),
            GameResult::Draw(_) => None,
        }
    }

    pub fn is_draw(self) -> bool {
        matches!(self, GameResult::Draw(_))
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Checkmate { winner } => write!(f, "{} wins by checkmate", winner),
            GameResult::Draw(reason) => write!(f, "draw by {}", reason),
            GameResult::IllegalMove(loser) => write!(f, "{} loses by illegal move", loser),
            GameResult::Timeout(loser) => write!(f, "{} loses on time", loser),
        }
    }
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// 100 half-moves without a pawn move or capture.
    FiftyMoveRule,
    /// The same position occurred three times in the played game.
    ThreefoldRepetition,
    /// Neither side can deliver mate.
    InsufficientMaterial,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::FiftyMoveRule => "fifty-move rule",
            DrawReason::ThreefoldRepetition => "threefold repetition",
            DrawReason::InsufficientMaterial => "insufficient material",
        })
    }
}

/// Returns the result if the game is over, checking mate and stalemate,
/// then the fifty-move rule, threefold repetition and insufficient material.
pub fn game_result(position: &Position) -> Option<GameResult> {
    if position.legal_moves(false).is_empty() {
        return Some(if position.is_in_check() {
            GameResult::Checkmate {
                winner: position.side_to_move().opposite(),
            }
        } else {
            GameResult::Draw(DrawReason::Stalemate)
        });
    }
    if position.is_fifty_move_draw() {
        return Some(GameResult::Draw(DrawReason::FiftyMoveRule));
    }
    if position.is_threefold_repetition() {
        return Some(GameResult::Draw(DrawReason::ThreefoldRepetition));
    }
    if position.has_insufficient_material() {
        return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(fen: &str) -> Option<GameResult> {
        game_result(&Position::from_fen(fen).unwrap())
    }

    #[test]
    fn checkmate_names_the_winner() {
        // Fool's mate.
        let r = result("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(r, Some(GameResult::Checkmate { winner: Color::Black }));
        assert_eq!(r.and_then(GameResult::winner), Some(Color::Black));
    }

    #[test]
    fn stalemate_is_a_draw() {
        let r = result("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(r, Some(GameResult::Draw(DrawReason::Stalemate)));
    }

    #[test]
    fn fifty_move_rule_triggers_at_one_hundred() {
        assert_eq!(result("4k3/8/8/8/8/8/R7/4K3 w - - 99 80"), None);
        assert_eq!(
            result("4k3/8/8/8/8/8/R7/4K3 w - - 100 80"),
            Some(GameResult::Draw(DrawReason::FiftyMoveRule))
        );
    }

    #[test]
    fn mate_outranks_the_fifty_move_rule() {
        let r = result("R5k1/5ppp/8/8/8/8/8/6K1 b - - 100 90");
        assert_eq!(r, Some(GameResult::Checkmate { winner: Color::White }));
    }

    #[test]
    fn bare_kings_are_insufficient() {
        assert_eq!(
            result("4k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Some(GameResult::Draw(DrawReason::InsufficientMaterial))
        );
    }

    #[test]
    fn threefold_needs_played_moves() {
        let mut position = Position::startpos();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        for _ in 0..2 {
            for uci in shuffle {
                let m = crate::uci::parse_move(&position, uci).unwrap();
                position.play_move(m);
            }
        }
        assert_eq!(position.repetition_count(), 3);
        assert_eq!(
            game_result(&position),
            Some(GameResult::Draw(DrawReason::ThreefoldRepetition))
        );
    }

    #[test]
    fn results_display_for_humans() {
        assert_eq!(
            GameResult::Draw(DrawReason::FiftyMoveRule).to_string(),
            "draw by fifty-move rule"
        );
        assert_eq!(GameResult::IllegalMove(Color::White).winner(), Some(Color::Black));
    }
}
