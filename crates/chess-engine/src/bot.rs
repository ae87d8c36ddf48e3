//! The boundary between a game and whatever picks its moves.

use crate::Position;
use chess_core::Move;
use std::time::{Duration, Instant};

/// A player's clock.
///
/// `remaining` is what was left when the current turn began; the time spent
/// so far this turn is measured from `turn_start`.
#[derive(Debug, Clone)]
pub struct Timer {
    starting: Duration,
    remaining: Duration,
    turn_start: Instant,
}

impl Timer {
    /// A clock with `milliseconds` on it whose first turn starts now.
    pub fn new(milliseconds: u64) -> Self {
        Self::from_duration(Duration::from_millis(milliseconds))
    }

    pub fn from_duration(starting: Duration) -> Self {
        Timer {
            starting,
            remaining: starting,
            turn_start: Instant::now(),
        }
    }

    pub fn starting_milliseconds(&self) -> u64 {
        self.starting.as_millis() as u64
    }

    /// Time left on the clock, never below zero.
    pub fn milliseconds_remaining(&self) -> u64 {
        self.remaining
            .saturating_sub(self.turn_start.elapsed())
            .as_millis() as u64
    }

    pub fn milliseconds_elapsed_this_turn(&self) -> u64 {
        self.turn_start.elapsed().as_millis() as u64
    }

    pub fn is_flagged(&self) -> bool {
        self.turn_start.elapsed() >= self.remaining
    }

    /// Restarts the turn clock without touching the remaining time.
    pub fn start_turn(&mut self) {
        self.turn_start = Instant::now();
    }

    /// Charges the time spent this turn and returns it.
    pub fn end_turn(&mut self) -> Duration {
        let spent = self.turn_start.elapsed();
        self.remaining = self.remaining.saturating_sub(spent);
        self.turn_start = Instant::now();
        spent
    }
}

/// Anything that can pick a move.
///
/// The position is the bot's own copy, so it may make and undo moves on it
/// freely. Closures of the right shape are bots.
pub trait Bot {
    fn choose_move(&mut self, position: &mut Position, timer: &Timer) -> Move;
}

impl<F> Bot for F
where
    F: FnMut(&mut Position, &Timer) -> Move,
{
    fn choose_move(&mut self, position: &mut Position, timer: &Timer) -> Move {
        self(position, timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn fresh_timer_has_its_full_budget() {
        let timer = Timer::new(60_000);
        assert_eq!(timer.starting_milliseconds(), 60_000);
        assert!(timer.milliseconds_remaining() <= 60_000);
        assert!(timer.milliseconds_remaining() > 59_000);
        assert!(!timer.is_flagged());
    }

    #[test]
    fn ending_a_turn_charges_the_clock() {
        let mut timer = Timer::new(1_000);
        thread::sleep(Duration::from_millis(20));
        assert!(timer.milliseconds_elapsed_this_turn() >= 20);
        let spent = timer.end_turn();
        assert!(spent >= Duration::from_millis(20));
        assert!(timer.milliseconds_remaining() <= 980);
        assert!(timer.milliseconds_elapsed_this_turn() < 20);
    }

    #[test]
    fn fractions_of_a_millisecond_still_count() {
        let timer = Timer::from_duration(Duration::from_millis(50) + Duration::from_micros(900));
        assert_eq!(timer.starting_milliseconds(), 50);
        assert!(!timer.is_flagged());
    }

    #[test]
    fn empty_clock_is_flagged_and_clamped() {
        let timer = Timer::new(0);
        assert!(timer.is_flagged());
        assert_eq!(timer.milliseconds_remaining(), 0);
    }

    #[test]
    fn closures_are_bots() {
        let mut first_move = |position: &mut Position, _: &Timer| position.legal_moves(false)[0];
        let mut position = Position::startpos();
        let m = first_move.choose_move(&mut position, &Timer::new(1_000));
        assert!(position.legal_moves(false).contains(m));
    }
}
