//! Round bookkeeping: phase, score and the countdown clock.

use serde::{Deserialize, Serialize};

/// Whether a round is currently being played.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundPhase {
    Idle,
    Running { started_at: f64 },
}

/// Score and clock of the current (or last) round.
///
/// Times are seconds on whatever monotonic clock the driver uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    phase: RoundPhase,
    score: u32,
    time_budget: f64,
    rounds_played: u32,
}

impl RoundState {
    pub fn new(time_budget: f64) -> Self {
        Self {
            phase: RoundPhase::Idle,
            score: 0,
            time_budget,
            rounds_played: 0,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, RoundPhase::Running { .. })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Begins a new round at `now` with the score back at zero.
    pub fn start(&mut self, now: f64) {
        self.phase = RoundPhase::Running { started_at: now };
        self.score = 0;
        self.rounds_played += 1;
    }

    /// Seconds since the round started; zero between rounds.
    pub fn elapsed(&self, now: f64) -> f64 {
        match self.phase {
            RoundPhase::Running { started_at } => (now - started_at).max(0.0),
            RoundPhase::Idle => 0.0,
        }
    }

    pub fn remaining(&self, now: f64) -> f64 {
        self.time_budget - self.elapsed(now)
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.is_running() && self.elapsed(now) > self.time_budget
    }

    /// Counts a matched target. With `refill_clock` the round clock restarts.
    pub fn record_match(&mut self, now: f64, refill_clock: bool) -> u32 {
        self.score += 1;
        if refill_clock {
            if let RoundPhase::Running { started_at } = &mut self.phase {
                *started_at = now;
            }
        }
        self.score
    }

    /// Ends the round and returns the final score, which stays readable.
    pub fn finish(&mut self) -> u32 {
        self.phase = RoundPhase::Idle;
        self.score
    }
}
