//! One-second countdown.
//!
//! The countdown does not own a clock: callers pass `now` into `start`,
//! `resume` and `poll`, and `poll` returns the ticks that fell due. It runs
//! independently of the audio position; drift between the two is accepted.

use std::time::{Duration, Instant};

use thiserror::Error;

pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    #[error("duration must be a positive number of seconds")]
    InvalidDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining: u64 },
    /// Emitted once, right after the tick that reaches zero.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Stopped,
    Running { next_tick: Instant },
    Paused,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u64,
    phase: Phase,
}

impl Countdown {
    /// A stopped countdown showing `duration_secs`.
    pub fn new(duration_secs: u64) -> Self {
        Self {
            remaining: duration_secs,
            phase: Phase::Stopped,
        }
    }

    pub fn start(&mut self, duration_secs: u64, now: Instant) -> Result<(), TimerError> {
        if duration_secs == 0 {
            return Err(TimerError::InvalidDuration);
        }
        self.remaining = duration_secs;
        self.phase = Phase::Running {
            next_tick: now + TICK,
        };
        Ok(())
    }

    pub fn pause(&mut self) {
        if matches!(self.phase, Phase::Running { .. }) {
            self.phase = Phase::Paused;
        }
    }

    /// Continue from the remaining count; the next tick is a full second away.
    pub fn resume(&mut self, now: Instant) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running {
                next_tick: now + TICK,
            };
        }
    }

    /// Stop and show `duration_secs` again without starting.
    pub fn reset(&mut self, duration_secs: u64) -> Result<(), TimerError> {
        if duration_secs == 0 {
            return Err(TimerError::InvalidDuration);
        }
        self.remaining = duration_secs;
        self.phase = Phase::Stopped;
        Ok(())
    }

    /// Stop ticking, keeping the remaining count.
    pub fn stop(&mut self) {
        if self.phase != Phase::Completed {
            self.phase = Phase::Stopped;
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Emit every tick due at `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Phase::Running { next_tick } = self.phase {
            if now < next_tick {
                break;
            }
            self.remaining = self.remaining.saturating_sub(1);
            events.push(TimerEvent::Tick {
                remaining: self.remaining,
            });
            if self.remaining == 0 {
                self.phase = Phase::Completed;
                events.push(TimerEvent::Complete);
            } else {
                self.phase = Phase::Running {
                    next_tick: next_tick + TICK,
                };
            }
        }
        events
    }
}
