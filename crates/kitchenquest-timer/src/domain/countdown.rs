//! The countdown state machine.

use kitchenquest_core::error::DomainError;
use kitchenquest_directives::TimerDirective;
use serde::Serialize;

/// Countdown phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimerPhase {
    /// Not counting. Remaining time is preserved.
    Stopped,
    /// Counting down once per second.
    Running,
    /// Reached zero while running.
    Expired,
}

/// Snapshot of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerState {
    /// Seconds left; never negative.
    pub remaining_seconds: u32,
    /// Current phase.
    pub phase: TimerPhase,
}

impl TimerState {
    /// Returns true while counting down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }
}

/// Result of a successful `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The countdown began.
    Started,
    /// It was already running; nothing changed.
    AlreadyRunning,
}

/// Result of feeding one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running.
    Ignored,
    /// One second elapsed; this many remain.
    Counting(u32),
    /// The countdown just reached zero. Reported once per run.
    Expired,
}

/// Countdown for a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    directive: Option<TimerDirective>,
    state: TimerState,
}

impl CountdownTimer {
    /// A stopped countdown at the directive's full duration, or at zero
    /// when the step has no directive.
    #[must_use]
    pub fn armed(directive: Option<TimerDirective>) -> Self {
        let remaining_seconds = directive
            .as_ref()
            .map_or(0, TimerDirective::duration_seconds);
        Self {
            directive,
            state: TimerState {
                remaining_seconds,
                phase: TimerPhase::Stopped,
            },
        }
    }

    /// The directive this countdown was armed with.
    #[must_use]
    pub fn directive(&self) -> Option<&TimerDirective> {
        self.directive.as_ref()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Full duration in seconds.
    #[must_use]
    pub fn full_duration(&self) -> u32 {
        self.directive
            .as_ref()
            .map_or(0, TimerDirective::duration_seconds)
    }

    /// Starts counting. Starting a running countdown changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` when nothing remains or the
    /// countdown has expired.
    pub fn start(&mut self) -> Result<StartOutcome, DomainError> {
        match self.state.phase {
            TimerPhase::Running => Ok(StartOutcome::AlreadyRunning),
            TimerPhase::Expired => Err(DomainError::invalid_state("start timer", "expired")),
            TimerPhase::Stopped if self.state.remaining_seconds == 0 => {
                Err(DomainError::invalid_state("start timer", "no time remaining"))
            }
            TimerPhase::Stopped => {
                self.state.phase = TimerPhase::Running;
                Ok(StartOutcome::Started)
            }
        }
    }

    /// Stops counting, keeping the remaining time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless running.
    pub fn pause(&mut self) -> Result<(), DomainError> {
        if self.state.phase != TimerPhase::Running {
            return Err(DomainError::invalid_state("pause timer", self.describe()));
        }
        self.state.phase = TimerPhase::Stopped;
        Ok(())
    }

    /// Resets to the full duration and runs again.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless expired.
    pub fn restart(&mut self) -> Result<(), DomainError> {
        if self.state.phase != TimerPhase::Expired {
            return Err(DomainError::invalid_state("restart timer", self.describe()));
        }
        self.state = TimerState {
            remaining_seconds: self.full_duration(),
            phase: TimerPhase::Running,
        };
        Ok(())
    }

    /// Counts one elapsed second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.phase != TimerPhase::Running {
            return TickOutcome::Ignored;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds == 0 {
            self.state.phase = TimerPhase::Expired;
            return TickOutcome::Expired;
        }
        TickOutcome::Counting(self.state.remaining_seconds)
    }

    fn describe(&self) -> &'static str {
        match self.state.phase {
            TimerPhase::Stopped => "stopped",
            TimerPhase::Running => "running",
            TimerPhase::Expired => "expired",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(minutes: u32) -> Option<TimerDirective> {
        Some(TimerDirective {
            minutes,
            label: "SIMMER".to_owned(),
        })
    }

    #[test]
    fn test_armed_is_stopped_at_full_duration() {
        let timer = CountdownTimer::armed(directive(3));
        assert_eq!(
            timer.state(),
            TimerState {
                remaining_seconds: 180,
                phase: TimerPhase::Stopped,
            }
        );
    }

    #[test]
    fn test_start_without_directive_is_invalid() {
        // Arrange
        let mut timer = CountdownTimer::armed(None);

        // Act
        let result = timer.start();

        // Assert
        assert!(matches!(
            result,
            Err(DomainError::InvalidState {
                operation: "start timer",
                ..
            })
        ));
        assert_eq!(timer.state().phase, TimerPhase::Stopped);
    }

    #[test]
    fn test_start_twice_is_a_no_op() {
        let mut timer = CountdownTimer::armed(directive(1));

        assert_eq!(timer.start(), Ok(StartOutcome::Started));
        assert_eq!(timer.start(), Ok(StartOutcome::AlreadyRunning));
        assert_eq!(timer.tick(), TickOutcome::Counting(59));
    }

    #[test]
    fn test_pause_preserves_remaining() {
        let mut timer = CountdownTimer::armed(directive(1));
        timer.start().unwrap();
        timer.tick();
        timer.tick();

        timer.pause().unwrap();

        assert_eq!(timer.state().remaining_seconds, 58);
        assert_eq!(timer.tick(), TickOutcome::Ignored);
        assert!(timer.pause().is_err());
    }

    #[test]
    fn test_tick_clamps_and_expires_once() {
        // Arrange
        let mut timer = CountdownTimer::armed(directive(1));
        timer.start().unwrap();
        for _ in 0..59 {
            timer.tick();
        }
        assert_eq!(
            timer.state(),
            TimerState {
                remaining_seconds: 1,
                phase: TimerPhase::Running,
            }
        );

        // Act
        let last = timer.tick();
        let after = timer.tick();

        // Assert
        assert_eq!(last, TickOutcome::Expired);
        assert_eq!(after, TickOutcome::Ignored);
        assert_eq!(
            timer.state(),
            TimerState {
                remaining_seconds: 0,
                phase: TimerPhase::Expired,
            }
        );
    }

    #[test]
    fn test_restart_only_from_expired() {
        let mut timer = CountdownTimer::armed(directive(1));
        assert!(timer.restart().is_err());
        timer.start().unwrap();
        for _ in 0..60 {
            timer.tick();
        }
        assert!(matches!(timer.start(), Err(DomainError::InvalidState { .. })));

        timer.restart().unwrap();

        assert_eq!(
            timer.state(),
            TimerState {
                remaining_seconds: 60,
                phase: TimerPhase::Running,
            }
        );
    }
}
