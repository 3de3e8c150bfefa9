//! Couples a countdown with its tick source.

use kitchenquest_core::error::DomainError;
use kitchenquest_directives::TimerDirective;
use tokio::sync::mpsc;
use tracing::debug;

use super::tick_source::{TickSource, TimerTick};
use crate::domain::countdown::{CountdownTimer, StartOutcome, TickOutcome, TimerState};

/// Owns the countdown for the current step and the single tick source
/// that feeds it.
///
/// Every time ticking stops the generation moves on, so ticks that were
/// already queued for an earlier run are ignored.
#[derive(Debug)]
pub struct TimerDriver {
    timer: CountdownTimer,
    source: TickSource,
    generation: u64,
}

impl TimerDriver {
    /// Creates a driver with no directive, delivering ticks into `ticks`.
    #[must_use]
    pub fn new(ticks: mpsc::Sender<TimerTick>) -> Self {
        Self {
            timer: CountdownTimer::armed(None),
            source: TickSource::new(ticks),
            generation: 0,
        }
    }

    /// Current countdown state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.timer.state()
    }

    /// Directive of the current countdown.
    #[must_use]
    pub fn directive(&self) -> Option<&TimerDirective> {
        self.timer.directive()
    }

    /// Replaces the countdown with a fresh, stopped one for `directive`.
    pub fn arm(&mut self, directive: Option<TimerDirective>) {
        self.stop_ticking();
        self.timer = CountdownTimer::armed(directive);
        debug!(
            generation = self.generation,
            remaining_seconds = self.timer.state().remaining_seconds,
            "timer armed"
        );
    }

    /// Starts the countdown.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` when the countdown cannot start.
    pub fn start(&mut self) -> Result<StartOutcome, DomainError> {
        let outcome = self.timer.start()?;
        self.source.start(self.generation);
        Ok(outcome)
    }

    /// Pauses the countdown.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless running.
    pub fn pause(&mut self) -> Result<(), DomainError> {
        self.timer.pause()?;
        self.stop_ticking();
        Ok(())
    }

    /// Restarts an expired countdown at full duration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless expired.
    pub fn restart(&mut self) -> Result<(), DomainError> {
        self.timer.restart()?;
        self.source.start(self.generation);
        Ok(())
    }

    /// Applies a tick from the source. Ticks from an earlier generation
    /// are ignored.
    pub fn on_tick(&mut self, tick: TimerTick) -> TickOutcome {
        if tick.generation != self.generation {
            return TickOutcome::Ignored;
        }
        let outcome = self.timer.tick();
        if outcome == TickOutcome::Expired {
            self.stop_ticking();
            debug!("timer expired");
        }
        outcome
    }

    /// Stops any ticking without touching the countdown state.
    pub fn cancel(&mut self) {
        self.stop_ticking();
    }

    fn stop_ticking(&mut self) {
        self.source.cancel();
        self.generation = self.generation.wrapping_add(1);
    }
}
