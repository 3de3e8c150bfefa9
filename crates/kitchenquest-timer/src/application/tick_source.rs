//! One-second tick source.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::debug;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A tick tagged with the generation of the countdown it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    /// Generation the tick was scheduled for.
    pub generation: u64,
}

/// Sends one [`TimerTick`] per second while active. At most one task is
/// ever running; the task is aborted on cancel and on drop.
#[derive(Debug)]
pub struct TickSource {
    ticks: mpsc::Sender<TimerTick>,
    task: Option<JoinHandle<()>>,
}

impl TickSource {
    /// Creates an inactive source that delivers into `ticks`.
    #[must_use]
    pub fn new(ticks: mpsc::Sender<TimerTick>) -> Self {
        Self { ticks, task: None }
    }

    /// Returns true while a tick task is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Starts ticking for `generation`. Returns false, changing nothing,
    /// when a tick task is already running.
    pub fn start(&mut self, generation: u64) -> bool {
        if self.is_active() {
            return false;
        }

        let ticks = self.ticks.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            loop {
                interval.tick().await;
                if ticks.send(TimerTick { generation }).await.is_err() {
                    break;
                }
            }
        }));
        debug!(generation, "tick source started");
        true
    }

    /// Stops ticking. Ticks already queued are not recalled.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("tick source cancelled");
        }
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut mpsc::Receiver<TimerTick>) -> Vec<TimerTick> {
        let mut ticks = Vec::new();
        while let Ok(tick) = rx.try_recv() {
            ticks.push(tick);
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_second() {
        // Arrange
        let (tx, mut rx) = mpsc::channel(16);
        let mut source = TickSource::new(tx);

        // Act
        assert!(source.start(7));
        tokio::time::sleep(Duration::from_millis(3500)).await;

        // Assert
        assert_eq!(drain(&mut rx), vec![TimerTick { generation: 7 }; 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_is_refused() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut source = TickSource::new(tx);

        assert!(source.start(1));
        assert!(!source.start(2));
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(drain(&mut rx), vec![TimerTick { generation: 1 }; 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut source = TickSource::new(tx);
        source.start(1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        source.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(drain(&mut rx).len(), 1);
        assert!(!source.is_active());
    }
}
