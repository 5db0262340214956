use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::{self, Duration, MissedTickBehavior};

use crate::error::{Result, SourceError};

/// Outcome of a single scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The cycle ran and succeeded
    Completed,
    /// The cycle ran and returned an error
    Failed,
    /// The cycle did not finish within the cycle timeout
    TimedOut,
    /// Polling is paused
    Paused,
    /// The previous cycle is still in flight
    Skipped,
}

/// Fixed-interval poll scheduler with pause/resume control.
///
/// Ticks never queue: a tick that fires while the previous cycle is still
/// running is dropped. Resuming fires one tick immediately and restarts the
/// interval from there.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    cycle_timeout: Duration,
    paused: Arc<AtomicBool>,
    in_flight: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

/// Clears the in-flight flag even if the cycle panics.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Scheduler {
    pub fn new(interval: Duration, cycle_timeout: Duration) -> Self {
        Self {
            interval,
            cycle_timeout,
            paused: Arc::new(AtomicBool::new(false)),
            in_flight: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
        }
    }

    pub fn pause(&self) {
        if !self.paused.swap(true, Ordering::SeqCst) {
            tracing::info!("Polling paused");
        }
    }

    pub fn resume(&self) {
        if self.paused.swap(false, Ordering::SeqCst) {
            tracing::info!("Polling resumed");
            self.wake.notify_one();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Runs one cycle unless paused or another cycle is in flight.
    pub async fn tick<F>(&self, cycle: F) -> TickOutcome
    where
        F: Future<Output = Result<()>>,
    {
        if self.is_paused() {
            return TickOutcome::Paused;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Previous poll still in flight, skipping");
            return TickOutcome::Skipped;
        }
        let _guard = InFlightGuard(&self.in_flight);

        match time::timeout(self.cycle_timeout, cycle).await {
            Ok(Ok(())) => TickOutcome::Completed,
            Ok(Err(e)) => {
                tracing::error!("Poll cycle failed: {:?}", e);
                TickOutcome::Failed
            }
            Err(_) => {
                let error = SourceError::Timeout(self.cycle_timeout.as_secs());
                tracing::error!("{}", error);
                TickOutcome::TimedOut
            }
        }
    }

    /// Ticks forever. Each cycle runs on its own task so a slow cycle never
    /// delays the interval; overlapping ticks are skipped by the guard.
    pub async fn run<F, Fut>(&self, cycle: F)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.wake.notified() => {
                    ticker.reset();
                }
            }

            let scheduler = self.clone();
            let future = cycle();
            tokio::spawn(async move {
                let outcome = scheduler.tick(future).await;
                tracing::trace!(?outcome, "Tick finished");
            });
        }
    }
}
