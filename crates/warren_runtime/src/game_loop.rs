//! The fixed-interval tick driver.
//!
//! One logical task repeats `world.tick()` on a fixed delay. A tick
//! always completes (entity steps, feature callbacks, transitions)
//! before the next is scheduled, so no two ticks ever overlap. The loop
//! has no natural end; it stops only through its [`StopHandle`] (the
//! explicit stop flag, checked before every reschedule) or an optional
//! tick budget for embedding and tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use warren_engine::World;
use warren_foundation::Result;

/// Default delay between ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(30);

/// Cancels a running [`GameLoop`] from anywhere.
#[derive(Clone, Debug)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Raises the stop flag. The loop exits before its next reschedule.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether the flag has been raised.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fixed-interval scheduler for a world's tick loop.
#[derive(Debug)]
pub struct GameLoop {
    interval: Duration,
    stop: Arc<AtomicBool>,
    tick_budget: Option<u64>,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLoop {
    /// Creates a loop with the default 30 ms interval and no budget.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            stop: Arc::new(AtomicBool::new(false)),
            tick_budget: None,
        }
    }

    /// Sets the delay between ticks.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Bounds the number of ticks the loop will run.
    #[must_use]
    pub fn with_tick_budget(mut self, ticks: u64) -> Self {
        self.tick_budget = Some(ticks);
        self
    }

    /// A handle that can stop this loop.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop))
    }

    /// Initializes the world, then ticks it until the stop flag is
    /// raised or the tick budget runs out.
    ///
    /// # Errors
    /// Propagates [`World::init`] failures; the loop itself never
    /// fails.
    pub fn run(&self, world: &mut World) -> Result<()> {
        world.init()?;
        tracing::info!(interval = ?self.interval, "game loop started");

        let mut remaining = self.tick_budget;
        loop {
            if self.stop.load(Ordering::Relaxed) {
                break;
            }
            if remaining == Some(0) {
                break;
            }

            let report = world.tick();
            if !report.rooms_failed.is_empty() {
                tracing::warn!(failed = report.rooms_failed.len(), "load failures this tick");
            }
            if let Some(left) = remaining.as_mut() {
                *left -= 1;
            }

            // Re-check before rescheduling so a stop (or an exhausted
            // budget) never costs one more interval of sleep.
            if self.stop.load(Ordering::Relaxed) || remaining == Some(0) {
                break;
            }
            thread::sleep(self.interval);
        }

        tracing::info!(ticks = world.tick_count(), "game loop stopped");
        Ok(())
    }
}
