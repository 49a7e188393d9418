//! Metrics collection for the simulation.
//!
//! Provides structured logging and counters for monitoring simulation
//! progress and health.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Metrics collector for simulation statistics.
pub struct Metrics {
    tick_count: AtomicU64,
    insect_count: AtomicU64,
    plant_count: AtomicU64,
    counters: Mutex<HashMap<String, u64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Creates a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            insect_count: AtomicU64::new(0),
            plant_count: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, insects: usize, plants: usize) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.insect_count.store(insects as u64, Ordering::Relaxed);
        self.plant_count.store(plants as u64, Ordering::Relaxed);

        // Log at info level every 100 ticks
        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick % 100 == 0 {
            tracing::info!(
                tick = tick,
                insects = insects,
                plants = plants,
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *counters.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Gets the current value of a named counter.
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.get(name).copied().unwrap_or(0)
    }

    /// Gets the current tick count.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    /// Gets the last recorded live insect count.
    #[must_use]
    pub fn insect_count(&self) -> u64 {
        self.insect_count.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}
