//! Run metrics and logging setup.
//!
//! Counters are keyed by event name and updated from the tick loop; a
//! periodic `info!` line reports throughput.

use evolarium_data::SimEvent;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Ticks between throughput log lines.
const LOG_EVERY: u64 = 1000;

pub struct Metrics {
    tick_count: AtomicU64,
    alive_count: AtomicU64,
    food_count: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("tick_count", &self.tick_count())
            .field("alive_count", &self.alive_count())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            alive_count: AtomicU64::new(0),
            food_count: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, alive: usize, food: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.alive_count.store(alive as u64, Ordering::Relaxed);
        self.food_count.store(food as u64, Ordering::Relaxed);

        if tick % LOG_EVERY == 0 {
            tracing::info!(
                tick = tick,
                alive = alive,
                food = food,
                duration_us = duration.as_micros() as u64,
                tps = self.ticks_per_second(),
                "Simulation tick"
            );
        }
    }

    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Counts an event under its variant name.
    pub fn record_event(&self, event: &SimEvent) {
        self.increment_counter(event_name(event));
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn alive_count(&self) -> u64 {
        self.alive_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn food_count(&self) -> u64 {
        self.food_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    #[must_use]
    pub fn ticks_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.tick_count() as f64 / secs
        } else {
            0.0
        }
    }
}

/// Stable counter key of an event.
#[must_use]
pub fn event_name(event: &SimEvent) -> &'static str {
    match event {
        SimEvent::GenerationStarted { .. } => "generation_started",
        SimEvent::AgentDied { .. } => "agent_died",
        SimEvent::FoodEaten { .. } => "food_eaten",
        SimEvent::PotionConsumed { .. } => "potion_consumed",
        SimEvent::ToolPickedUp { .. } => "tool_picked_up",
        SimEvent::StructureDamaged { .. } => "structure_damaged",
        SimEvent::StructureDestroyed { .. } => "structure_destroyed",
        SimEvent::KeyCollected { .. } => "key_collected",
        SimEvent::DoorStruck { .. } => "door_struck",
        SimEvent::DoorOpened { .. } => "door_opened",
        SimEvent::ChestOpened { .. } => "chest_opened",
        SimEvent::GenerationEnded { .. } => "generation_ended",
        SimEvent::RandomRestart { .. } => "random_restart",
        SimEvent::ImmigrantsInjected { .. } => "immigrants_injected",
    }
}

/// Installs a global fmt subscriber. `RUST_LOG` overrides the default
/// `info` level. Safe to call more than once.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_record_tick() {
        let metrics = Metrics::new();
        metrics.record_tick(Duration::from_millis(2), 30, 40);
        assert_eq!(metrics.tick_count(), 1);
        assert_eq!(metrics.alive_count(), 30);
        assert_eq!(metrics.food_count(), 40);
    }

    #[test]
    fn test_event_counters() {
        let metrics = Metrics::new();
        let event = SimEvent::FoodEaten {
            tick: 1,
            agent: Uuid::nil(),
        };
        metrics.record_event(&event);
        metrics.record_event(&event);
        assert_eq!(metrics.counter("food_eaten"), 2);
        assert_eq!(metrics.counter("agent_died"), 0);
    }
}
