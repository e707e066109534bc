//! Rate meters and the meter manager the loader reports to
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, lock-free on the increment path

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;

/// A named event counter.
///
/// Cloning yields another handle to the same counter.
#[derive(Clone)]
pub struct RateMeter {
    name: Arc<str>,
    count: Arc<AtomicU64>,
}

impl RateMeter {
    /// Create a standalone meter starting at zero
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Meter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add `amount` events
    pub fn mark(&self, amount: u64) {
        self.count.fetch_add(amount, Ordering::Relaxed);
    }

    /// Events recorded so far
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for RateMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateMeter")
            .field("name", &self.name)
            .field("count", &self.count())
            .finish()
    }
}

/// Sink for fetch events. Purely observational.
pub trait MeterManager {
    /// Increment `meter` by `amount`
    fn increment_rate_meter(&self, meter: &RateMeter, amount: u64);
}

/// Discards every increment
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMeterManager;

impl MeterManager for NoopMeterManager {
    fn increment_rate_meter(&self, _meter: &RateMeter, _amount: u64) {}
}

/// Registry of named meters
///
/// Meters are created on first request and live as long as the registry.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    meters: Mutex<BTreeMap<String, RateMeter>>,
    increments: AtomicU64,
}

impl MetricsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or register the meter called `name`
    pub fn meter(&self, name: &str) -> RateMeter {
        let mut meters = self.meters.lock().unwrap_or_else(|e| e.into_inner());
        meters
            .entry(name.to_string())
            .or_insert_with(|| RateMeter::new(name))
            .clone()
    }

    /// Count of a registered meter, zero if unknown
    pub fn count(&self, name: &str) -> u64 {
        let meters = self.meters.lock().unwrap_or_else(|e| e.into_inner());
        meters.get(name).map(RateMeter::count).unwrap_or(0)
    }

    /// Number of increments routed through this registry
    pub fn increments(&self) -> u64 {
        self.increments.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every meter
    pub fn snapshot(&self) -> MetricsSnapshot {
        let meters = self.meters.lock().unwrap_or_else(|e| e.into_inner());
        MetricsSnapshot {
            meters: meters
                .iter()
                .map(|(name, meter)| (name.clone(), meter.count()))
                .collect(),
        }
    }

    /// Snapshot rendered as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        self.snapshot().to_json()
    }
}

impl MeterManager for MetricsRegistry {
    fn increment_rate_meter(&self, meter: &RateMeter, amount: u64) {
        meter.mark(amount);
        self.increments.fetch_add(1, Ordering::Relaxed);
    }
}

/// A point-in-time copy of all meters, ordered by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricsSnapshot {
    pub meters: BTreeMap<String, u64>,
}

impl MetricsSnapshot {
    /// Count for `name`, zero if absent
    pub fn get(&self, name: &str) -> u64 {
        self.meters.get(name).copied().unwrap_or(0)
    }

    /// Snapshot as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
