//! Observability for the loader
//!
//! This module provides:
//! - Structured logging (JSON lines)
//! - Rate meters and the `MeterManager` sink
//! - Typed loader events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Nothing here influences control flow in the loader
//! 3. No async or background threads
//! 4. An absent meter manager is tolerated silently
//!
//! # Usage
//!
//! ```ignore
//! use lazyloader::observability::{Logger, MetricsRegistry, LoaderMeters};
//!
//! Logger::info("SCAN_BEGIN", &[("input", "data.json")]);
//!
//! let registry = std::sync::Arc::new(MetricsRegistry::new());
//! let meters = LoaderMeters::registered(registry.clone(), "users");
//! ```

mod events;
mod logger;
mod meters;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use meters::{FetchKind, LoaderMeters};
pub use metrics::{MeterManager, MetricsRegistry, MetricsSnapshot, NoopMeterManager, RateMeter};
pub use scope::ObservationScope;

/// Log a loader event with fields
///
/// Warning events are logged at WARN, everything else at TRACE.
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Trace
    };
    Logger::log(severity, event.as_str(), fields);
}
