//! Begin/complete logging around a unit of work
//!
//! - `{NAME}_BEGIN` on creation
//! - `{NAME}_COMPLETE` with `elapsed_ms` on `complete`
//! - `{NAME}_FAILED` on `fail`
//! - `{NAME}_INCOMPLETE` if dropped without either

use std::time::Instant;

use super::logger::Logger;

/// A scope that logs its own start and outcome
///
/// ```ignore
/// let scope = ObservationScope::new("SCAN");
/// // ... iterate ...
/// scope.complete(&[("models", "13")]);
/// ```
pub struct ObservationScope {
    name: String,
    started: Instant,
    finished: bool,
}

impl ObservationScope {
    /// Open a scope and log `{name}_BEGIN`
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_fields(name, &[])
    }

    /// Open a scope and log `{name}_BEGIN` with fields
    pub fn with_fields(name: impl Into<String>, fields: &[(&str, &str)]) -> Self {
        let name = name.into();
        Logger::info(&format!("{}_BEGIN", name), fields);
        Self {
            name,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Milliseconds since the scope was opened
    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    /// Log `{name}_COMPLETE` with the given fields and the elapsed time
    pub fn complete(mut self, fields: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.elapsed_ms().to_string();
        let mut all_fields: Vec<(&str, &str)> = fields.to_vec();
        all_fields.push(("elapsed_ms", &elapsed));
        Logger::info(&format!("{}_COMPLETE", self.name), &all_fields);
    }

    /// Log `{name}_FAILED` at ERROR
    pub fn fail(mut self, reason: &str) {
        self.finished = true;
        Logger::error(&format!("{}_FAILED", self.name), &[("reason", reason)]);
    }

    /// Whether `complete` or `fail` has been called
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without outcome")],
            );
        }
    }
}
