//! Observable loader events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events emitted while loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Loader lifecycle
    /// Loader constructed, initial fetch done
    LoaderInit,
    /// Whole result set fetched in one call
    FullFetch,
    /// Intermediate page fetched
    BatchFetch,
    /// Final page fetched
    LastBatchFetch,
    /// Source returned no elements but did not report the last page
    EmptyIntermediateBatch,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // CLI
    /// Input file read into memory
    InputLoaded,
}

impl Event {
    /// Returns the event name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::LoaderInit => "LOADER_INIT",
            Event::FullFetch => "FULL_FETCH",
            Event::BatchFetch => "BATCH_FETCH",
            Event::LastBatchFetch => "LAST_BATCH_FETCH",
            Event::EmptyIntermediateBatch => "EMPTY_INTERMEDIATE_BATCH",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::InputLoaded => "INPUT_LOADED",
        }
    }

    /// Whether this event indicates a source inconsistency
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::EmptyIntermediateBatch)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
