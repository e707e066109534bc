//! The three fetch-event meters a loader reports to

use std::fmt;
use std::sync::Arc;

use super::metrics::{MeterManager, MetricsRegistry, RateMeter};

/// Which kind of fetch just happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Paging disabled, whole set fetched
    Unlazy,
    /// Page that reported itself as the last one
    LastBatch,
    /// Page with more to come
    Batch,
}

/// Optional meter manager plus optional meters for each `FetchKind`.
///
/// Any missing piece turns the corresponding increment into a no-op.
#[derive(Clone, Default)]
pub struct LoaderMeters {
    manager: Option<Arc<dyn MeterManager>>,
    unlazy_load: Option<RateMeter>,
    lazy_load_last_batch: Option<RateMeter>,
    lazy_load_batch: Option<RateMeter>,
}

impl LoaderMeters {
    /// No manager, no meters
    pub fn none() -> Self {
        Self::default()
    }

    /// Explicit manager and meters
    pub fn new(
        manager: Arc<dyn MeterManager>,
        unlazy_load: Option<RateMeter>,
        lazy_load_last_batch: Option<RateMeter>,
        lazy_load_batch: Option<RateMeter>,
    ) -> Self {
        Self {
            manager: Some(manager),
            unlazy_load,
            lazy_load_last_batch,
            lazy_load_batch,
        }
    }

    /// Meters registered in `registry` as `{prefix}.unlazy_load`,
    /// `{prefix}.lazy_load_last_batch` and `{prefix}.lazy_load_batch`
    pub fn registered(registry: Arc<MetricsRegistry>, prefix: &str) -> Self {
        let unlazy_load = registry.meter(&format!("{}.unlazy_load", prefix));
        let lazy_load_last_batch = registry.meter(&format!("{}.lazy_load_last_batch", prefix));
        let lazy_load_batch = registry.meter(&format!("{}.lazy_load_batch", prefix));
        Self::new(
            registry,
            Some(unlazy_load),
            Some(lazy_load_last_batch),
            Some(lazy_load_batch),
        )
    }

    /// Meter for `kind`, if configured
    pub fn meter(&self, kind: FetchKind) -> Option<&RateMeter> {
        match kind {
            FetchKind::Unlazy => self.unlazy_load.as_ref(),
            FetchKind::LastBatch => self.lazy_load_last_batch.as_ref(),
            FetchKind::Batch => self.lazy_load_batch.as_ref(),
        }
    }

    /// Record one fetch of `kind`
    pub fn record(&self, kind: FetchKind) {
        if let (Some(manager), Some(meter)) = (self.manager.as_ref(), self.meter(kind)) {
            manager.increment_rate_meter(meter, 1);
        }
    }
}

impl fmt::Debug for LoaderMeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderMeters")
            .field("manager", &self.manager.is_some())
            .field("unlazy_load", &self.unlazy_load)
            .field("lazy_load_last_batch", &self.lazy_load_last_batch)
            .field("lazy_load_batch", &self.lazy_load_batch)
            .finish()
    }
}
