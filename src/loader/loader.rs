//! Batch-fetching loader over a `Dao`
//!
//! The loader owns one append-only buffer. Construction fetches the first
//! page (or everything, with paging disabled); iterators extend the buffer one
//! fetch at a time as they run past its end.

use std::cell::{Ref, RefCell};
use std::fmt;

use crate::dao::{Dao, SortOrderKey};
use crate::observability::{log_event, Event, FetchKind, LoaderMeters, Logger, Severity};

use super::errors::{FetchOp, LoaderError, LoaderResult};
use super::iter::LoaderIter;

/// Batch size that disables paging: everything is fetched in one call
pub const NO_LAZY_LOAD_BATCH_SIZE: usize = 0;

/// Empty, non-last pages in a row after which `load_all` stops fetching
pub const MAX_CONSECUTIVE_EMPTY_BATCHES: usize = 16;

/// Whether any further fetch can happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// More pages may exist
    HasMore,
    /// A last page or the full set arrived. No fetch will ever be issued again.
    Exhausted,
}

struct LoadState<M, K> {
    models: Vec<M>,
    /// Trailing key of the most recent page
    last_key: Option<K>,
    is_all_loaded: bool,
    fetches: usize,
}

/// A forward-only, lazily fetched sequence of `D::Model`.
///
/// The loader is single-threaded (`!Sync`). Any number of iterators may be
/// taken from it; they share the buffer and keep private read positions.
pub struct LazyLoader<C, D: Dao<C>> {
    dao: D,
    context: C,
    batch_size: usize,
    meters: LoaderMeters,
    state: RefCell<LoadState<D::Model, D::Key>>,
}

impl<C, D: Dao<C>> LazyLoader<C, D> {
    /// Creates a loader and performs the initial fetch.
    ///
    /// `batch_size == NO_LAZY_LOAD_BATCH_SIZE` loads the whole set with
    /// `Dao::read_all`. Otherwise the first page is requested. If that fetch
    /// fails no loader is returned.
    pub fn new(context: C, dao: D, batch_size: usize, meters: LoaderMeters) -> LoaderResult<Self> {
        let loader = Self {
            dao,
            context,
            batch_size,
            meters,
            state: RefCell::new(LoadState {
                models: Vec::new(),
                last_key: None,
                is_all_loaded: false,
                fetches: 0,
            }),
        };

        loader.fetch_more()?;

        if Logger::enabled(Severity::Trace) {
            let state = loader.state.borrow();
            log_event(
                Event::LoaderInit,
                &[
                    ("all_loaded", if state.is_all_loaded { "true" } else { "false" }),
                    ("batch_size", &batch_size.to_string()),
                    ("buffered", &state.models.len().to_string()),
                ],
            );
        }

        Ok(loader)
    }

    /// Creates a loader that reports to no meters
    pub fn unmetered(context: C, dao: D, batch_size: usize) -> LoaderResult<Self> {
        Self::new(context, dao, batch_size, LoaderMeters::none())
    }

    /// True iff nothing is buffered right now.
    ///
    /// With paging enabled this says nothing about pages not fetched yet.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().models.is_empty()
    }

    /// True once the last page or the full set has been fetched
    pub fn is_all_loaded(&self) -> bool {
        self.state.borrow().is_all_loaded
    }

    pub fn phase(&self) -> LoadPhase {
        if self.is_all_loaded() {
            LoadPhase::Exhausted
        } else {
            LoadPhase::HasMore
        }
    }

    /// Number of elements fetched so far
    pub fn buffered_len(&self) -> usize {
        self.state.borrow().models.len()
    }

    /// Borrow the elements fetched so far.
    ///
    /// The guard must be released before iterating further, since iteration
    /// may append to the buffer.
    pub fn buffered(&self) -> Ref<'_, [D::Model]> {
        Ref::map(self.state.borrow(), |state| state.models.as_slice())
    }

    /// Number of data source calls issued, including the initial one
    pub fn fetch_count(&self) -> usize {
        self.state.borrow().fetches
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn is_paging_enabled(&self) -> bool {
        self.batch_size != NO_LAZY_LOAD_BATCH_SIZE
    }

    /// Context passed to every fetch
    pub fn context(&self) -> &C {
        &self.context
    }

    /// A fresh iterator starting at the first buffered element.
    ///
    /// See `LoaderIter::has_next` for how an empty intermediate page ends a
    /// pass early.
    pub fn iter(&self) -> LoaderIter<'_, C, D> {
        LoaderIter::new(self)
    }

    /// Fetches until the source reports its last page, then returns a copy of
    /// every element.
    ///
    /// Unlike iteration, an empty intermediate page does not stop this early.
    /// After `MAX_CONSECUTIVE_EMPTY_BATCHES` empty pages in a row without a
    /// last page, it gives up with `LoaderError::Stalled`. Everything fetched
    /// so far stays buffered.
    pub fn load_all(&self) -> LoaderResult<Vec<D::Model>>
    where
        D::Model: Clone,
    {
        let mut empty_batches = 0;
        while !self.is_all_loaded() {
            if self.fetch_more()? > 0 {
                empty_batches = 0;
                continue;
            }
            if self.is_all_loaded() {
                break;
            }
            empty_batches += 1;
            if empty_batches >= MAX_CONSECUTIVE_EMPTY_BATCHES {
                return Err(LoaderError::Stalled { empty_batches });
            }
        }
        Ok(self.buffered().to_vec())
    }

    /// Issues one fetch and appends its elements. Returns how many arrived.
    ///
    /// No-op once everything is loaded.
    pub(crate) fn fetch_more(&self) -> LoaderResult<usize> {
        let mut state = self.state.borrow_mut();
        if state.is_all_loaded {
            return Ok(0);
        }
        let loaded = self.load_next_batch(&mut state)?;
        let count = loaded.len();
        state.models.extend(loaded);
        Ok(count)
    }

    fn load_next_batch(&self, state: &mut LoadState<D::Model, D::Key>) -> LoaderResult<Vec<D::Model>> {
        state.fetches += 1;

        if !self.is_paging_enabled() {
            let models = self
                .dao
                .read_all(&self.context)
                .map_err(|e| LoaderError::source_failed(FetchOp::ReadAll, e))?;
            state.is_all_loaded = true;
            self.meters.record(FetchKind::Unlazy);
            self.trace_fetch(Event::FullFetch, models.len(), state);
            return Ok(models);
        }

        let page = match state.last_key.as_ref() {
            None => self
                .dao
                .first_batch(&self.context, self.batch_size)
                .map_err(|e| LoaderError::source_failed(FetchOp::FirstBatch, e))?,
            Some(key) => self
                .dao
                .next_batch(&self.context, key, self.batch_size)
                .map_err(|e| LoaderError::source_failed(FetchOp::NextBatch, e))?,
        };

        state.is_all_loaded = page.is_last_batch;
        // Replaced by every page. An empty page carries no key, so the next
        // fetch starts over with `first_batch`.
        state.last_key = page.last_key;

        let kind = if state.is_all_loaded {
            FetchKind::LastBatch
        } else {
            FetchKind::Batch
        };
        self.meters.record(kind);

        if page.models.is_empty() && !state.is_all_loaded {
            log_event(
                Event::EmptyIntermediateBatch,
                &[
                    ("batch_size", &self.batch_size.to_string()),
                    ("buffered", &state.models.len().to_string()),
                ],
            );
        } else {
            let event = match kind {
                FetchKind::LastBatch => Event::LastBatchFetch,
                _ => Event::BatchFetch,
            };
            self.trace_fetch(event, page.models.len(), state);
        }

        Ok(page.models)
    }

    fn trace_fetch(&self, event: Event, models: usize, state: &LoadState<D::Model, D::Key>) {
        if !Logger::enabled(Severity::Trace) {
            return;
        }
        let next = state
            .last_key
            .as_ref()
            .map(|k| k.where_clause_for_next_batch())
            .unwrap_or_default();
        log_event(
            event,
            &[
                ("buffered", &state.models.len().to_string()),
                ("models", &models.to_string()),
                ("next", &next),
            ],
        );
    }
}

/// `for model in &loader` drives a fresh `LoaderIter`.
///
/// The iterator is not fused. If the source returns an empty page that is not
/// the last one, the loop ends there even though the loader still reports
/// `LoadPhase::HasMore`; a later pass fetches again, restarting at the first
/// page. Use `load_all` to read to the true end.
impl<'a, C, D> IntoIterator for &'a LazyLoader<C, D>
where
    D: Dao<C>,
    D::Model: Clone,
{
    type Item = LoaderResult<D::Model>;
    type IntoIter = LoaderIter<'a, C, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<C, D: Dao<C>> fmt::Debug for LazyLoader<C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("LazyLoader")
            .field("batch_size", &self.batch_size)
            .field("buffered", &state.models.len())
            .field("last_key", &state.last_key)
            .field("is_all_loaded", &state.is_all_loaded)
            .field("fetches", &state.fetches)
            .finish()
    }
}
