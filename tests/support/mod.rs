//! Test data sources shared by the loader integration tests
//!
//! - `IntDao`: 1..=n, optionally doubled through its context
//! - `ScriptedDao`: replays fixed pages and records every call
//! - failure injection on any call number

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;

use lazyloader::{Dao, DaoError, DaoResult, Page, SortOrderKey};

// =============================================================================
// Keys
// =============================================================================

/// Key holding the value of the last element of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntSortOrderKey(pub i64);

impl SortOrderKey for IntSortOrderKey {
    fn where_clause_for_next_batch(&self) -> String {
        format!("`col01` > {}", self.0)
    }
}

// =============================================================================
// IntDao
// =============================================================================

/// Context understood by `IntDao`
#[derive(Debug, Clone, Copy, Default)]
pub struct IntContext {
    pub double_result: bool,
}

/// Source of 1..=n ordered by value
pub struct IntDao {
    models: Vec<i64>,
    calls: RefCell<Vec<Call>>,
    fail_on_call: Cell<Option<usize>>,
}

/// One recorded data source call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ReadAll,
    FirstBatch { batch_size: usize },
    NextBatch { after: i64, batch_size: usize },
}

#[derive(Debug)]
pub struct InjectedFailure(pub usize);

impl fmt::Display for InjectedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "injected failure on call {}", self.0)
    }
}

impl std::error::Error for InjectedFailure {}

impl IntDao {
    pub fn new(element_count: i64) -> Self {
        Self {
            models: (1..=element_count).collect(),
            calls: RefCell::new(Vec::new()),
            fail_on_call: Cell::new(None),
        }
    }

    /// Make the `n`th call (1-based) fail
    pub fn failing_on_call(self, n: usize) -> Self {
        self.fail_on_call.set(Some(n));
        self
    }

    /// Stop injecting failures
    pub fn heal(&self) {
        self.fail_on_call.set(None);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, call: Call) -> DaoResult<()> {
        let mut calls = self.calls.borrow_mut();
        calls.push(call);
        let n = calls.len();
        if self.fail_on_call.get() == Some(n) {
            return Err(Box::new(InjectedFailure(n)));
        }
        Ok(())
    }

    fn apply(&self, context: &IntContext, models: &[i64]) -> Vec<i64> {
        if context.double_result {
            models.iter().map(|m| m * 2).collect()
        } else {
            models.to_vec()
        }
    }

    fn page_from(&self, context: &IntContext, start: usize, batch_size: usize) -> Page<i64, IntSortOrderKey> {
        let start = start.min(self.models.len());
        let end = (start + batch_size).min(self.models.len());
        let slice = &self.models[start..end];
        let last_key = slice.last().map(|v| IntSortOrderKey(*v));
        Page::new(self.apply(context, slice), last_key, end == self.models.len())
    }
}

impl Dao<IntContext> for IntDao {
    type Model = i64;
    type Key = IntSortOrderKey;

    fn read_all(&self, context: &IntContext) -> DaoResult<Vec<i64>> {
        self.record(Call::ReadAll)?;
        Ok(self.apply(context, &self.models))
    }

    fn first_batch(&self, context: &IntContext, batch_size: usize) -> DaoResult<Page<i64, IntSortOrderKey>> {
        self.record(Call::FirstBatch { batch_size })?;
        Ok(self.page_from(context, 0, batch_size))
    }

    fn next_batch(
        &self,
        context: &IntContext,
        prev_last_key: &IntSortOrderKey,
        batch_size: usize,
    ) -> DaoResult<Page<i64, IntSortOrderKey>> {
        self.record(Call::NextBatch {
            after: prev_last_key.0,
            batch_size,
        })?;
        let start = self
            .models
            .iter()
            .position(|m| *m == prev_last_key.0)
            .map(|i| i + 1)
            .unwrap_or(self.models.len());
        Ok(self.page_from(context, start, batch_size))
    }
}

// =============================================================================
// ScriptedDao
// =============================================================================

/// Replays a fixed sequence of pages regardless of the cursor it is given
pub struct ScriptedDao {
    pages: RefCell<VecDeque<Page<i64, IntSortOrderKey>>>,
    seen_keys: RefCell<Vec<Option<IntSortOrderKey>>>,
}

impl ScriptedDao {
    pub fn new(pages: Vec<Page<i64, IntSortOrderKey>>) -> Self {
        Self {
            pages: RefCell::new(pages.into()),
            seen_keys: RefCell::new(Vec::new()),
        }
    }

    /// Cursor passed on each paged call, `None` for `first_batch`
    pub fn seen_keys(&self) -> Vec<Option<IntSortOrderKey>> {
        self.seen_keys.borrow().clone()
    }

    fn pop(&self) -> DaoResult<Page<i64, IntSortOrderKey>> {
        self.pages
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| DaoError::from("script exhausted"))
    }
}

impl Dao<()> for ScriptedDao {
    type Model = i64;
    type Key = IntSortOrderKey;

    fn read_all(&self, _context: &()) -> DaoResult<Vec<i64>> {
        Ok(self.pop()?.models)
    }

    fn first_batch(&self, _context: &(), _batch_size: usize) -> DaoResult<Page<i64, IntSortOrderKey>> {
        self.seen_keys.borrow_mut().push(None);
        self.pop()
    }

    fn next_batch(
        &self,
        _context: &(),
        prev_last_key: &IntSortOrderKey,
        _batch_size: usize,
    ) -> DaoResult<Page<i64, IntSortOrderKey>> {
        self.seen_keys.borrow_mut().push(Some(*prev_last_key));
        self.pop()
    }
}

/// Page of `models` keyed by its last element
pub fn page(models: &[i64], is_last_batch: bool) -> Page<i64, IntSortOrderKey> {
    Page::new(
        models.to_vec(),
        models.last().map(|v| IntSortOrderKey(*v)),
        is_last_batch,
    )
}

/// Drain a loader iterator, panicking on the first error
pub fn collect_ok<I: Iterator<Item = lazyloader::LoaderResult<i64>>>(iter: I) -> Vec<i64> {
    iter.map(|r| r.expect("iteration failed")).collect()
}
