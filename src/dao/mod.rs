//! Data source contract consumed by the loader
//!
//! A `Dao` hands out either the whole result set in one call or one page at a
//! time. Pages are chained by the `SortOrderKey` of their last element.
//!
//! # Contract
//!
//! - Chained pages are gap-free and duplicate-free
//! - `is_last_batch` is true iff nothing exists beyond the page
//! - `batch_size` is an upper bound, not a promise

mod memory;

pub use memory::{MemoryDao, PositionKey};

use std::fmt;

/// Error type a `Dao` reports failures with
pub type DaoError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for data source calls
pub type DaoResult<T> = Result<T, DaoError>;

/// Opaque position in a backend ordering
pub trait SortOrderKey: fmt::Debug {
    /// Backend predicate meaning "ordered strictly after this key"
    fn where_clause_for_next_batch(&self) -> String;
}

/// One page returned by a paged fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<M, K> {
    /// Elements in backend order
    pub models: Vec<M>,
    /// Key of the last element, `None` when `models` is empty
    pub last_key: Option<K>,
    /// Nothing exists after this page
    pub is_last_batch: bool,
}

impl<M, K> Page<M, K> {
    /// Creates a page
    pub fn new(models: Vec<M>, last_key: Option<K>, is_last_batch: bool) -> Self {
        Self {
            models,
            last_key,
            is_last_batch,
        }
    }

    /// An empty final page
    pub fn empty_last() -> Self {
        Self::new(Vec::new(), None, true)
    }

    /// Number of elements in the page
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the page holds no elements
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// A collection-producing backend, parameterized by the caller's context type.
///
/// The context is opaque to the loader and passed through unchanged.
pub trait Dao<C> {
    /// Element type
    type Model;
    /// Cursor type chaining pages together
    type Key: SortOrderKey;

    /// Complete ordered result set. Only used when paging is disabled.
    fn read_all(&self, context: &C) -> DaoResult<Vec<Self::Model>>;

    /// First page, from the beginning of the ordering
    fn first_batch(&self, context: &C, batch_size: usize) -> DaoResult<Page<Self::Model, Self::Key>>;

    /// Page of elements ordered strictly after `prev_last_key`
    fn next_batch(
        &self,
        context: &C,
        prev_last_key: &Self::Key,
        batch_size: usize,
    ) -> DaoResult<Page<Self::Model, Self::Key>>;
}

impl<C, D: Dao<C> + ?Sized> Dao<C> for &D {
    type Model = D::Model;
    type Key = D::Key;

    fn read_all(&self, context: &C) -> DaoResult<Vec<Self::Model>> {
        (**self).read_all(context)
    }

    fn first_batch(&self, context: &C, batch_size: usize) -> DaoResult<Page<Self::Model, Self::Key>> {
        (**self).first_batch(context, batch_size)
    }

    fn next_batch(
        &self,
        context: &C,
        prev_last_key: &Self::Key,
        batch_size: usize,
    ) -> DaoResult<Page<Self::Model, Self::Key>> {
        (**self).next_batch(context, prev_last_key, batch_size)
    }
}
