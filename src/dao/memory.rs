//! In-memory data source ordered by position

use super::{Dao, DaoResult, Page, SortOrderKey};

/// Zero-based position of an element in a `MemoryDao`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionKey(pub usize);

impl SortOrderKey for PositionKey {
    fn where_clause_for_next_batch(&self) -> String {
        format!("position > {}", self.0)
    }
}

/// A `Dao` over a vector, usable with any context type
#[derive(Debug, Clone, Default)]
pub struct MemoryDao<M> {
    models: Vec<M>,
}

impl<M> MemoryDao<M> {
    /// Wraps `models`, which define the ordering
    pub fn new(models: Vec<M>) -> Self {
        Self { models }
    }

    /// Number of elements held
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the source holds no elements
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn page_from(&self, start: usize, batch_size: usize) -> Page<M, PositionKey>
    where
        M: Clone,
    {
        let start = start.min(self.models.len());
        let end = start.saturating_add(batch_size).min(self.models.len());
        let models = self.models[start..end].to_vec();
        let last_key = if end > start {
            Some(PositionKey(end - 1))
        } else {
            None
        };
        Page::new(models, last_key, end == self.models.len())
    }
}

impl<M> FromIterator<M> for MemoryDao<M> {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<M: Clone, C> Dao<C> for MemoryDao<M> {
    type Model = M;
    type Key = PositionKey;

    fn read_all(&self, _context: &C) -> DaoResult<Vec<M>> {
        Ok(self.models.clone())
    }

    fn first_batch(&self, _context: &C, batch_size: usize) -> DaoResult<Page<M, PositionKey>> {
        Ok(self.page_from(0, batch_size))
    }

    fn next_batch(
        &self,
        _context: &C,
        prev_last_key: &PositionKey,
        batch_size: usize,
    ) -> DaoResult<Page<M, PositionKey>> {
        Ok(self.page_from(prev_last_key.0 + 1, batch_size))
    }
}
