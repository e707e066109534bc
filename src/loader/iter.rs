//! Forward-only iteration over a `LazyLoader`
//!
//! `has_next` is fallible because it may fetch. `Iterator::next` turns a
//! failed fetch into `Some(Err(_))` and yields nothing afterwards.

use crate::dao::Dao;

use super::errors::{LoaderError, LoaderResult};
use super::loader::LazyLoader;

/// Read position into a loader's shared buffer
pub struct LoaderIter<'a, C, D: Dao<C>> {
    loader: &'a LazyLoader<C, D>,
    position: usize,
    failed: bool,
}

impl<'a, C, D: Dao<C>> LoaderIter<'a, C, D> {
    pub(crate) fn new(loader: &'a LazyLoader<C, D>) -> Self {
        Self {
            loader,
            position: 0,
            failed: false,
        }
    }

    /// Index of the next element this iterator will return
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether an element is available at the current position.
    ///
    /// When the buffer is used up and the loader is not exhausted, exactly one
    /// fetch is issued before answering. A page that arrives empty without
    /// being the last one therefore yields `false` here; a later call fetches
    /// again.
    pub fn has_next(&mut self) -> LoaderResult<bool> {
        if self.position < self.loader.buffered_len() {
            return Ok(true);
        }
        if self.loader.is_all_loaded() {
            return Ok(false);
        }
        self.loader.fetch_more()?;
        Ok(self.position < self.loader.buffered_len())
    }

    /// Element at the current position; advances by one.
    ///
    /// Never fetches. Fails with `OutOfRange` unless a preceding `has_next`
    /// returned `true`.
    pub fn next_model(&mut self) -> LoaderResult<D::Model>
    where
        D::Model: Clone,
    {
        let buffered = self.loader.buffered();
        let model = buffered
            .get(self.position)
            .cloned()
            .ok_or(LoaderError::OutOfRange {
                index: self.position,
                len: buffered.len(),
            })?;
        self.position += 1;
        Ok(model)
    }
}

impl<C, D> Iterator for LoaderIter<'_, C, D>
where
    D: Dao<C>,
    D::Model: Clone,
{
    type Item = LoaderResult<D::Model>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.has_next() {
            Ok(true) => Some(self.next_model()),
            Ok(false) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.loader.buffered_len().saturating_sub(self.position);
        if self.loader.is_all_loaded() {
            (remaining, Some(remaining))
        } else {
            (remaining, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dao::MemoryDao;
    use crate::loader::{LazyLoader, NO_LAZY_LOAD_BATCH_SIZE};

    fn dao(n: i32) -> MemoryDao<i32> {
        (1..=n).collect()
    }

    #[test]
    fn test_has_next_does_not_fetch_within_buffer() {
        let loader = LazyLoader::unmetered((), dao(13), 5).unwrap();
        let mut iter = loader.iter();
        for _ in 0..5 {
            assert!(iter.has_next().unwrap());
            iter.next_model().unwrap();
        }
        assert_eq!(loader.fetch_count(), 1);

        assert!(iter.has_next().unwrap());
        assert_eq!(loader.fetch_count(), 2);
        assert_eq!(iter.position(), 5);
    }

    #[test]
    fn test_next_model_without_has_next_fails() {
        let loader = LazyLoader::unmetered((), dao(0), 5).unwrap();
        let err = loader.iter().next_model().unwrap_err();
        assert!(err.is_out_of_range());

        let loader = LazyLoader::unmetered((), dao(0), NO_LAZY_LOAD_BATCH_SIZE).unwrap();
        let err = loader.iter().next_model().unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn test_next_model_never_fetches() {
        let loader = LazyLoader::unmetered((), dao(13), 5).unwrap();
        let mut iter = loader.iter();
        for _ in 0..5 {
            iter.next_model().unwrap();
        }
        assert!(iter.next_model().unwrap_err().is_out_of_range());
        assert_eq!(loader.fetch_count(), 1);
    }

    #[test]
    fn test_size_hint() {
        let loader = LazyLoader::unmetered((), dao(13), 5).unwrap();
        assert_eq!(loader.iter().size_hint(), (5, None));

        let loader = LazyLoader::unmetered((), dao(13), NO_LAZY_LOAD_BATCH_SIZE).unwrap();
        assert_eq!(loader.iter().size_hint(), (13, Some(13)));
    }
}
