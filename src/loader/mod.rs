//! Lazy, cursor-paginated loading
//!
//! # Flow
//!
//! 1. Construction fetches the first page (or the whole set when paging is
//!    disabled) before returning
//! 2. Iterators read the shared buffer from position 0
//! 3. An iterator that runs past the buffer triggers exactly one fetch
//! 4. The first page reported as last ends all fetching for good
//!
//! # Invariants
//!
//! - The buffer only grows, in the order the source returned elements
//! - Once all loaded, no fetch is ever issued again
//! - The context is passed unchanged to every fetch

mod errors;
mod iter;
mod loader;

pub use errors::{FetchOp, LoaderError, LoaderResult};
pub use iter::LoaderIter;
pub use loader::{LazyLoader, LoadPhase, MAX_CONSECUTIVE_EMPTY_BATCHES, NO_LAZY_LOAD_BATCH_SIZE};
