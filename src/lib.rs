//! lazyloader - a deferred, cursor-paginated sequence over a pluggable data source
//!
//! A [`LazyLoader`] fetches its first page on construction and further pages
//! only as iteration runs past what is buffered. With a batch size of
//! [`NO_LAZY_LOAD_BATCH_SIZE`] the whole set is fetched in one call instead.
//!
//! ```
//! use lazyloader::{LazyLoader, LoaderMeters, MemoryDao};
//!
//! let dao: MemoryDao<u32> = (1..=13).collect();
//! let loader = LazyLoader::new((), dao, 5, LoaderMeters::none()).unwrap();
//! assert!(!loader.is_all_loaded());
//!
//! let all: Vec<u32> = loader.iter().collect::<Result<_, _>>().unwrap();
//! assert_eq!(all, (1..=13).collect::<Vec<u32>>());
//! assert!(loader.is_all_loaded());
//! ```

pub mod cli;
pub mod config;
pub mod dao;
pub mod loader;
pub mod observability;

pub use config::{ConfigError, LoaderConfig};
pub use dao::{Dao, DaoError, DaoResult, MemoryDao, Page, PositionKey, SortOrderKey};
pub use loader::{
    FetchOp, LazyLoader, LoadPhase, LoaderError, LoaderIter, LoaderResult,
    MAX_CONSECUTIVE_EMPTY_BATCHES, NO_LAZY_LOAD_BATCH_SIZE,
};
pub use observability::{LoaderMeters, MeterManager, MetricsRegistry, NoopMeterManager, RateMeter};
