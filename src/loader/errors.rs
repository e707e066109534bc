//! Loader error types
//!
//! Error codes:
//! - LAZY_SOURCE_FAILED (ERROR)
//! - LAZY_OUT_OF_RANGE (FATAL, caller bug)
//! - LAZY_SOURCE_STALLED (ERROR)

use std::fmt;

use thiserror::Error;

use crate::dao::DaoError;
use crate::observability::Severity;

/// Which data source call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOp {
    /// `Dao::read_all`
    ReadAll,
    /// `Dao::first_batch`
    FirstBatch,
    /// `Dao::next_batch`
    NextBatch,
}

impl FetchOp {
    /// Returns the operation name
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchOp::ReadAll => "read_all",
            FetchOp::FirstBatch => "first_batch",
            FetchOp::NextBatch => "next_batch",
        }
    }
}

impl fmt::Display for FetchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Loader errors
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The data source failed. The original error is kept as `source()`.
    #[error("{op} failed: {source}")]
    Source {
        op: FetchOp,
        #[source]
        source: DaoError,
    },

    /// An element was requested past the end of the buffer
    #[error("index {index} out of range for {len} buffered models")]
    OutOfRange { index: usize, len: usize },

    /// The source kept returning empty pages without ever reporting a last one
    #[error("source returned {empty_batches} empty pages in a row without a last page")]
    Stalled { empty_batches: usize },
}

impl LoaderError {
    /// Wrap a data source failure
    pub fn source_failed(op: FetchOp, source: DaoError) -> Self {
        LoaderError::Source { op, source }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LoaderError::Source { .. } => "LAZY_SOURCE_FAILED",
            LoaderError::OutOfRange { .. } => "LAZY_OUT_OF_RANGE",
            LoaderError::Stalled { .. } => "LAZY_SOURCE_STALLED",
        }
    }

    /// Out-of-range access is a programming error, not a runtime condition
    pub fn severity(&self) -> Severity {
        match self {
            LoaderError::Source { .. } | LoaderError::Stalled { .. } => Severity::Error,
            LoaderError::OutOfRange { .. } => Severity::Fatal,
        }
    }

    /// Failed data source call, if this is a source failure
    pub fn op(&self) -> Option<FetchOp> {
        match self {
            LoaderError::Source { op, .. } => Some(*op),
            LoaderError::OutOfRange { .. } | LoaderError::Stalled { .. } => None,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, LoaderError::OutOfRange { .. })
    }
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;
