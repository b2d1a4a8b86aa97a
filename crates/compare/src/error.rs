//! Result and Error types for the compare module

// standard library
use std::path::PathBuf;

// nucdiff modules
use nucdiff_series::SeriesHeader;

/// Type alias for `Result<T, compare::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `nucdiff-compare`
pub enum Error {
    /// Failure reading or decoding one of the series
    #[error("failure in series operation: {0}")]
    Series(#[from] nucdiff_series::Error),

    /// Underlying file I/O error
    #[error("failure in file I/O: {0}")]
    IOError(#[from] std::io::Error),

    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    /// An input series could not be opened
    #[error("could not open {path:?}")]
    OpenFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The two series do not share the same dimensions
    #[error("dimensions do not match ({name_1}: {header_1}, {name_2}: {header_2})")]
    HeaderMismatch {
        name_1: String,
        header_1: SeriesHeader,
        name_2: String,
        header_2: SeriesHeader,
    },

    /// The progress bar could not be initialised
    #[error("failed to initialise progress bar: {0}")]
    ProgressBar(String),

    /// Failure reported by a renderer or animation collaborator
    #[error("render failed: {0}")]
    Render(String),
}
