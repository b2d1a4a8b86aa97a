//! Result and Error types for the series module

/// Type alias for `Result<T, series::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `nucdiff-series`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O: {0}")]
    IOError(#[from] std::io::Error),

    /// Failure to (de)serialise the binary header
    #[error("failed binary (de)serialization")]
    FailedBinaryOp(#[from] Box<bincode::ErrorKind>),

    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    JSONError(#[from] serde_json::Error),

    /// Header dimensions that can not describe a grid
    #[error("invalid grid dimensions (dim_n {dim_n:?}, dim_z {dim_z:?})")]
    InvalidDimensions { dim_n: i64, dim_z: i64 },

    /// A `timestep` line without an integer block index
    #[error("invalid block header at line {line:?}: \"{content}\"")]
    InvalidBlockHeader { line: usize, content: String },

    /// Grid shape does not agree with the series header
    #[error("unexpected grid shape (expected {expected:?}, found {found:?})")]
    UnexpectedGridShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Number of grid values does not match the grid shape
    #[error("unexpected number of grid values (expected {expected:?}, found {found:?})")]
    UnexpectedValueCount { expected: usize, found: usize },

    /// The progress bar could not be initialised
    #[error("failed to initialise progress bar: {0}")]
    ProgressBar(String),
}
