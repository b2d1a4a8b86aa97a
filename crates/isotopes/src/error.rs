//! Result and Error types for nucdiff-isotopes

/// Type alias for Result<T, isotopes::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `nucdiff-isotopes` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream: {0}")]
    IOError(#[from] std::io::Error),

    #[error("failed to (de)serialise")]
    FailedSerde(#[from] serde_json::Error),

    #[error("unable to parse isotope: {0}")]
    ParseError(String),
}
