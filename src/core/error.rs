use thiserror::Error;

/// Failure kinds shared by the upstream fetchers. Every variant renders to a
/// human-readable message; tools fold these into the error envelope rather
/// than propagating a fault to the dispatcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A caller-supplied date string did not match DD-MM-YYYY.
    #[error("Invalid date format for {0}. Use DD-MM-YYYY")]
    InvalidDateFormat(&'static str),
    /// A source row carried a value that does not fit the declared column.
    #[error("Malformed data: {0}")]
    MalformedData(String),
    /// Network/transport failure or a non-success upstream status.
    #[error("Connection error: {0}")]
    SourceUnavailable(String),
    /// The upstream body could not be decoded.
    #[error("Invalid JSON response: {0}")]
    InvalidResponseFormat(String),
    /// Unstructured fallback carrying the raw error text.
    #[error("{0}")]
    Other(String),
}
