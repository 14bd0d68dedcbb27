use thiserror::Error;

/// Result type for CXN operations
pub type Result<T> = std::result::Result<T, CxnError>;

/// Errors that can occur when talking to a CXN player
#[derive(Error, Debug)]
pub enum CxnError {
    /// HTTP transport error (connect, DNS, non-2xx status)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration rejected before any request was made
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Display name is not present in the source catalog
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// Source catalog has not been fetched from the device yet
    #[error("Source catalog not ready")]
    CatalogNotReady,
}
