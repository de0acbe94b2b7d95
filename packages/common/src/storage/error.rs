use thiserror::Error;

/// Errors that can occur against the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The store rejected the request or the transport failed.
    #[error("storage transport error: {0}")]
    Transport(String),

    /// The store could not be constructed from its configuration.
    #[error("storage configuration error: {0}")]
    Config(String),
}
