use std::time::Duration;

use common::storage::StorageError;
use thiserror::Error;

/// Errors from the generative provider client and output materialization.
#[derive(Debug, Error)]
pub enum GenaiError {
    /// The model produced no usable output. Carries the model-reported
    /// finish reason when one was present, for diagnosability.
    #[error("model returned no usable output (finish reason: {finish_reason})")]
    NoOutput { finish_reason: String },

    /// The provider reported a failure. The message is passed through
    /// verbatim; these are never retried automatically.
    #[error("provider error: {0}")]
    Provider(String),

    /// A long-running job exceeded the configured maximum wait.
    #[error("operation {operation} did not complete within {waited:?}")]
    Timeout { operation: String, waited: Duration },

    /// A completed job's output could not be found in the object store
    /// after the bounded search was exhausted.
    #[error("could not locate generated output under {prefix}")]
    OutputNotLocated { prefix: String },

    /// The model's reply could not be parsed as the expected JSON shape.
    #[error("failed to parse model output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("provider transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
