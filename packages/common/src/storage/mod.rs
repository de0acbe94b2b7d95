mod error;
mod locate;
mod traits;

pub mod memory;
pub mod s3;

pub use error::StorageError;
pub use locate::locate_output;
pub use traits::{DEFAULT_SIGNED_URL_TTL_SECS, ObjectStore, is_external_ref};
