//! Error types shared by the hashing core and the dictionary-attack driver.

use std::path::PathBuf;

/// Everything that can go wrong while hashing or cracking.
///
/// None of these are retryable: hashing is deterministic, so an input that
/// fails once fails the same way every time.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An append would push a block past its fixed capacity.
    #[error("block overflow: {len} bytes + {additional} would exceed capacity of {capacity}")]
    CapacityViolation {
        len: usize,
        additional: usize,
        capacity: usize,
    },

    /// A salt that is not exactly 8 printable ASCII bytes free of `$` and space.
    #[error("invalid salt: {reason}")]
    InvalidSalt { reason: String },

    /// A shadow line that does not look like `username:$1$salt$hash`.
    #[error("invalid shadow file entry on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A dictionary line that cannot be used as a candidate password.
    #[error("invalid dictionary word on line {line}: {reason}")]
    MalformedDictionaryEntry { line: usize, reason: String },

    #[error("too many dictionary words (limit is {limit})")]
    TooManyWords { limit: usize },

    #[cfg(feature = "parallel")]
    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
