use std::path::PathBuf;

/// Everything that can stop a plate (or the whole batch).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid worker count {0}, need at least one worker")]
    InvalidWorkerCount(usize),

    #[error("{path}:{line}: malformed job record: {reason}")]
    Manifest {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: truncated snapshot, could not read {what}")]
    Truncated { path: PathBuf, what: &'static str },

    #[error("plate is {rows}x{cols}, need at least 3x3")]
    Dimensions { rows: usize, cols: usize },

    #[error("could not allocate {what} ({count} elements)")]
    Allocation { what: &'static str, count: usize },

    #[error("could not start worker {worker}: {source}")]
    ThreadSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),

    #[error("synchronization failed: {0}")]
    Synchronization(&'static str),

    #[error("{path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attach a path to an I/O error.
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
