//! Error types for file store operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during `FileStore` operations.
#[derive(Error, Debug)]
pub enum FileStoreError {
    /// Reading a list or backup file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A list or backup file holds bytes that are not UTF-8.
    #[error("{} is not valid UTF-8", .path.display())]
    NotUtf8 {
        /// File with the undecodable contents.
        path: PathBuf,
    },

    /// Writing a list or backup file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A list path has no file name to derive the backup name from.
    #[error("list path has no file name: {}", .0.display())]
    InvalidPath(PathBuf),
}
