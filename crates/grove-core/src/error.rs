//! Error taxonomy for a structural comparison

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of one comparison. There is no recoverable class: any of
/// these aborts the invocation and no partial result is produced.
#[derive(Debug, Error)]
pub enum Error {
    /// A node's location names a file that is not in the input set.
    #[error("source file not found in input set: {path}")]
    MissingSourceFile { path: PathBuf },

    /// A node's span does not fit inside its file's text.
    #[error("span {begin}..{end} out of bounds for {path} ({len} bytes)")]
    SpanOutOfBounds {
        path: PathBuf,
        begin: usize,
        end: usize,
        len: usize,
    },

    /// The external parser rejected the input; surfaced unchanged.
    #[error("parse failed")]
    Parse(#[source] anyhow::Error),
}
