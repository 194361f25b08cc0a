//! Errors produced while generating a node config.
use std::{io, path::PathBuf};

/// Failure of a single config generation run. None of them are recoverable:
/// the run is aborted at the point of detection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing command line input.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// Node index outside of `[0, cluster_size)`.
    #[error("node index {index} is out of range for a cluster of {cluster_size} nodes")]
    IndexOutOfRange {
        /// Requested node index.
        index: i64,
        /// Number of nodes in the cluster.
        cluster_size: usize,
    },
    /// Required input file is absent or unreadable.
    #[error("failed reading key file {}", path.display())]
    MissingKeyFile {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Key source is shorter than the offset that had to be read.
    #[error("{}: expected a value at line {line}", path.display())]
    MalformedKeyData {
        /// Path of the key source.
        path: PathBuf,
        /// Zero-based line that is missing.
        line: usize,
    },
    /// Peer address is not of the form `ip:port`.
    #[error("peer address #{index} `{addr}` is not of the form ip:port")]
    MalformedAddress {
        /// Position of the address in the peer list.
        index: usize,
        /// The address as given.
        addr: String,
    },
    /// Output file could not be created or written.
    #[error("failed writing config to {}", path.display())]
    WriteFailure {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// [`Result`] for fallible generator operations.
pub type Result<T> = std::result::Result<T, Error>;
