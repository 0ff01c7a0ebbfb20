//! Error types for the relay.
//!
//! Startup failures are fatal and map to distinct exit codes. Failures of a
//! single datagram send are not errors at this level; the relay loop counts
//! and drops them.

use link::config::ConfigError;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors opening, creating or mapping the shared segment.
#[derive(Error, Debug)]
pub enum MappingError {
    /// `shm_open` on an existing object failed for a reason other than absence.
    #[error("Failed to open segment {name}: {source}")]
    Open {
        /// Segment name
        name: String,
        /// Source errno
        #[source]
        source: nix::Error,
    },

    /// Creating a new object failed.
    #[error("Failed to create segment {name}: {source}")]
    Create {
        /// Segment name
        name: String,
        /// Source errno
        #[source]
        source: nix::Error,
    },

    /// Sizing a freshly created object failed.
    #[error("Failed to resize segment {name} to {size} bytes: {source}")]
    Resize {
        /// Segment name
        name: String,
        /// Requested size in bytes
        size: usize,
        /// Source IO error
        #[source]
        source: std::io::Error,
    },

    /// Querying the size of an existing object failed.
    #[error("Failed to stat segment {name}: {source}")]
    Stat {
        /// Segment name
        name: String,
        /// Source IO error
        #[source]
        source: std::io::Error,
    },

    /// Existing object is smaller than the published layout and could not
    /// be grown.
    #[error("Segment {name} is {actual} bytes and could not be grown to {expected}: {source}")]
    TooSmall {
        /// Segment name
        name: String,
        /// Object size in bytes
        actual: u64,
        /// Required size in bytes
        expected: usize,
        /// Source IO error
        #[source]
        source: std::io::Error,
    },

    /// `mmap` failed.
    #[error("Failed to map segment {name}: {source}")]
    Map {
        /// Segment name
        name: String,
        /// Source IO error
        #[source]
        source: std::io::Error,
    },
}

/// Errors creating the UDP channel.
#[derive(Error, Debug)]
pub enum SocketError {
    /// Binding the local datagram socket failed.
    #[error("Failed to bind UDP socket on {addr}: {source}")]
    Bind {
        /// Local address
        addr: SocketAddr,
        /// Source IO error
        #[source]
        source: std::io::Error,
    },

    /// Switching the socket to non-blocking mode failed.
    #[error("Failed to make UDP socket non-blocking: {source}")]
    NonBlocking {
        /// Source IO error
        #[source]
        source: std::io::Error,
    },
}

/// Fatal relay errors.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Shared segment unavailable.
    #[error("Shared memory error: {0}")]
    Mapping(#[from] MappingError),

    /// UDP channel unavailable.
    #[error("Socket error: {0}")]
    Socket(#[from] SocketError),

    /// Configuration rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Ctrl-C handler could not be installed.
    #[error("Signal handler error: {0}")]
    SignalHandler(#[from] ctrlc::Error),
}

impl RelayError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Mapping(_) => 1,
            Self::Socket(_) => 2,
            Self::Config(_) => 3,
            Self::SignalHandler(_) => 4,
        }
    }
}

/// Result type for relay startup.
pub type RelayResult<T> = Result<T, RelayError>;
