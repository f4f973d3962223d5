//! Unified error type.

use thiserror::Error;

/// The error type returned by trellis's fallible operations.
///
/// Routing misses are not errors: an unknown path or an unregistered method
/// goes to the router's fallback handler. This type surfaces infrastructure
/// failures: resolving or binding the listen address, accepting a connection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
