//! Error types for the console
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ConsoleError
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Unified error type for console operations
///
/// A missing key is not an error: `KvStore::get` reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ConsoleError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    /// The session could not be established. Fatal.
    #[error("{0}")]
    Startup(String),

    /// A single store call failed or timed out. The session survives.
    #[error("{0}")]
    Unavailable(String),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    /// Malformed console input; the message is printed verbatim.
    #[error("{0}")]
    Usage(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
