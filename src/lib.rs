//! # AtlasKV Console
//!
//! An interactive console for key-value stores speaking the AtlasKV protocol:
//! - One long-lived session per process
//! - `set` / `get` / `delete` / `list` forwarded directly to the store
//! - Every store call bounded by a configurable timeout
//! - Credentials passed through from the environment or a settings file
//!
//! ## Server Requirements
//!
//! The console speaks the AtlasKV binary protocol plus two extensions:
//! SCAN (0x05), which backs `list`, and AUTH (0x06), sent at connect time
//! when a username is configured. A stock AtlasKV server rejects both as
//! unknown commands, so the store must implement them. See [`protocol`].
//!
//! [`MemoryStore`] is a supported in-process backend for embedding the
//! console without a server.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Interactive Loop                          │
//! │                 (stdin ─► stdout, Repl)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │            Command Parser / Dispatcher                       │
//! │          (ConsoleCommand, Dispatcher)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  KvStore
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Session   │          │ MemoryStore │
//!   │    (TCP)    │          │ (in-proc)   │
//!   └──────┬──────┘          └─────────────┘
//!          │  binary protocol
//!          ▼
//!   ┌─────────────┐
//!   │ Remote store│
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod client;
pub mod console;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ConsoleError, Result};
pub use config::Config;
pub use client::{Entry, KvStore, MemoryStore, Session};
pub use console::{ConsoleCommand, Dispatcher, Flow, Repl};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the console
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
