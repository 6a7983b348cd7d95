//! Client Module
//!
//! Store Client Adapter: the operations the console needs from a
//! key-value store, and the backends that provide them.
//!
//! ## Backends
//! - [`Session`]: one TCP connection to a remote store, every call
//!   bounded by the configured request timeout
//! - [`MemoryStore`]: in-process ordered map, for embedding without a
//!   server

mod store;
mod connection;
mod session;
mod memory;

pub use store::{Entry, KvStore};
pub use connection::Connection;
pub use session::Session;
pub use memory::MemoryStore;
