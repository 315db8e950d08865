//! Store implementations for the Reelvault catalog.
//!
//! Two implementations of the [`EntryStore`](reelvault_core::EntryStore)
//! contract: an in-memory store for tests and local development, and a
//! MySQL store for production use.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryStore;
pub use mysql::MySqlStore;
