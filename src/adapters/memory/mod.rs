//! In-memory storage adapter.
//!
//! Backs tests and the `storage = "memory"` mode. All tables live behind one
//! lock so compensation and listings see a consistent view.

mod store;

pub use store::InMemoryStore;
