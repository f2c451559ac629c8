//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the reveal-state data access contract.
//! - Isolate SQLite query details from presenter orchestration.
//!
//! # Invariants
//! - The reveal store is a pure persistence primitive: it has no knowledge
//!   of lock state, and it is the only writer to its storage.

pub mod reveal_repo;
