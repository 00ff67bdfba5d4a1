//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the wallet (the durable store) are abstracted
//! behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including fault injection
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod store;

pub use store::NullHistoryStore;
