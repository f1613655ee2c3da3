//! MarkSync — a bookmark reconciliation and sync engine.
//!
//! Reads bookmark trees from SQLite and JSON stores, detects duplicates
//! and conflicts between them, merges the trees under a configurable
//! strategy, and tracks content hashes so later syncs can run
//! incrementally.
//!
//! This library crate exposes all modules for use by the binary and
//! integration tests.

pub mod services;
pub mod stores;
pub mod types;
