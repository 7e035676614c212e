//! Read-only query views over loaded records.
//!
//! # Responsibility
//! - Filter and order records for display without mutating them.
//!
//! # Invariants
//! - Every ordering is total and stable: ties keep sequence order.

pub mod listing;
