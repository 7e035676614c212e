//! Resolution of human-entered identifiers to stable record ids.
//!
//! # Responsibility
//! - Turn an ordinal, id prefix or full id into exactly one record id.
//!
//! # Invariants
//! - Ordinals are 1-based and index the sequence exactly as displayed.
//! - Prefix matches must be unique; ambiguity is a failure, never a guess.

pub mod resolver;
