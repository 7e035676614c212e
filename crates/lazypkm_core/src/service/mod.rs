//! Core use-case services.
//!
//! # Responsibility
//! - Own record collections for one session and expose named operations.
//! - Keep front ends decoupled from storage and enrichment details.

pub mod assignment_book;
pub mod session;
