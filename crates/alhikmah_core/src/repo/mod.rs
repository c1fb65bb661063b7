//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for books and progress.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate records before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Every operation is its own atomic unit; there is no cross-call
//!   transaction.

pub mod library_repo;
pub mod live;
