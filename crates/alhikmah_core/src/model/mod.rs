//! Library domain model.
//!
//! # Responsibility
//! - Define the records persisted by the library store.
//! - Own validation rules shared by repository write and read paths.
//!
//! # Invariants
//! - Identifiers are assigned by the store; `0` means "not persisted yet".
//! - Reading progress snapshots are append-only.

pub mod book;
pub mod progress;
