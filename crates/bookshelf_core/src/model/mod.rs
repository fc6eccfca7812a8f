//! Domain model for the book catalog.
//!
//! # Responsibility
//! - Define the stored record and the inbound payload shapes.
//! - Own field-level validation for every write path.
//!
//! # Invariants
//! - Every stored record is identified by a server-assigned `BookId`.
//! - Writes only accept payloads that passed validation.

pub mod book;
