//! Catalog search entry points.
//!
//! # Responsibility
//! - Expose the multi-field substring search over stored books.
//! - Keep match semantics inside core, independent of SQL collation rules.

pub mod substring;
