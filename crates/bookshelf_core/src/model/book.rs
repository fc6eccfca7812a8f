//! Book domain model and record validator.
//!
//! # Responsibility
//! - Define the stored `Book` record and the raw `BookInput` payload.
//! - Turn raw input into `BookFields`, the only shape repositories accept.
//!
//! # Invariants
//! - `title` and `author` are never empty or whitespace-only.
//! - `year`, when present, lies in `YEAR_MIN..=YEAR_MAX`.
//! - Strings are kept exactly as supplied; validation never rewrites them.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Server-assigned identity of a stored book.
pub type BookId = i64;

/// Smallest accepted publication year (inclusive).
pub const YEAR_MIN: i64 = 1;
/// Largest accepted publication year (inclusive).
pub const YEAR_MAX: i64 = 2100;

/// Stored catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Serialized as `null` when absent.
    pub year: Option<i64>,
}

impl Book {
    /// Re-checks field constraints on an already materialized record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(&self.title, &self.author, self.year)
    }
}

/// Raw create/update payload as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub year: Option<i64>,
}

impl BookInput {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: Option<i64>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Validates every field and returns the write-ready payload.
    ///
    /// # Errors
    /// - Returns a `ValidationError` listing all failing fields, not just the
    ///   first one found.
    pub fn validate(self) -> Result<BookFields, ValidationError> {
        check_fields(&self.title, &self.author, self.year)?;
        Ok(BookFields {
            title: self.title,
            author: self.author,
            year: self.year,
        })
    }
}

/// Validated mutable fields of a book.
///
/// Only obtainable through [`BookInput::validate`], so holding one proves the
/// constraints hold. Updates assign all three fields from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    title: String,
    author: String,
    year: Option<i64>,
}

impl BookFields {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> Option<i64> {
        self.year
    }

    /// Attaches a stored identity to these fields.
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
        }
    }
}

/// One failing input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Input rejected before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Wraps collected violations; `None` when there is nothing to report.
    pub fn from_violations(violations: Vec<FieldViolation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    /// Builds an error for a single offending field.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field,
                message: message.into(),
            }],
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Names of the failing fields, in check order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|item| item.field).collect()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        for (index, violation) in self.violations.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{} {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

fn check_fields(title: &str, author: &str, year: Option<i64>) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if title.trim().is_empty() {
        violations.push(FieldViolation {
            field: "title",
            message: "must not be empty".to_string(),
        });
    }
    if author.trim().is_empty() {
        violations.push(FieldViolation {
            field: "author",
            message: "must not be empty".to_string(),
        });
    }
    if let Some(year) = year {
        if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
            violations.push(FieldViolation {
                field: "year",
                message: format!("must be between {YEAR_MIN} and {YEAR_MAX}, got {year}"),
            });
        }
    }

    match ValidationError::from_violations(violations) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
