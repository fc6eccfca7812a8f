//! Book catalog use-case service.
//!
//! # Responsibility
//! - Provide the create/list/get/update/delete/search entry points.
//! - Validate every caller input before touching the repository.
//! - Collapse repository failures into three caller-facing kinds.
//!
//! # Invariants
//! - A validation failure never reaches storage.
//! - `update` is a full replacement; an absent `year` clears the stored one.
//! - Service layer remains storage-agnostic.

use crate::model::book::{Book, BookId, BookInput, ValidationError};
use crate::repo::book_repo::{BookRepository, Page, RepoError};
use crate::search::substring::SearchQuery;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Caller-facing error for catalog use-cases.
#[derive(Debug)]
pub enum CatalogError {
    /// Input failed field constraints; storage was not touched.
    Validation(ValidationError),
    /// Referenced book does not exist.
    NotFound(BookId),
    /// Storage failed after validation passed.
    Storage(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

/// Use-case service wrapper for catalog operations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new book, returning it with its assigned id.
    pub fn create(&self, input: BookInput) -> CatalogResult<Book> {
        let started_at = Instant::now();
        let fields = input.validate().inspect_err(|err| log_rejected("book_create", err))?;

        let book = self.repo.create_book(&fields)?;
        info!(
            "event=book_create module=service status=ok book_id={} duration_ms={}",
            book.id,
            started_at.elapsed().as_millis()
        );
        Ok(book)
    }

    /// Lists books in ascending id order.
    ///
    /// # Errors
    /// - `Validation` when `skip < 0` or `limit` is outside `1..=100`.
    pub fn list(&self, skip: i64, limit: i64) -> CatalogResult<Vec<Book>> {
        let page = Page::new(skip, limit).inspect_err(|err| log_rejected("book_list", err))?;
        Ok(self.repo.list_books(&page)?)
    }

    /// Gets one book by id.
    pub fn get(&self, id: BookId) -> CatalogResult<Book> {
        self.repo.get_book(id)?.ok_or(CatalogError::NotFound(id))
    }

    /// Replaces all mutable fields of an existing book.
    ///
    /// Validation runs first, so an invalid payload for a missing id reports
    /// `Validation`, not `NotFound`.
    pub fn update(&self, id: BookId, input: BookInput) -> CatalogResult<Book> {
        let started_at = Instant::now();
        let fields = input.validate().inspect_err(|err| log_rejected("book_update", err))?;

        let book = self.repo.update_book(id, &fields).inspect_err(|err| {
            if matches!(err, RepoError::NotFound(_)) {
                info!("event=book_update module=service status=not_found book_id={id}");
            }
        })?;
        info!(
            "event=book_update module=service status=ok book_id={} duration_ms={}",
            id,
            started_at.elapsed().as_millis()
        );
        Ok(book)
    }

    /// Deletes one book; a missing id is reported, never ignored.
    pub fn delete(&self, id: BookId) -> CatalogResult<()> {
        let started_at = Instant::now();
        match self.repo.delete_book(id) {
            Ok(()) => {
                info!(
                    "event=book_delete module=service status=ok book_id={} duration_ms={}",
                    id,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                if matches!(err, RepoError::NotFound(_)) {
                    info!("event=book_delete module=service status=not_found book_id={id}");
                }
                Err(err.into())
            }
        }
    }

    /// Returns all books whose title, author or year contains `text`.
    pub fn search(&self, text: impl Into<String>) -> CatalogResult<Vec<Book>> {
        let started_at = Instant::now();
        let query = SearchQuery::new(text).inspect_err(|err| log_rejected("book_search", err))?;

        let books = self.repo.search_books(&query)?;
        info!(
            "event=book_search module=service status=ok hits={} duration_ms={}",
            books.len(),
            started_at.elapsed().as_millis()
        );
        Ok(books)
    }
}

fn log_rejected(event: &str, err: &ValidationError) {
    warn!(
        "event={event} module=service status=rejected fields={}",
        err.fields().join(",")
    );
}
