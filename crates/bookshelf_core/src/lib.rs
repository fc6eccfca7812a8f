//! Core domain logic for the Bookshelf catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use db::{ensure_schema, open_db, open_db_in_memory, CatalogStore, DbError, DbResult, Session};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{
    Book, BookFields, BookId, BookInput, FieldViolation, ValidationError, YEAR_MAX, YEAR_MIN,
};
pub use repo::book_repo::{
    BookRepository, Page, RepoError, RepoResult, SqliteBookRepository, PAGE_LIMIT_DEFAULT,
    PAGE_LIMIT_MAX,
};
pub use search::substring::{search_books, BookMatcher, SearchQuery};
pub use service::book_service::{BookService, CatalogError, CatalogResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
