//! Case-insensitive substring search over title, author and year.
//!
//! # Responsibility
//! - Validate search text.
//! - Match a book when any of `title`, `author` or the decimal rendering of
//!   `year` contains the query after lower-casing both sides.
//!
//! # Invariants
//! - The query is a literal: `%`, `_`, `*` and friends carry no meaning.
//! - An absent `year` never matches.
//! - Results follow ascending `id`; no pagination is applied.

use crate::model::book::{Book, ValidationError};
use crate::repo::book_repo::{parse_book_row, RepoResult, BOOK_SELECT_SQL};
use log::debug;
use rusqlite::Connection;
use std::time::Instant;

/// Validated search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
}

impl SearchQuery {
    /// Creates a query from caller text.
    ///
    /// The text is used verbatim; only the empty string is rejected.
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::single(
                "query",
                "must contain at least 1 character",
            ));
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns a matcher bound to this query.
    pub fn matcher(&self) -> BookMatcher {
        BookMatcher {
            needle: self.text.to_lowercase(),
        }
    }
}

/// Three-way OR predicate over one book.
#[derive(Debug, Clone)]
pub struct BookMatcher {
    needle: String,
}

impl BookMatcher {
    pub fn matches(&self, book: &Book) -> bool {
        self.field_matches(&book.title)
            || self.field_matches(&book.author)
            || book
                .year
                .is_some_and(|year| self.field_matches(&year.to_string()))
    }

    fn field_matches(&self, value: &str) -> bool {
        value.to_lowercase().contains(self.needle.as_str())
    }
}

/// Returns every stored book matching `query`, ordered by ascending `id`.
pub fn search_books(conn: &Connection, query: &SearchQuery) -> RepoResult<Vec<Book>> {
    let started_at = Instant::now();
    let matcher = query.matcher();

    let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut scanned = 0_usize;
    let mut hits = Vec::new();

    while let Some(row) = rows.next()? {
        scanned += 1;
        let book = parse_book_row(row)?;
        if matcher.matches(&book) {
            hits.push(book);
        }
    }

    debug!(
        "event=book_search_scan module=search status=ok scanned={} hits={} duration_ms={}",
        scanned,
        hits.len(),
        started_at.elapsed().as_millis()
    );
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::SearchQuery;
    use crate::model::book::Book;

    fn book(title: &str, author: &str, year: Option<i64>) -> Book {
        Book {
            id: 1,
            title: title.to_string(),
            author: author.to_string(),
            year,
        }
    }

    #[test]
    fn empty_query_is_rejected() {
        let err = SearchQuery::new("").unwrap_err();
        assert_eq!(err.fields(), vec!["query"]);
    }

    #[test]
    fn query_text_is_kept_verbatim() {
        let query = SearchQuery::new(" Dune ").unwrap();
        assert_eq!(query.text(), " Dune ");
        assert!(!query.matcher().matches(&book("Dune", "Frank Herbert", None)));
        assert!(query.matcher().matches(&book("Children of Dune Messiah", "F. H.", None)));
    }

    #[test]
    fn matcher_folds_case_on_both_sides() {
        let matcher = SearchQuery::new("TOLKIEN").unwrap().matcher();
        assert!(matcher.matches(&book("The Hobbit", "J.R.R. Tolkien", None)));
    }

    #[test]
    fn matcher_uses_decimal_year() {
        let matcher = SearchQuery::new("96").unwrap().matcher();
        assert!(matcher.matches(&book("Dune Messiah", "Frank Herbert", Some(1966))));
        assert!(!matcher.matches(&book("Dune Messiah", "Frank Herbert", None)));
    }

    #[test]
    fn matcher_treats_wildcards_literally() {
        let matcher = SearchQuery::new("%").unwrap().matcher();
        assert!(!matcher.matches(&book("Dune", "Frank Herbert", Some(1965))));
        assert!(matcher.matches(&book("100% Pure", "Anon", None)));
    }
}
