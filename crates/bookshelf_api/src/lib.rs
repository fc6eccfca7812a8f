//! HTTP surface for the Bookshelf catalog.
//!
//! # Endpoints
//!
//! - `GET /health` - liveness and version
//! - `POST /books`, `GET /books` - create and paginated list
//! - `GET /books/search` - substring search over title, author, year
//! - `GET|PUT|DELETE /books/:id` - single-record access

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::{resolve_db_path, ServerConfig, DB_PATH_ENV};
pub use error::{ApiError, ErrorDetail};
pub use routes::{catalog_routes, AppState};
pub use server::CatalogServer;
