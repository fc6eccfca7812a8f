//! Catalog HTTP routes
//!
//! Handlers validate through the core service and run storage work on the
//! blocking pool, one scoped session per request.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use bookshelf_core::{
    Book, BookId, BookInput, BookService, CatalogResult, CatalogStore, FieldViolation,
    SqliteBookRepository, ValidationError, PAGE_LIMIT_DEFAULT,
};
use log::info;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// State shared by all catalog handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<CatalogStore>,
}

impl AppState {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }
}

/// Raw query-string pairs, in request order.
///
/// Parsed per key so a bad value is reported against its own parameter and a
/// repeated key resolves to its last occurrence.
type QueryPairs = Vec<(String, String)>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Create catalog routes
pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/books", get(list_books_handler).post(create_book_handler))
        .route("/books/", get(list_books_handler).post(create_book_handler))
        .route("/books/search", get(search_books_handler))
        .route("/books/search/", get(search_books_handler))
        .route(
            "/books/:id",
            get(get_book_handler)
                .put(update_book_handler)
                .delete(delete_book_handler),
        )
        .layer(middleware::from_fn(request_context))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: bookshelf_core::core_version(),
    })
}

async fn create_book_handler(
    State(state): State<AppState>,
    body: Result<Json<BookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(input) = body.map_err(|err| ApiError::invalid_input("body", err.body_text()))?;

    let book = run_catalog(&state, move |service| service.create(input)).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books_handler(
    State(state): State<AppState>,
    params: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let Query(pairs) = params.map_err(|err| ApiError::invalid_input("params", err.body_text()))?;
    let (skip, limit) = page_params(&pairs)?;

    let books = run_catalog(&state, move |service| service.list(skip, limit)).await?;
    Ok(Json(books))
}

async fn search_books_handler(
    State(state): State<AppState>,
    params: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let Query(pairs) = params.map_err(|err| ApiError::invalid_input("query", err.body_text()))?;
    let text = last_value(&pairs, "query")
        .map(str::to_string)
        .ok_or_else(|| ApiError::invalid_input("query", "field required"))?;

    let books = run_catalog(&state, move |service| service.search(text)).await?;
    Ok(Json(books))
}

async fn get_book_handler(
    State(state): State<AppState>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<Book>, ApiError> {
    let id = book_id(id)?;

    let book = run_catalog(&state, move |service| service.get(id)).await?;
    Ok(Json(book))
}

async fn update_book_handler(
    State(state): State<AppState>,
    id: Result<Path<BookId>, PathRejection>,
    body: Result<Json<BookInput>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let id = book_id(id)?;
    let Json(input) = body.map_err(|err| ApiError::invalid_input("body", err.body_text()))?;

    let book = run_catalog(&state, move |service| service.update(id, input)).await?;
    Ok(Json(book))
}

async fn delete_book_handler(
    State(state): State<AppState>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = book_id(id)?;

    run_catalog(&state, move |service| service.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================
// Helpers
// ==================

fn last_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

/// Reads `skip` and `limit`, reporting every unparsable one by name.
///
/// Range checks are left to the service.
fn page_params(pairs: &[(String, String)]) -> Result<(i64, i64), ApiError> {
    let mut violations = Vec::new();
    let mut parse = |field: &'static str, default: i64| match last_value(pairs, field) {
        None => default,
        Some(raw) => raw.parse::<i64>().unwrap_or_else(|_| {
            violations.push(FieldViolation {
                field,
                message: format!("must be an integer, got {raw:?}"),
            });
            default
        }),
    };
    let skip = parse("skip", 0);
    let limit = parse("limit", PAGE_LIMIT_DEFAULT);

    match ValidationError::from_violations(violations) {
        Some(err) => Err(ApiError::Validation(err)),
        None => Ok((skip, limit)),
    }
}

fn book_id(id: Result<Path<BookId>, PathRejection>) -> Result<BookId, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|err| ApiError::invalid_input("id", err.body_text()))
}

/// Runs `op` against a fresh session on the blocking pool.
async fn run_catalog<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&BookService<SqliteBookRepository<'_>>) -> CatalogResult<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || with_book_service(&store, op))
        .await
        .map_err(|err| ApiError::Internal(format!("catalog task failed: {err}")))?
}

/// Opens a session, builds the service and runs `op`.
///
/// The session is dropped before this returns, on success and on every error.
fn with_book_service<T>(
    store: &CatalogStore,
    op: impl FnOnce(&BookService<SqliteBookRepository<'_>>) -> CatalogResult<T>,
) -> Result<T, ApiError> {
    let session = store.session()?;
    let repo = SqliteBookRepository::try_new(&session)?;
    let service = BookService::new(repo);
    Ok(op(&service)?)
}

async fn request_context(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    info!(
        "event=http_request module=api status={} request_id={} method={} path={} duration_ms={}",
        response.status().as_u16(),
        request_id,
        method,
        path,
        started_at.elapsed().as_millis()
    );
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
