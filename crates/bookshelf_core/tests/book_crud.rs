use bookshelf_core::db::migrations::latest_version;
use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    BookInput, BookRepository, BookService, CatalogError, Page, RepoError, SqliteBookRepository,
};
use rusqlite::Connection;

fn input(title: &str, author: &str, year: Option<i64>) -> BookInput {
    BookInput::new(title, author, year)
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let fields = input("Dune", "Frank Herbert", Some(1965)).validate().unwrap();
    let created = repo.create_book(&fields).unwrap();

    assert_eq!(created.id, 1);
    let loaded = repo.get_book(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_and_get_roundtrip_preserves_absent_year() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let fields = input("  Untitled draft ", "Anonymous", None).validate().unwrap();
    let created = repo.create_book(&fields).unwrap();

    let loaded = repo.get_book(created.id).unwrap().unwrap();
    assert_eq!(loaded.year, None);
    assert_eq!(loaded.title, "  Untitled draft ");
    assert_eq!(loaded, created);
}

#[test]
fn identities_are_assigned_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let ids: Vec<_> = ["A", "B", "C"]
        .into_iter()
        .map(|title| {
            let fields = input(title, "author", None).validate().unwrap();
            repo.create_book(&fields).unwrap().id
        })
        .collect();

    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn deleted_identity_is_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let first = repo
        .create_book(&input("A", "author", None).validate().unwrap())
        .unwrap();
    repo.delete_book(first.id).unwrap();
    let second = repo
        .create_book(&input("B", "author", None).validate().unwrap())
        .unwrap();

    assert_ne!(first.id, second.id);
}

#[test]
fn update_replaces_all_fields_wholesale() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let created = repo
        .create_book(&input("Dune", "Frank Herbert", Some(1965)).validate().unwrap())
        .unwrap();

    let replacement = input("Children of Dune", "F. Herbert", None).validate().unwrap();
    let updated = repo.update_book(created.id, &replacement).unwrap();

    assert_eq!(updated.id, created.id);
    let loaded = repo.get_book(created.id).unwrap().unwrap();
    assert_eq!(loaded.title, "Children of Dune");
    assert_eq!(loaded.author, "F. Herbert");
    assert_eq!(loaded.year, None, "absent year must clear the stored year");
    assert_eq!(loaded, updated);
}

#[test]
fn update_not_found_returns_not_found_and_never_creates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let fields = input("Ghost", "Nobody", None).validate().unwrap();
    let err = repo.update_book(42, &fields).unwrap_err();

    assert!(matches!(err, RepoError::NotFound(42)));
    assert!(repo.list_books(&Page::default()).unwrap().is_empty());
}

#[test]
fn delete_then_get_and_second_delete_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let created = repo
        .create_book(&input("Emma", "Jane Austen", Some(1815)).validate().unwrap())
        .unwrap();

    repo.delete_book(created.id).unwrap();
    assert!(repo.get_book(created.id).unwrap().is_none());

    let err = repo.delete_book(created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id));
}

#[test]
fn list_pagination_follows_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let a = repo.create_book(&input("A", "x", None).validate().unwrap()).unwrap();
    let b = repo.create_book(&input("B", "x", None).validate().unwrap()).unwrap();
    let c = repo.create_book(&input("C", "x", None).validate().unwrap()).unwrap();

    let first = repo.list_books(&Page::new(0, 2).unwrap()).unwrap();
    assert_eq!(first, vec![a, b]);

    let second = repo.list_books(&Page::new(2, 2).unwrap()).unwrap();
    assert_eq!(second, vec![c]);

    let past_end = repo.list_books(&Page::new(10, 2).unwrap()).unwrap();
    assert!(past_end.is_empty());
}

#[test]
fn page_rejects_out_of_range_values_instead_of_clamping() {
    assert_eq!(Page::new(-1, 10).unwrap_err().fields(), vec!["skip"]);
    assert_eq!(Page::new(0, 0).unwrap_err().fields(), vec!["limit"]);
    assert_eq!(Page::new(0, 101).unwrap_err().fields(), vec!["limit"]);
    assert_eq!(Page::new(-5, 500).unwrap_err().fields(), vec!["skip", "limit"]);

    let max = Page::new(0, 100).unwrap();
    assert_eq!(max.limit(), 100);
    assert_eq!(Page::default(), Page::new(0, 100).unwrap());
}

#[test]
fn read_path_rejects_invalid_persisted_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO books (title, author, year) VALUES ('', 'someone', NULL);",
        [],
    )
    .unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let err = repo.get_book(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn service_validates_before_touching_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let err = service.create(input("", "Frank Herbert", None)).unwrap_err();
    match err {
        CatalogError::Validation(err) => assert_eq!(err.fields(), vec!["title"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list(0, 100).unwrap().is_empty());
}

#[test]
fn service_update_reports_validation_before_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let invalid = service.update(99, input("Dune", "", Some(1965))).unwrap_err();
    assert!(matches!(invalid, CatalogError::Validation(_)));

    let missing = service
        .update(99, input("Dune", "Frank Herbert", Some(1965)))
        .unwrap_err();
    assert!(matches!(missing, CatalogError::NotFound(99)));
}

#[test]
fn service_lifecycle_matches_catalog_contract() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    let created = service
        .create(input("Dune", "Frank Herbert", Some(1965)))
        .unwrap();
    assert_eq!(created.id, 1);

    let updated = service
        .update(1, input("Dune", "Frank Herbert", Some(1966)))
        .unwrap();
    assert_eq!(updated.year, Some(1966));
    assert_eq!(service.get(1).unwrap(), updated);

    service.delete(1).unwrap();
    assert!(matches!(service.get(1).unwrap_err(), CatalogError::NotFound(1)));
    assert!(matches!(service.delete(1).unwrap_err(), CatalogError::NotFound(1)));
    assert!(matches!(
        service
            .update(1, input("Dune", "Frank Herbert", Some(1966)))
            .unwrap_err(),
        CatalogError::NotFound(1)
    ));
}

#[test]
fn service_list_rejects_bad_pagination() {
    let conn = open_db_in_memory().unwrap();
    let service = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());

    assert!(matches!(service.list(-1, 10), Err(CatalogError::Validation(_))));
    assert!(matches!(service.list(0, 0), Err(CatalogError::Validation(_))));
    assert!(matches!(service.list(0, 101), Err(CatalogError::Validation(_))));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteBookRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_books_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBookRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("books"))));
}

#[test]
fn repository_rejects_connection_missing_year_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBookRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "books",
            column: "year"
        })
    ));
}
