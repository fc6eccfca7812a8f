use bookshelf_core::{Book, BookInput, YEAR_MAX, YEAR_MIN};

#[test]
fn validate_accepts_minimal_input() {
    let fields = BookInput::new("Dune", "Frank Herbert", None).validate().unwrap();

    assert_eq!(fields.title(), "Dune");
    assert_eq!(fields.author(), "Frank Herbert");
    assert_eq!(fields.year(), None);
}

#[test]
fn validate_rejects_empty_and_whitespace_title() {
    for title in ["", "   ", "\t\n"] {
        let err = BookInput::new(title, "Frank Herbert", None)
            .validate()
            .unwrap_err();
        assert_eq!(err.fields(), vec!["title"], "title {title:?} should be rejected");
    }
}

#[test]
fn validate_reports_every_failing_field() {
    let err = BookInput::new("", " ", Some(0)).validate().unwrap_err();

    assert_eq!(err.fields(), vec!["title", "author", "year"]);
    let rendered = err.to_string();
    assert!(rendered.starts_with("validation failed: title"));
    assert!(rendered.contains("year must be between 1 and 2100, got 0"));
}

#[test]
fn year_bounds_are_inclusive() {
    assert_eq!(YEAR_MIN, 1);
    assert_eq!(YEAR_MAX, 2100);

    assert!(BookInput::new("t", "a", Some(YEAR_MIN)).validate().is_ok());
    assert!(BookInput::new("t", "a", Some(YEAR_MAX)).validate().is_ok());
    assert!(BookInput::new("t", "a", Some(1899)).validate().is_ok());

    let below = BookInput::new("t", "a", Some(YEAR_MIN - 1)).validate().unwrap_err();
    assert_eq!(below.fields(), vec!["year"]);
    let above = BookInput::new("t", "a", Some(YEAR_MAX + 1)).validate().unwrap_err();
    assert_eq!(above.fields(), vec!["year"]);
    let negative = BookInput::new("t", "a", Some(-1965)).validate().unwrap_err();
    assert_eq!(negative.fields(), vec!["year"]);
}

#[test]
fn book_serialization_uses_expected_wire_fields() {
    let book = BookInput::new("Dune", "Frank Herbert", None)
        .validate()
        .unwrap()
        .into_book(7);

    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": 7,
            "title": "Dune",
            "author": "Frank Herbert",
            "year": null
        })
    );

    let decoded: Book = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, book);
}

#[test]
fn input_deserialization_defaults_missing_year() {
    let input: BookInput =
        serde_json::from_value(serde_json::json!({"title": "Emma", "author": "Jane Austen"}))
            .unwrap();
    assert_eq!(input.year, None);

    let missing_author =
        serde_json::from_value::<BookInput>(serde_json::json!({"title": "Emma"}));
    assert!(missing_author.is_err());
}

#[test]
fn stored_record_revalidates_constraints() {
    let mut book = BookInput::new("Emma", "Jane Austen", Some(1815))
        .validate()
        .unwrap()
        .into_book(1);
    assert!(book.validate().is_ok());

    book.year = Some(3000);
    assert_eq!(book.validate().unwrap_err().fields(), vec!["year"]);
}
