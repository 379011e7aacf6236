use bookshelf_core::codec::{decode, decode_catalog, encode, encode_catalog};
use bookshelf_core::{Book, BookRecord, BookStatus, BookVariant, DecodeError};
use serde_json::json;

fn issued(mut book: Book) -> Book {
    assert!(book.issue());
    book
}

#[test]
fn decode_of_encode_is_identity_for_both_variants() {
    let books = vec![
        Book::standard("Go", "A", "111").unwrap(),
        issued(Book::standard("Rust", "B", "222").unwrap()),
        Book::reference("Atlas", "C", "333").unwrap(),
    ];

    for book in books {
        assert_eq!(decode(encode(&book)).unwrap(), book);
    }
}

#[test]
fn encode_uses_catalog_wire_names() {
    let book = issued(Book::standard("Go", "A", "111").unwrap());
    let value = serde_json::to_value(encode(&book)).unwrap();

    assert_eq!(
        value,
        json!({
            "title": "Go",
            "author": "A",
            "isbn": "111",
            "status": "issued",
            "type": "Book"
        })
    );

    let reference = Book::reference("Atlas", "C", "333").unwrap();
    let value = serde_json::to_value(encode(&reference)).unwrap();
    assert_eq!(value["type"], "ReferenceBook");
    assert_eq!(value["status"], "available");
}

#[test]
fn encode_catalog_of_nothing_is_empty_array() {
    assert_eq!(encode_catalog(&[]).unwrap(), "[]");
}

#[test]
fn decode_catalog_ignores_unknown_keys_and_key_order() {
    let text = r#"[
        {"type": "ReferenceBook", "isbn": "9", "shelf": "B2", "author": "X", "title": "Maps"},
        {"status": "issued", "title": "Go", "author": "A", "isbn": "111"}
    ]"#;

    let books = decode_catalog(text).unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].variant(), BookVariant::NonCirculating);
    assert_eq!(books[1].status(), BookStatus::Issued);
    assert_eq!(books[1].variant(), BookVariant::Standard);
}

#[test]
fn unknown_type_defaults_to_standard() {
    let record: BookRecord = serde_json::from_value(json!({
        "title": "Go", "author": "A", "isbn": "111", "type": "Magazine"
    }))
    .unwrap();

    assert_eq!(decode(record).unwrap().variant(), BookVariant::Standard);
}

#[test]
fn persisted_issued_reference_book_is_normalized() {
    let books = decode_catalog(
        r#"[{"title":"Atlas","author":"C","isbn":"3","status":"issued","type":"ReferenceBook"}]"#,
    )
    .unwrap();

    assert_eq!(books[0].status(), BookStatus::Available);
}

#[test]
fn decode_catalog_reports_failing_entry_index() {
    let err = decode_catalog(r#"[{"title":"Go","author":"A","isbn":"1"},{"title":"Rust"}]"#)
        .unwrap_err();

    match err {
        DecodeError::Entry { index, source } => {
            assert_eq!(index, 1);
            assert!(matches!(*source, DecodeError::MissingField("author")));
        }
        other => panic!("expected entry error, got {other:?}"),
    }
}

#[test]
fn decode_catalog_rejects_non_array_documents() {
    let err = decode_catalog(r#"{"title":"Go"}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(message) if message.contains("an object")));
}

#[test]
fn decode_catalog_rejects_wrong_field_types() {
    let err = decode_catalog(r#"[{"title":42,"author":"A","isbn":"1"}]"#).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Entry { index: 0, ref source } if matches!(**source, DecodeError::Malformed(_))
    ));
}

#[test]
fn decode_catalog_rejects_blank_required_fields() {
    let err = decode_catalog(r#"[{"title":"  ","author":"A","isbn":"1"}]"#).unwrap_err();
    assert_eq!(err.to_string(), "entry 0: title cannot be empty");
}

#[test]
fn decode_catalog_rejects_duplicate_ids() {
    let err = decode_catalog(
        r#"[{"title":"Go","author":"A","isbn":"1"},{"title":"Rust","author":"B","isbn":" 1 "}]"#,
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "entry 1: duplicate isbn `1`");
}

#[test]
fn decode_catalog_rejects_invalid_json() {
    let err = decode_catalog("{not valid json").unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(_)));
}
