use bookshelf_core::{
    default_backup_path, Book, BookStatus, Catalog, DecodeError, EventKind, EventStatus,
    IssueOutcome, LoadOutcome, MemoryEventSink, NoopEventSink, StoreError,
};
use serde_json::{json, Value};
use std::fs;

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn save_issue_and_reload_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("c.json");

    let mut catalog = Catalog::new(NoopEventSink);
    catalog.add(Book::standard("Go", "A", "111").unwrap());
    assert_eq!(catalog.issue("111"), IssueOutcome::Issued);
    catalog.save(&path).unwrap();

    assert_eq!(
        read_json(&path),
        json!([{"title":"Go","author":"A","isbn":"111","status":"issued","type":"Book"}])
    );

    let mut fresh = Catalog::new(NoopEventSink);
    assert!(matches!(fresh.load(&path).unwrap(), LoadOutcome::Loaded(1)));
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh.books()[0].status(), BookStatus::Issued);
}

#[test]
fn save_and_load_preserve_order_and_variants() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let mut catalog = Catalog::new(NoopEventSink);
    catalog.add(Book::standard("Zeta", "A", "3").unwrap());
    catalog.add(Book::reference("Alpha", "B", "1").unwrap());
    catalog.add(Book::standard("Mid", "C", "2").unwrap());
    catalog.save(&path).unwrap();

    let mut reloaded = Catalog::new(NoopEventSink);
    reloaded.load(&path).unwrap();
    assert_eq!(reloaded.books(), catalog.books());
}

#[test]
fn empty_catalog_is_saved_as_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    Catalog::new(NoopEventSink).save(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn save_replaces_previous_content_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, "[{\"title\":\"Old\",\"author\":\"X\",\"isbn\":\"0\"}]").unwrap();

    let mut catalog = Catalog::new(NoopEventSink);
    catalog.add(Book::standard("New", "Y", "1").unwrap());
    catalog.save(&path).unwrap();

    let saved = read_json(&path);
    assert_eq!(saved.as_array().unwrap().len(), 1);
    assert_eq!(saved[0]["title"], "New");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn save_over_directory_is_reported_and_leaves_it_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::create_dir_all(path.join("occupied")).unwrap();

    let sink = MemoryEventSink::new();
    let catalog = Catalog::new(&sink);
    let err = catalog.save(&path).unwrap_err();

    assert!(matches!(err, StoreError::Io { .. }));
    assert!(path.join("occupied").is_dir());
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::CatalogSave);
    assert_eq!(events[0].status, EventStatus::Error);
}

#[test]
fn load_missing_file_yields_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");

    let mut catalog = Catalog::new(NoopEventSink);
    assert!(matches!(catalog.load(&path).unwrap(), LoadOutcome::Empty));
    assert!(catalog.is_empty());
    assert!(!path.exists());
}

#[test]
fn load_blank_file_yields_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, " \n\t ").unwrap();

    let mut catalog = Catalog::new(NoopEventSink);
    assert!(matches!(catalog.load(&path).unwrap(), LoadOutcome::Empty));
    assert!(catalog.is_empty());
}

#[test]
fn load_empty_array_is_a_successful_load_of_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, "[]").unwrap();

    let mut catalog = Catalog::new(NoopEventSink);
    assert!(matches!(catalog.load(&path).unwrap(), LoadOutcome::Loaded(0)));
}

#[test]
fn load_corrupt_file_reports_corruption_and_stays_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, "{not valid json").unwrap();

    let sink = MemoryEventSink::new();
    let mut catalog = Catalog::new(&sink);
    let outcome = catalog.load(&path).unwrap();

    assert!(matches!(
        outcome,
        LoadOutcome::CorruptionDetected(DecodeError::Malformed(_))
    ));
    assert!(catalog.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{not valid json");
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reason, Some("corrupt"));
}

#[test]
fn load_non_utf8_file_is_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();

    let mut catalog = Catalog::new(NoopEventSink);
    assert!(matches!(
        catalog.load(&path).unwrap(),
        LoadOutcome::CorruptionDetected(_)
    ));
}

#[test]
fn failed_load_leaves_existing_books_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"[{"title":"Go","author":"A","isbn":"1"},{"title":"Bad","isbn":"2"}]"#,
    )
    .unwrap();

    let mut catalog = Catalog::new(NoopEventSink);
    catalog.add(Book::standard("Kept", "K", "k").unwrap());

    assert!(matches!(
        catalog.load(&path).unwrap(),
        LoadOutcome::CorruptionDetected(DecodeError::Entry { index: 1, .. })
    ));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.books()[0].title(), "Kept");
}

#[test]
fn load_of_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let mut catalog = Catalog::new(NoopEventSink);
    catalog.add(Book::standard("Kept", "K", "k").unwrap());

    let err = catalog.load(dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert_eq!(catalog.len(), 1);
}

#[test]
fn reset_catalog_overwrites_with_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, "{not valid json").unwrap();

    let mut catalog = Catalog::new(NoopEventSink);
    assert!(matches!(
        catalog.load(&path).unwrap(),
        LoadOutcome::CorruptionDetected(_)
    ));
    catalog.reset_catalog(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    assert!(catalog.is_empty());
    assert!(matches!(catalog.load(&path).unwrap(), LoadOutcome::Loaded(0)));
}

#[test]
fn backup_and_reset_preserves_corrupted_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let backup = default_backup_path(&path);
    fs::write(&path, "{not valid json").unwrap();

    let sink = MemoryEventSink::new();
    let mut catalog = Catalog::new(&sink);
    catalog.load(&path).unwrap();
    catalog.backup_and_reset(&path, &backup).unwrap();

    assert_eq!(backup, dir.path().join("catalog.backup.json"));
    assert_eq!(fs::read_to_string(&backup).unwrap(), "{not valid json");
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    let kinds = sink.events().into_iter().map(|e| e.kind).collect::<Vec<_>>();
    assert_eq!(kinds, vec![EventKind::CatalogLoad, EventKind::CatalogBackup]);
}

#[test]
fn backup_failure_does_not_reset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let mut catalog = Catalog::new(NoopEventSink);
    catalog.add(Book::standard("Kept", "K", "k").unwrap());

    let err = catalog
        .backup_and_reset(&path, dir.path().join("missing.backup.json"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(!path.exists());
    assert_eq!(catalog.len(), 1);
}

#[test]
fn unwritable_backup_keeps_corrupt_catalog_and_names_backup_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let backup = dir.path().join("catalog.backup.json");
    fs::write(&path, "{not valid json").unwrap();
    fs::create_dir_all(&backup).unwrap();

    let mut catalog = Catalog::new(NoopEventSink);
    catalog.load(&path).unwrap();
    let err = catalog.backup_and_reset(&path, &backup).unwrap_err();

    match err {
        StoreError::Io { path: failed, .. } => assert_eq!(failed, backup),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "{not valid json");
}

#[test]
fn abort_load_empties_memory_and_leaves_disk_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, "{not valid json").unwrap();

    let mut catalog = Catalog::new(NoopEventSink);
    catalog.add(Book::standard("Kept", "K", "k").unwrap());
    catalog.load(&path).unwrap();
    catalog.abort_load();

    assert!(catalog.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{not valid json");
}
