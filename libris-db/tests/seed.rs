use libris_catalog::*;
use libris_db::*;
use tempfile::TempDir;

const LIBRARY_YAML: &str = r#"
users:
  - id: LUalice
    name: Alice
    email: alice@example.org
  - id: LUbob
    name: Bob
    email: bob@example.org
books:
  - id: LB001
    title: Dune
    author: Frank Herbert
    isbn: ISBN1
    status: Reserved
  - id: LB002
    title: Emma
    author: Jane Austen
    isbn: ISBN2
    status: Available
reservations:
  - book_id: LB001
    user_id: LUalice
    date: "2023-10-02"
  - book_id: LB002
    user_id: LUbob
"#;

#[test]
fn seed_file_populates_all_relations() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("library.yaml");
    std::fs::write(&path, LIBRARY_YAML).unwrap();

    let conn = open_memory().unwrap();
    let stats = seed_from_file(&conn, &path).unwrap();
    assert_eq!(
        stats,
        SeedStats {
            users: 2,
            books: 2,
            reservations_created: 2,
            reservations_updated: 0,
        }
    );

    let outcome = lookup(&conn, &LookupQuery::User("LUalice".to_string())).unwrap();
    assert_eq!(
        outcome,
        LookupOutcome::UserReservations(vec![UserReservationRow {
            title: "Dune".to_string(),
            status: BookStatus::Reserved,
        }])
    );
    assert!(audit_consistency(&conn).unwrap().is_empty());
}

#[test]
fn reseeding_updates_instead_of_duplicating() {
    let seed = parse_seed(LIBRARY_YAML, "inline").unwrap();
    let conn = open_memory().unwrap();
    apply_seed(&conn, &seed).unwrap();
    let stats = apply_seed(&conn, &seed).unwrap();

    assert_eq!(stats.reservations_created, 0);
    assert_eq!(stats.reservations_updated, 2);
    assert_eq!(reservations_for_book(&conn, "LB001").unwrap().len(), 1);
}

#[test]
fn inconsistent_seed_is_rolled_back() {
    let seed = parse_seed(
        r#"
users:
  - { id: LUalice, name: Alice, email: alice@example.org }
books:
  - { id: LB001, title: Dune, author: Herbert, isbn: ISBN1, status: Reserved }
"#,
        "inline",
    )
    .unwrap();

    let conn = open_memory().unwrap();
    let err = apply_seed(&conn, &seed).unwrap_err();
    assert!(matches!(
        err,
        OperationError::InvariantViolation(InvariantViolation {
            kind: ViolationKind::ReservedWithoutReservation,
            ..
        })
    ));
    assert!(get_user(&conn, "LUalice").unwrap().is_none());
    assert!(get_book(&conn, "LB001").unwrap().is_none());
}

#[test]
fn seed_with_unknown_user_fails() {
    let seed = SeedData {
        books: vec![Book {
            id: "LB001".to_string(),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            isbn: "ISBN1".to_string(),
            status: BookStatus::Available,
        }],
        reservations: vec![SeedReservation {
            book_id: "LB001".to_string(),
            user_id: "LUghost".to_string(),
            date: String::new(),
        }],
        ..Default::default()
    };

    let conn = open_memory().unwrap();
    match apply_seed(&conn, &seed) {
        Err(OperationError::NotFound { entity_type, id }) => {
            assert_eq!(entity_type, "User");
            assert_eq!(id, "LUghost");
        }
        other => panic!("expected a missing user, got {other:?}"),
    }
    assert!(!book_exists(&conn, "LB001").unwrap());
}

#[test]
fn seed_link_to_unknown_book_fails() {
    let seed = SeedData {
        users: vec![User {
            id: "LUalice".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.org".to_string(),
        }],
        reservations: vec![SeedReservation {
            book_id: "LB404".to_string(),
            user_id: "LUalice".to_string(),
            date: String::new(),
        }],
        ..Default::default()
    };

    let conn = open_memory().unwrap();
    match apply_seed(&conn, &seed) {
        Err(OperationError::NotFound { entity_type, id }) => {
            assert_eq!(entity_type, "Book");
            assert_eq!(id, "LB404");
        }
        other => panic!("expected a missing book, got {other:?}"),
    }
    assert!(get_user(&conn, "LUalice").unwrap().is_none());
}

#[test]
fn empty_seed_writes_nothing() {
    let conn = open_memory().unwrap();
    let stats = apply_seed(&conn, &SeedData::default()).unwrap();
    assert_eq!(stats, SeedStats::default());
    assert_eq!(catalog_stats(&conn).unwrap(), CatalogStats::default());
}

#[test]
fn missing_seed_file_reports_seed_error() {
    let tmp = TempDir::new().unwrap();
    let conn = open_memory().unwrap();
    let err = seed_from_file(&conn, &tmp.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, OperationError::Seed(SeedError::Io { .. })));
}
