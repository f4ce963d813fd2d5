use libris_catalog::*;
use libris_db::*;

fn book(id: &str, title: &str) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: "Frank Herbert".to_string(),
        isbn: format!("ISBN-{id}"),
        status: BookStatus::Available,
    }
}

fn user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.org", name.to_lowercase()),
    }
}

fn reserve(conn: &Connection, book_id: &str) {
    let update = BookUpdate {
        status: Some(BookStatus::Reserved),
        ..Default::default()
    };
    update_book(conn, book_id, &update).unwrap();
}

/// LB001 Dune (reserved by Alice), LB002 Emma (available),
/// LB003 Dune (reserved by Alice), LB004 Ulysses (reserved by Bob).
fn setup_db() -> Connection {
    let conn = open_memory().unwrap();
    upsert_user(&conn, &user("LUalice", "Alice")).unwrap();
    upsert_user(&conn, &user("LUbob", "Bob")).unwrap();
    upsert_user(&conn, &user("LUcarol", "Carol")).unwrap();

    for (id, title) in [
        ("LB001", "Dune"),
        ("LB002", "Emma"),
        ("LB003", "Dune"),
        ("LB004", "Ulysses"),
    ] {
        insert_book(&conn, &book(id, title)).unwrap();
    }

    insert_reservation(&conn, "LB001", "LUalice", "").unwrap();
    insert_reservation(&conn, "LB004", "LUbob", "").unwrap();
    insert_reservation(&conn, "LB003", "LUalice", "").unwrap();
    reserve(&conn, "LB001");
    reserve(&conn, "LB003");
    reserve(&conn, "LB004");
    conn
}

// ── By book ─────────────────────────────────────────────────────────────────

#[test]
fn created_book_looks_up_as_available() {
    let conn = open_memory().unwrap();
    let dune = Book {
        id: "LB001".to_string(),
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        isbn: "ISBN1".to_string(),
        status: BookStatus::Available,
    };
    insert_book(&conn, &dune).unwrap();

    let outcome = lookup(&conn, &LookupQuery::Book("LB001".to_string())).unwrap();
    assert_eq!(
        outcome,
        LookupOutcome::BookStatus(BookStatusRow {
            book_id: "LB001".to_string(),
            status: BookStatus::Available,
            reserved_by: None,
        })
    );
}

#[test]
fn reserved_book_lookup_names_the_user() {
    let conn = setup_db();
    let outcome = lookup(&conn, &LookupQuery::Book("LB001".to_string())).unwrap();
    let LookupOutcome::BookStatus(row) = outcome else {
        panic!("expected a book status row, got {outcome:?}");
    };
    assert_eq!(row.status, BookStatus::Reserved);
    assert_eq!(
        row.reserved_by,
        Some(ReservedBy {
            name: "Alice".to_string(),
            email: "alice@example.org".to_string(),
        })
    );
}

#[test]
fn released_book_hides_the_dormant_reservation() {
    let conn = setup_db();
    let release = BookUpdate {
        status: Some(BookStatus::Available),
        ..Default::default()
    };
    update_book(&conn, "LB004", &release).unwrap();

    let outcome = lookup_book_status(&conn, "LB004").unwrap();
    let LookupOutcome::BookStatus(row) = outcome else {
        panic!("expected a book status row, got {outcome:?}");
    };
    assert_eq!(row.status, BookStatus::Available);
    assert_eq!(row.reserved_by, None);
}

#[test]
fn unknown_book_is_not_found() {
    let conn = setup_db();
    assert_eq!(
        lookup(&conn, &LookupQuery::Book("LB999".to_string())).unwrap(),
        LookupOutcome::NotFound(LookupTarget::Book)
    );
}

// ── By user ─────────────────────────────────────────────────────────────────

#[test]
fn user_lookup_lists_reservations_in_insertion_order() {
    let conn = setup_db();
    // Give the second Dune a different title so the order is observable.
    let retitle = BookUpdate {
        title: Some("Dune Messiah".to_string()),
        ..Default::default()
    };
    update_book(&conn, "LB003", &retitle).unwrap();

    let outcome = lookup(&conn, &LookupQuery::User("LUalice".to_string())).unwrap();
    assert_eq!(
        outcome,
        LookupOutcome::UserReservations(vec![
            UserReservationRow {
                title: "Dune".to_string(),
                status: BookStatus::Reserved,
            },
            UserReservationRow {
                title: "Dune Messiah".to_string(),
                status: BookStatus::Reserved,
            },
        ])
    );
}

#[test]
fn user_without_reservations_is_distinct_from_not_found() {
    let conn = setup_db();
    assert_eq!(
        lookup(&conn, &LookupQuery::User("LUcarol".to_string())).unwrap(),
        LookupOutcome::NoReservations
    );
    assert_eq!(
        lookup(&conn, &LookupQuery::User("LUnobody".to_string())).unwrap(),
        LookupOutcome::NoReservations
    );
}

// ── By reservation ──────────────────────────────────────────────────────────

#[test]
fn reservation_lookup_returns_title_status_and_user() {
    let conn = setup_db();
    let bob_reservation = reservations_for_book(&conn, "LB004").unwrap()[0].id;

    let outcome = lookup(&conn, &LookupQuery::Reservation(bob_reservation)).unwrap();
    assert_eq!(
        outcome,
        LookupOutcome::Reservation(ReservationRow {
            reservation_id: bob_reservation,
            title: "Ulysses".to_string(),
            status: BookStatus::Reserved,
            user_name: "Bob".to_string(),
        })
    );
}

#[test]
fn unknown_reservation_is_not_found() {
    let conn = setup_db();
    assert_eq!(
        lookup(&conn, &LookupQuery::Reservation(9999)).unwrap(),
        LookupOutcome::NotFound(LookupTarget::Reservation)
    );
}

// ── By title ────────────────────────────────────────────────────────────────

#[test]
fn duplicate_titles_fan_out_in_insertion_order() {
    let conn = setup_db();
    let outcome = lookup(&conn, &LookupQuery::Title("Dune".to_string())).unwrap();
    let LookupOutcome::TitleMatches(rows) = outcome else {
        panic!("expected title matches, got {outcome:?}");
    };
    let ids: Vec<_> = rows.iter().map(|r| r.book_id.as_str()).collect();
    assert_eq!(ids, ["LB001", "LB003"]);
    assert!(rows.iter().all(|r| r.reserved_by.is_some()));
}

#[test]
fn available_title_match_has_no_user() {
    let conn = setup_db();
    let outcome = lookup_title(&conn, "Emma").unwrap();
    assert_eq!(
        outcome,
        LookupOutcome::TitleMatches(vec![BookStatusRow {
            book_id: "LB002".to_string(),
            status: BookStatus::Available,
            reserved_by: None,
        }])
    );
}

#[test]
fn title_match_is_exact() {
    let conn = setup_db();
    assert_eq!(
        lookup_title(&conn, "dune").unwrap(),
        LookupOutcome::NotFound(LookupTarget::Title)
    );
    assert_eq!(
        lookup_title(&conn, "Dun").unwrap(),
        LookupOutcome::NotFound(LookupTarget::Title)
    );
}

// ── Detail and listing ──────────────────────────────────────────────────────

#[test]
fn detail_of_unreserved_book_has_no_reservation() {
    let conn = setup_db();
    let detail = book_detail(&conn, "LB002").unwrap().unwrap();
    assert_eq!(detail.book, book("LB002", "Emma"));
    assert!(detail.reservation.is_none());
}

#[test]
fn detail_of_reserved_book_includes_reservation() {
    let conn = setup_db();
    let detail = book_detail(&conn, "LB004").unwrap().unwrap();
    let reservation = detail.reservation.unwrap();
    assert_eq!(reservation.user_id, "LUbob");
    assert_eq!(reservation.user_name, "Bob");
    assert_eq!(reservation.user_email, "bob@example.org");
    assert_eq!(reservation.date, PLACEHOLDER_RESERVATION_DATE);
}

#[test]
fn detail_of_unknown_book_is_none() {
    let conn = setup_db();
    assert!(book_detail(&conn, "LB999").unwrap().is_none());
}

#[test]
fn listing_has_one_row_per_book() {
    let conn = setup_db();
    let books = list_books(&conn).unwrap();
    let ids: Vec<_> = books.iter().map(|d| d.book.id.as_str()).collect();
    assert_eq!(ids, ["LB001", "LB002", "LB003", "LB004"]);
    assert_eq!(books.iter().filter(|d| d.reservation.is_some()).count(), 3);
}

#[test]
fn created_book_appears_unchanged_in_listing() {
    let conn = setup_db();
    let new_book = Book {
        id: "LB005".to_string(),
        title: "Middlemarch".to_string(),
        author: "George Eliot".to_string(),
        isbn: "978-0141439549".to_string(),
        status: BookStatus::Available,
    };
    insert_book(&conn, &new_book).unwrap();

    let books = list_books(&conn).unwrap();
    let matching: Vec<_> = books.iter().filter(|d| d.book.id == "LB005").collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].book, new_book);
    assert!(matching[0].reservation.is_none());
}

#[test]
fn empty_catalog_lists_nothing() {
    let conn = open_memory().unwrap();
    assert!(list_books(&conn).unwrap().is_empty());
}

// ── Invariant checks on read ────────────────────────────────────────────────

#[test]
fn second_reservation_row_is_reported_not_duplicated() {
    let conn = setup_db();
    // Bypass the engine to break the one-reservation rule.
    insert_reservation(&conn, "LB004", "LUcarol", "").unwrap();

    let err = list_books(&conn).unwrap_err();
    match err {
        OperationError::InvariantViolation(v) => {
            assert_eq!(v.book_id, "LB004");
            assert_eq!(v.kind, ViolationKind::MultipleReservations(2));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(lookup_book_status(&conn, "LB004").is_err());
    // Books that are fine still resolve on their own
    assert!(lookup_book_status(&conn, "LB002").is_ok());
}

#[test]
fn reserved_book_without_row_is_reported() {
    let conn = setup_db();
    conn.execute("DELETE FROM Reservations WHERE BookID = 'LB004'", [])
        .unwrap();

    let err = book_detail(&conn, "LB004").unwrap_err();
    assert!(matches!(
        err,
        OperationError::InvariantViolation(InvariantViolation {
            kind: ViolationKind::ReservedWithoutReservation,
            ..
        })
    ));
}

#[test]
fn stats_count_rows() {
    let conn = setup_db();
    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(
        stats,
        CatalogStats {
            books: 4,
            reserved: 3,
            users: 3,
            reservations: 3,
        }
    );
}
