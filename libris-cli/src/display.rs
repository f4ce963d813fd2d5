//! Rendering of catalog rows and lookup outcomes.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use libris_catalog::{
    reservation_label, BookDetail, BookStatus, BookStatusRow, LookupOutcome, LookupTarget,
};

const SEPARATOR: &str = "----------------------------------------";

fn status_text(status: BookStatus) -> String {
    match status {
        BookStatus::Available => status
            .as_str()
            .if_supports_color(Stdout, |t| t.green())
            .to_string(),
        BookStatus::Reserved => status
            .as_str()
            .if_supports_color(Stdout, |t| t.yellow())
            .to_string(),
    }
}

/// Message shown when a lookup matched nothing.
pub(crate) fn not_found_message(target: LookupTarget) -> &'static str {
    match target {
        LookupTarget::Book | LookupTarget::Title => "Book not found.",
        LookupTarget::Reservation => "Reservation not found.",
    }
}

/// Every field of one book, plus its reservation while the book is `Reserved`.
/// An undated row left behind on an `Available` book is not shown.
pub(crate) fn print_book_detail(detail: &BookDetail) {
    for line in book_detail_lines(detail) {
        log::info!("{}", line);
    }
}

fn book_detail_lines(detail: &BookDetail) -> Vec<String> {
    let book = &detail.book;
    let mut lines = vec![
        format!("Book ID: {}", book.id.if_supports_color(Stdout, |t| t.bold())),
        format!("Title: {}", book.title),
        format!("Author: {}", book.author),
        format!("ISBN: {}", book.isbn),
        format!("Status: {}", status_text(book.status)),
    ];
    let reservation = detail
        .reservation
        .as_ref()
        .filter(|_| book.status == BookStatus::Reserved);
    if let Some(r) = reservation {
        lines.push(format!(
            "Reservation: {}",
            reservation_label(r.reservation_id).if_supports_color(Stdout, |t| t.cyan())
        ));
        lines.push(format!("Reserved by: {}", r.user_id));
        lines.push(format!("User Name: {}", r.user_name));
        lines.push(format!("User Email: {}", r.user_email));
        if !r.date.is_empty() {
            lines.push(format!("Reserved on: {}", r.date));
        }
    }
    lines
}

/// All books, separated by a rule.
pub(crate) fn print_listing(books: &[BookDetail]) {
    if books.is_empty() {
        log::info!("No books found.");
        return;
    }
    for detail in books {
        print_book_detail(detail);
        log::info!("{}", SEPARATOR.if_supports_color(Stdout, |t| t.dimmed()));
    }
}

fn print_status_row(row: &BookStatusRow, with_id: bool) {
    if with_id {
        log::info!("Book ID: {}", row.book_id);
    }
    log::info!("Book Status: {}", status_text(row.status));
    if let Some(by) = &row.reserved_by {
        log::info!("Reserved by: {}", by.name);
        log::info!("User Email: {}", by.email);
    }
}

/// Print whatever the lookup dispatcher returned.
pub(crate) fn print_lookup(outcome: &LookupOutcome) {
    match outcome {
        LookupOutcome::BookStatus(row) => print_status_row(row, false),
        LookupOutcome::UserReservations(rows) => {
            for row in rows {
                log::info!("Book Title: {}", row.title);
                log::info!("Book Status: {}", status_text(row.status));
            }
        }
        LookupOutcome::Reservation(row) => {
            log::info!("Book Title: {}", row.title);
            log::info!("Book Status: {}", status_text(row.status));
            log::info!("Reserved by: {}", row.user_name);
        }
        LookupOutcome::TitleMatches(rows) => {
            for (i, row) in rows.iter().enumerate() {
                if i > 0 {
                    crate::log_blank();
                }
                print_status_row(row, true);
            }
        }
        LookupOutcome::NotFound(target) => log::info!("{}", not_found_message(*target)),
        LookupOutcome::NoReservations => log::info!("No reservations found for the user."),
    }
}
