//! Classification of free-form lookup input.

use libris_catalog::LookupQuery;
use thiserror::Error;

/// Identifier prefixes for ID-based lookups.
const PREFIX_BOOK: &str = "LB";
const PREFIX_USER: &str = "LU";
const PREFIX_RESERVATION: &str = "LR";

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum QueryError {
    #[error("'{0}' is not a reservation id (expected LR followed by digits)")]
    MalformedReservationId(String),
}

/// Classify lookup input by its prefix.
///
/// Prefixes are case-sensitive and checked in the order book, user,
/// reservation. Anything else is an exact title. Surrounding whitespace is
/// ignored.
pub(crate) fn parse_query(input: &str) -> Result<LookupQuery, QueryError> {
    let input = input.trim();
    if input.starts_with(PREFIX_BOOK) {
        return Ok(LookupQuery::Book(input.to_string()));
    }
    if input.starts_with(PREFIX_USER) {
        return Ok(LookupQuery::User(input.to_string()));
    }
    if let Some(digits) = input.strip_prefix(PREFIX_RESERVATION) {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QueryError::MalformedReservationId(input.to_string()));
        }
        return digits
            .parse()
            .map(LookupQuery::Reservation)
            .map_err(|_| QueryError::MalformedReservationId(input.to_string()));
    }
    Ok(LookupQuery::Title(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_prefix() {
        assert_eq!(
            parse_query("LB001"),
            Ok(LookupQuery::Book("LB001".to_string()))
        );
    }

    #[test]
    fn user_prefix() {
        assert_eq!(
            parse_query("LU007"),
            Ok(LookupQuery::User("LU007".to_string()))
        );
    }

    #[test]
    fn reservation_prefix_carries_number() {
        assert_eq!(parse_query("LR5"), Ok(LookupQuery::Reservation(5)));
        assert_eq!(parse_query("LR0042"), Ok(LookupQuery::Reservation(42)));
    }

    #[test]
    fn reservation_without_digits_is_rejected() {
        for input in ["LR", "LRabc", "LR12x", "LR-3"] {
            assert_eq!(
                parse_query(input),
                Err(QueryError::MalformedReservationId(input.to_string()))
            );
        }
    }

    #[test]
    fn reservation_overflow_is_rejected() {
        assert!(parse_query("LR99999999999999999999999").is_err());
    }

    #[test]
    fn anything_else_is_a_title() {
        assert_eq!(
            parse_query("Dune"),
            Ok(LookupQuery::Title("Dune".to_string()))
        );
        // Lowercase prefixes are not identifiers.
        assert_eq!(
            parse_query("lb001"),
            Ok(LookupQuery::Title("lb001".to_string()))
        );
    }

    #[test]
    fn input_is_trimmed() {
        assert_eq!(
            parse_query("  LB002\n"),
            Ok(LookupQuery::Book("LB002".to_string()))
        );
        assert_eq!(parse_query("   "), Ok(LookupQuery::Title(String::new())));
    }
}
