//! Booking model and its status/state enums.
//!
//! `BookingStatus` is the persisted lifecycle status of a booking.
//! `BookingState` is the filter vocabulary accepted by the booking listing
//! endpoints; it never appears in storage.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifecycle status of a booking.
///
/// A booking is created as `Waiting` and is moved exactly once by the item
/// owner to `Approved` or `Rejected`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
        }
    }
}

impl diesel::query_builder::QueryId for BookingStatus {
    type QueryId = BookingStatus;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for BookingStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for BookingStatus {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            _ => Err(format!("Unrecognized booking status: {}", s).into()),
        }
    }
}

/// State filter accepted by the booking listing endpoints.
///
/// `Waiting` and `Rejected` select by stored status; the rest select by the
/// booking window relative to "now". Parsing an unrecognized value is a
/// distinct client error surfaced as `Unknown state: X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl FromStr for BookingState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            other => Err(AppError::UnknownState {
                state: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// Booking model for reading from database
#[derive(Debug, Queryable, Selectable, Clone, PartialEq)]
#[diesel(table_name = crate::schema::bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Booking {
    pub id: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub item_id: i32,
    pub booker_id: i32,
    pub status: BookingStatus,
}

/// NewBooking model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub item_id: i32,
    pub booker_id: i32,
    pub status: BookingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_state() {
        for (text, state) in [
            ("ALL", BookingState::All),
            ("CURRENT", BookingState::Current),
            ("PAST", BookingState::Past),
            ("FUTURE", BookingState::Future),
            ("WAITING", BookingState::Waiting),
            ("REJECTED", BookingState::Rejected),
        ] {
            assert_eq!(text.parse::<BookingState>().unwrap(), state);
            assert_eq!(state.to_string(), text);
        }
    }

    #[test]
    fn unknown_state_carries_the_original_value() {
        let err = "BOGUS".parse::<BookingState>().unwrap_err();
        match err {
            AppError::UnknownState { state } => assert_eq!(state, "BOGUS"),
            other => panic!("expected UnknownState, got {:?}", other),
        }
        assert_eq!(
            "BOGUS".parse::<BookingState>().unwrap_err().to_string(),
            "Unknown state: BOGUS"
        );
    }

    #[test]
    fn state_parsing_is_case_sensitive() {
        assert!("waiting".parse::<BookingState>().is_err());
    }

    #[test]
    fn status_round_trips_through_its_wire_name() {
        assert_eq!(BookingStatus::Waiting.as_str(), "WAITING");
        assert_eq!(BookingStatus::Approved.as_str(), "APPROVED");
        assert_eq!(BookingStatus::Rejected.as_str(), "REJECTED");
    }
}
