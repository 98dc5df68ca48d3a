//! Availability-related definitions.

use common::{Date, Money};
use derive_more::From;
use juniper::{graphql_object, GraphQLEnum, GraphQLObject};
use service::read;

use crate::{api, Context};

/// Outcome of an availability check of a `Room` for a stay.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "AvailabilityVerdict")]
pub enum Verdict {
    /// The `Room` may be booked for the stay.
    Available,

    /// The `Room` doesn't host guests at all: deleted, inactive or under
    /// maintenance.
    RoomClosed,

    /// A `Block` holds the `Room` within the stay window.
    Blocked,

    /// Active `Reservation`s fill the `Room` within the stay window, beyond
    /// its overbooking allowance (if it has one).
    Booked,
}

impl From<read::availability::Verdict> for Verdict {
    fn from(verdict: read::availability::Verdict) -> Self {
        use read::availability::{Reason, Verdict as V};

        match verdict {
            V::Available => Self::Available,
            V::Unavailable(Reason::RoomClosed) => Self::RoomClosed,
            V::Unavailable(Reason::Blocked) => Self::Blocked,
            V::Unavailable(Reason::Booked) => Self::Booked,
        }
    }
}

/// `Room` open for a requested stay.
#[derive(Clone, Debug, From)]
pub struct OpenRoom(read::availability::OpenRoom);

/// `Room` open for a requested stay.
#[graphql_object(context = Context)]
impl OpenRoom {
    /// The open `Room` itself.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OpenRoom.room",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn room(&self) -> api::Room {
        #[expect(
            unsafe_code,
            reason = "`OpenRoom` is built from an existing `Room`"
        )]
        unsafe {
            api::Room::new_unchecked(self.0.id)
        }
    }

    /// Number of the open `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OpenRoom.number",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn number(&self) -> api::room::Number {
        self.0.number.clone().into()
    }

    /// `RoomType` of the open `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OpenRoom.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn kind(&self) -> api::RoomType {
        #[expect(
            unsafe_code,
            reason = "`OpenRoom` refers an existing `RoomType`"
        )]
        unsafe {
            api::RoomType::new_unchecked(self.0.kind_id)
        }
    }

    /// Number of guests the open `Room` accommodates.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OpenRoom.capacity",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn capacity(&self) -> i32 {
        i32::from(self.0.capacity)
    }

    /// Current nightly rate of the open `Room`, before any multipliers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OpenRoom.rate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn rate(&self) -> Money {
        self.0.rate
    }
}

/// Single day of a `Room`'s availability calendar.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "CalendarDay")]
pub struct Day {
    /// Date of the day.
    pub date: Date,

    /// Indicator whether the `Room` may be booked for the one-night stay
    /// starting this day.
    pub available: bool,

    /// Price of that one-night stay.
    pub price: Money,
}

impl From<read::calendar::Day> for Day {
    fn from(day: read::calendar::Day) -> Self {
        Self {
            date: day.date,
            available: day.available,
            price: day.price,
        }
    }
}
