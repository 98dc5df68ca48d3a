//! [`Reservation`]-related definitions.

use common::{Date, DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// Guest booking of a `Room` for a stay.
#[derive(Clone, Debug, From)]
pub struct Reservation(domain::Reservation);

/// Guest booking of a `Room` for a stay.
#[graphql_object(context = Context)]
impl Reservation {
    /// Unique identifier of this `Reservation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Booked `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.room",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn room(&self) -> api::Room {
        #[expect(
            unsafe_code,
            reason = "`Reservation` refers an existing `Room`"
        )]
        unsafe {
            api::Room::new_unchecked(self.0.room_id)
        }
    }

    /// Guest holding this `Reservation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.guestId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn guest_id(&self) -> api::guest::Id {
        self.0.guest_id.into()
    }

    /// Day the guest checks in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.checkIn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn check_in(&self) -> Date {
        self.0.stay.check_in()
    }

    /// Day the guest checks out (not charged for).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.checkOut",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn check_out(&self) -> Date {
        self.0.stay.check_out()
    }

    /// Status of this `Reservation`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Indicator whether this `Reservation` was accepted beyond the `Room`'s
    /// physical capacity, within its overbooking allowance.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.isOverbooked",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn is_overbooked(&self) -> bool {
        self.0.is_overbooked
    }

    /// Total amount charged for the whole stay.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.total",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn total(&self) -> Money {
        self.0.total
    }

    /// `DateTime` when this `Reservation` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Reservation.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Reservation`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::reservation::Id)]
#[into(domain::reservation::Id)]
#[graphql(name = "ReservationId", transparent)]
pub struct Id(Uuid);

/// Status of a `Reservation`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ReservationStatus")]
pub enum Status {
    /// Awaiting confirmation; doesn't hold the `Room` yet.
    Pending,

    /// Confirmed; holds the `Room`.
    Confirmed,

    /// The guest has checked in; holds the `Room`.
    CheckedIn,

    /// The guest has checked out.
    CheckedOut,

    /// Cancelled before check-in.
    Cancelled,

    /// The guest never arrived.
    NoShow,
}

impl From<domain::reservation::Status> for Status {
    fn from(status: domain::reservation::Status) -> Self {
        use domain::reservation::Status as S;

        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::CheckedIn => Self::CheckedIn,
            S::CheckedOut => Self::CheckedOut,
            S::Cancelled => Self::Cancelled,
            S::NoShow => Self::NoShow,
        }
    }
}
