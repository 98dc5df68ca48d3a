//! [`WaitlistEntry`]-related definitions.

use common::{Date, DateTime};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// Queued guest request for a currently unavailable `Room` and stay.
#[derive(Clone, Debug, From)]
pub struct WaitlistEntry(domain::WaitlistEntry);

/// Queued guest request for a currently unavailable `Room` and stay.
#[graphql_object(context = Context)]
impl WaitlistEntry {
    /// Unique identifier of this `WaitlistEntry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "WaitlistEntry.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Awaited `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "WaitlistEntry.room",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn room(&self) -> api::Room {
        #[expect(
            unsafe_code,
            reason = "`WaitlistEntry` refers an existing `Room`"
        )]
        unsafe {
            api::Room::new_unchecked(self.0.room_id)
        }
    }

    /// Waiting guest.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "WaitlistEntry.guestId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn guest_id(&self) -> api::guest::Id {
        self.0.guest_id.into()
    }

    /// Day the awaited stay checks in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "WaitlistEntry.checkIn",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn check_in(&self) -> Date {
        self.0.stay.check_in()
    }

    /// Day the awaited stay checks out.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "WaitlistEntry.checkOut",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn check_out(&self) -> Date {
        self.0.stay.check_out()
    }

    /// Status of this `WaitlistEntry`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "WaitlistEntry.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `WaitlistEntry` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "WaitlistEntry.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when the guest was notified the `Room` became free, if
    /// they were.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "WaitlistEntry.notifiedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn notified_at(&self) -> Option<DateTime> {
        self.0.notified_at.map(|at| at.coerce())
    }
}

/// Unique identifier of a `WaitlistEntry`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::waitlist::Id)]
#[into(domain::waitlist::Id)]
#[graphql(name = "WaitlistEntryId", transparent)]
pub struct Id(Uuid);

/// Status of a `WaitlistEntry`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "WaitlistEntryStatus")]
pub enum Status {
    /// Waiting for the `Room` to become free.
    Waiting,

    /// The guest was notified the `Room` became free.
    Notified,

    /// The check-in day passed without conversion.
    Expired,

    /// The guest converted the entry into a booking.
    Converted,
}

impl From<domain::waitlist::Status> for Status {
    fn from(status: domain::waitlist::Status) -> Self {
        use domain::waitlist::Status as S;

        match status {
            S::Waiting => Self::Waiting,
            S::Notified => Self::Notified,
            S::Expired => Self::Expired,
            S::Converted => Self::Converted,
        }
    }
}
