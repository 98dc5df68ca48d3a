//! [`Reservation`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money, Stay};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{guest, room};
#[cfg(doc)]
use crate::domain::Room;

/// Guest booking of a [`Room`] for a [`Stay`].
///
/// Owned by the booking subsystem and consumed here mostly read-only; the
/// one write path hosted by this crate is the transactional
/// check-then-insert guaranteeing at most one confirmed [`Reservation`] per
/// [`Room`] per overlapping window.
#[derive(Clone, Debug)]
pub struct Reservation {
    /// ID of this [`Reservation`].
    pub id: Id,

    /// ID of the booked [`Room`].
    pub room_id: room::Id,

    /// ID of the guest holding this [`Reservation`].
    pub guest_id: guest::Id,

    /// Booked [`Stay`].
    pub stay: Stay,

    /// [`Status`] of this [`Reservation`].
    pub status: Status,

    /// Indicator whether this [`Reservation`] was accepted beyond the
    /// [`Room`]'s physical capacity, within its overbooking allowance.
    pub is_overbooked: bool,

    /// Total amount charged for the whole [`Stay`].
    pub total: Money,

    /// [`DateTime`] when this [`Reservation`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Reservation`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Reservation {
    /// Indicates whether this [`Reservation`] holds its [`Room`]: only
    /// confirmed or checked-in stays conflict with new bookings.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
            && matches!(self.status, Status::Confirmed | Status::CheckedIn)
    }
}

/// ID of a [`Reservation`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`Reservation`]."]
    enum Status {
        #[doc = "Awaiting confirmation; doesn't hold the [`Room`] yet."]
        Pending = 1,

        #[doc = "Confirmed; holds the [`Room`]."]
        Confirmed = 2,

        #[doc = "The guest has checked in; holds the [`Room`]."]
        CheckedIn = 3,

        #[doc = "The guest has checked out."]
        CheckedOut = 4,

        #[doc = "Cancelled before check-in."]
        Cancelled = 5,

        #[doc = "The guest never arrived."]
        NoShow = 6,
    }
}

/// [`DateTime`] when a [`Reservation`] was created.
pub type CreationDateTime = DateTimeOf<(Reservation, unit::Creation)>;

/// [`DateTime`] when a [`Reservation`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Reservation, unit::Deletion)>;
