//! [`WaitlistEntry`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf, Stay};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{guest, room};
#[cfg(doc)]
use crate::domain::Room;

/// Queued guest request for a currently unavailable [`Room`] and [`Stay`].
///
/// The guest is notified if the [`Room`] becomes free for the exact window
/// before its check-in day passes.
#[derive(Clone, Debug)]
pub struct WaitlistEntry {
    /// ID of this [`WaitlistEntry`].
    pub id: Id,

    /// ID of the awaited [`Room`].
    pub room_id: room::Id,

    /// ID of the waiting guest.
    pub guest_id: guest::Id,

    /// Awaited [`Stay`].
    pub stay: Stay,

    /// [`Status`] of this [`WaitlistEntry`].
    pub status: Status,

    /// [`DateTime`] when this [`WaitlistEntry`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when the guest was notified the [`Room`] became free,
    /// if they were.
    pub notified_at: Option<NotificationDateTime>,
}

impl WaitlistEntry {
    /// Indicates whether this [`WaitlistEntry`] still waits for its window
    /// as of the provided day: the guest hasn't been notified and the
    /// check-in day hasn't passed.
    #[must_use]
    pub fn is_waiting(&self, today: Date) -> bool {
        self.status == Status::Waiting && self.stay.check_in() >= today
    }
}

/// ID of a [`WaitlistEntry`].
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
    #[doc = "Status of a [`WaitlistEntry`]."]
    enum Status {
        #[doc = "Waiting for the [`Room`] to become free."]
        Waiting = 1,

        #[doc = "The guest was notified the [`Room`] became free."]
        Notified = 2,

        #[doc = "The check-in day passed without conversion."]
        Expired = 3,

        #[doc = "The guest converted the entry into a booking."]
        Converted = 4,
    }
}

/// [`DateTime`] when a [`WaitlistEntry`] was created.
pub type CreationDateTime = DateTimeOf<(WaitlistEntry, unit::Creation)>;

/// [`DateTime`] when the guest of a [`WaitlistEntry`] was notified.
pub type NotificationDateTime = DateTimeOf<(WaitlistEntry, unit::Notification)>;
