//! Availability-related read definitions.

use common::Money;

use crate::domain::{room, room_type};
#[cfg(doc)]
use crate::domain::{Block, Reservation, Room};

/// Outcome of an availability check of a [`Room`] for a stay.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Verdict {
    /// The [`Room`] may be booked for the stay.
    Available,

    /// The [`Room`] may not be booked for the stay.
    Unavailable(Reason),
}

impl Verdict {
    /// Indicates whether this [`Verdict`] allows booking.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Reason of a [`Verdict::Unavailable`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Reason {
    /// The [`Room`] doesn't host guests at all: deleted, inactive or under
    /// maintenance.
    RoomClosed,

    /// A [`Block`] holds the [`Room`] within the stay window.
    Blocked,

    /// Active [`Reservation`]s fill the [`Room`] within the stay window,
    /// beyond its overbooking allowance (if it has one).
    Booked,
}

/// [`Room`] open for a requested stay.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenRoom {
    /// ID of the [`Room`].
    pub id: room::Id,

    /// [`room::Number`] of the [`Room`].
    pub number: room::Number,

    /// ID of the [`RoomType`](crate::domain::RoomType) of the [`Room`].
    pub kind_id: room_type::Id,

    /// Number of guests the [`Room`] accommodates.
    pub capacity: room::Capacity,

    /// Current nightly rate of the [`Room`], before any multipliers.
    pub rate: Money,
}
