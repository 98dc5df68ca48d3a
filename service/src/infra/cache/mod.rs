//! [`Cache`]-related implementations.

pub mod memory;

use std::time::Duration;

use common::{Date, DateSpan, Stay};
use derive_more::{Display, Error as StdError, From, TryInto};
use smart_default::SmartDefault;

use crate::{
    domain::{room, room_type, Room},
    read,
};

pub use self::memory::Memory;

/// Cache operation.
pub use common::Handler as Cache;

/// Key of a cached [`Value`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Key {
    /// Price of a single night of a [`Room`].
    Price {
        /// ID of the [`Room`].
        room_id: room::Id,

        /// [`Date`] of the night.
        date: Date,
    },

    /// Availability [`read::availability::Verdict`] of a [`Room`] for a
    /// [`Stay`].
    Availability {
        /// ID of the [`Room`].
        room_id: room::Id,

        /// Checked [`Stay`].
        stay: Stay,
    },

    /// Result of an open [`Room`]s search.
    Search {
        /// ID of the requested [`RoomType`](crate::domain::RoomType), if
        /// the search was narrowed to one.
        kind_id: Option<room_type::Id>,

        /// Requested [`Stay`].
        stay: Stay,
    },

    /// Availability calendar of a [`Room`] over a [`DateSpan`].
    Calendar {
        /// ID of the [`Room`].
        room_id: room::Id,

        /// Covered [`DateSpan`].
        span: DateSpan,
    },

    /// [`Room`] metadata.
    Room {
        /// ID of the [`Room`].
        room_id: room::Id,
    },
}

impl Key {
    /// Returns the ID of the [`Room`] this [`Key`] belongs to.
    ///
    /// [`Key::Search`] entries aggregate many [`Room`]s and so belong to
    /// none in particular.
    #[must_use]
    pub fn room_id(&self) -> Option<room::Id> {
        match self {
            Self::Price { room_id, .. }
            | Self::Availability { room_id, .. }
            | Self::Calendar { room_id, .. }
            | Self::Room { room_id } => Some(*room_id),
            Self::Search { .. } => None,
        }
    }

    /// Returns the inclusive window of days this [`Key`] depends on.
    ///
    /// [`Key::Room`] entries hold date-independent metadata and so depend
    /// on none.
    #[must_use]
    pub fn span(&self) -> Option<DateSpan> {
        match self {
            Self::Price { date, .. } => Some(DateSpan::single(*date)),
            Self::Availability { stay, .. } | Self::Search { stay, .. } => {
                Some(stay.span())
            }
            Self::Calendar { span, .. } => Some(*span),
            Self::Room { .. } => None,
        }
    }
}

/// Cached payload, mirroring the read models the engines produce.
#[derive(Clone, Debug, From, TryInto)]
pub enum Value {
    /// Price of a single night.
    Night(read::price::Night),

    /// Availability verdict for a stay.
    Verdict(read::availability::Verdict),

    /// Result of an open [`Room`]s search.
    Search(Vec<read::availability::OpenRoom>),

    /// Availability calendar rows.
    Calendar(Vec<read::calendar::Day>),

    /// [`Room`] metadata.
    Room(Room),
}

/// Scope of a [`Cache`] invalidation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Scope {
    /// Every entry of the [`Room`], of every class, along with every
    /// [`Key::Search`] entry.
    Room(room::Id),

    /// Date-dependent entries of the [`Room`] whose window intersects the
    /// span, along with intersecting [`Key::Search`] entries.
    Span {
        /// ID of the [`Room`].
        room_id: room::Id,

        /// Affected inclusive window of days.
        span: DateSpan,
    },
}

impl Scope {
    /// Indicates whether this [`Scope`] covers the provided [`Key`], i.e.
    /// whether invalidating it must drop the entry.
    #[must_use]
    pub fn covers(&self, key: &Key) -> bool {
        match self {
            Self::Room(id) => key.room_id().map_or(true, |k| k == *id),
            Self::Span { room_id, span } => match key.room_id() {
                Some(k) => {
                    k == *room_id
                        && key.span().is_some_and(|s| s.overlaps(span))
                }
                None => key.span().is_some_and(|s| s.overlaps(span)),
            },
        }
    }
}

/// Time-to-live of a single [`Cache`] entry.
pub type Ttl = Duration;

/// [`Cache`] TTLs, per [`Key`] class.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// TTL of [`Key::Price`] entries.
    #[default(Duration::from_secs(60 * 60))]
    pub price: Ttl,

    /// TTL of [`Key::Availability`] entries.
    #[default(Duration::from_secs(60 * 60))]
    pub availability: Ttl,

    /// TTL of [`Key::Search`] entries.
    #[default(Duration::from_secs(60 * 60))]
    pub search: Ttl,

    /// TTL of [`Key::Calendar`] entries.
    #[default(Duration::from_secs(60 * 60))]
    pub calendar: Ttl,

    /// TTL of [`Key::Room`] entries.
    #[default(Duration::from_secs(24 * 60 * 60))]
    pub room: Ttl,
}

impl Config {
    /// Returns the TTL configured for the class of the provided [`Key`].
    #[must_use]
    pub fn ttl_of(&self, key: &Key) -> Ttl {
        match key {
            Key::Price { .. } => self.price,
            Key::Availability { .. } => self.availability,
            Key::Search { .. } => self.search,
            Key::Calendar { .. } => self.calendar,
            Key::Room { .. } => self.room,
        }
    }
}

/// [`Cache`] error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Backend couldn't serve the operation.
    #[display("cache backend unavailable")]
    Unavailable,
}
