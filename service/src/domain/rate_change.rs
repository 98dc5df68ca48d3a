//! [`RateChange`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{room, staff};
#[cfg(doc)]
use crate::domain::Room;

/// Audit record of a [`Room`] nightly rate update.
///
/// Appended in the same transaction as the rate update itself, carrying the
/// staff member who performed it.
#[derive(Clone, Debug)]
pub struct RateChange {
    /// ID of this [`RateChange`].
    pub id: Id,

    /// ID of the re-priced [`Room`].
    pub room_id: room::Id,

    /// Nightly rate before the update.
    pub previous: Money,

    /// Nightly rate after the update.
    pub current: Money,

    /// [`Reason`] of the update, if one was given.
    pub reason: Option<Reason>,

    /// ID of the staff member who performed the update.
    pub performed_by: staff::Id,

    /// [`DateTime`] when the update was performed.
    pub created_at: CreationDateTime,
}

/// ID of a [`RateChange`].
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

/// Reason of a [`RateChange`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Reason(String);

impl Reason {
    /// Creates a new [`Reason`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `reason` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    /// Creates a new [`Reason`] if the given `reason` is valid.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Option<Self> {
        let reason = reason.into();
        Self::check(&reason).then_some(Self(reason))
    }

    /// Checks whether the given `reason` is a valid [`Reason`].
    fn check(reason: impl AsRef<str>) -> bool {
        let reason = reason.as_ref();
        reason.trim() == reason && !reason.is_empty() && reason.len() <= 512
    }
}

impl FromStr for Reason {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reason`")
    }
}

/// [`DateTime`] when a [`RateChange`] was performed.
pub type CreationDateTime = DateTimeOf<(RateChange, unit::Creation)>;
