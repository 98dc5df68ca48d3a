//! [`RoomType`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::room::Amenity;
#[cfg(doc)]
use crate::domain::Room;

/// Grouping of [`Room`]s sharing a base rate and amenity set.
///
/// A [`RoomType`] only groups: it doesn't own the lifecycle of its
/// [`Room`]s.
#[derive(Clone, Debug)]
pub struct RoomType {
    /// ID of this [`RoomType`].
    pub id: Id,

    /// [`Name`] of this [`RoomType`], unique within the hotel.
    pub name: Name,

    /// Default nightly rate of [`Room`]s of this [`RoomType`].
    pub base_rate: Money,

    /// Default number of guests [`Room`]s of this [`RoomType`] accommodate.
    pub capacity: Capacity,

    /// [`Amenity`]s every [`Room`] of this [`RoomType`] offers.
    pub amenities: Vec<Amenity>,

    /// [`DateTime`] when this [`RoomType`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`RoomType`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

/// ID of a [`RoomType`].
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

/// Name of a [`RoomType`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Number of guests accommodated by [`Room`]s of a [`RoomType`].
pub type Capacity = u16;

/// [`DateTime`] when a [`RoomType`] was created.
pub type CreationDateTime = DateTimeOf<(RoomType, unit::Creation)>;

/// [`DateTime`] when a [`RoomType`] was deleted.
pub type DeletionDateTime = DateTimeOf<(RoomType, unit::Deletion)>;
