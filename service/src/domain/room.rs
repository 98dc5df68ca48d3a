//! [`Room`] definitions.

use std::fmt;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::room_type;
#[cfg(doc)]
use crate::domain::{Block, Reservation, RoomType, WaitlistEntry};

/// Bookable hotel room.
#[derive(Clone, Debug)]
pub struct Room {
    /// ID of this [`Room`].
    pub id: Id,

    /// [`Number`] of this [`Room`], unique within the hotel.
    pub number: Number,

    /// ID of the [`RoomType`] this [`Room`] belongs to.
    pub kind_id: room_type::Id,

    /// Floor this [`Room`] is located on.
    pub floor: Floor,

    /// Number of guests this [`Room`] accommodates.
    pub capacity: Capacity,

    /// Current nightly rate of this [`Room`], used as the base of every
    /// multiplier-driven price calculation.
    pub rate: Money,

    /// [`Status`] of this [`Room`].
    pub status: Status,

    /// [`Amenity`]s this [`Room`] offers.
    pub amenities: Vec<Amenity>,

    /// Indicator whether guests may queue for this [`Room`] via
    /// [`WaitlistEntry`]s when it's unavailable.
    pub allow_waitlist: bool,

    /// Indicator whether this [`Room`] accepts [`Reservation`]s beyond its
    /// physical capacity.
    pub allow_overbooking: bool,

    /// Maximum number of overbooked [`Reservation`]s this [`Room`] accepts
    /// in any window, if it allows overbooking at all.
    pub max_overbooking: MaxOverbooking,

    /// [`DateTime`] when this [`Room`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Room`] was deleted, if it was.
    ///
    /// Deleted [`Room`]s are kept forever to preserve the booking history
    /// referring to them.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Room {
    /// Indicates whether this [`Room`] may host guests at all: not deleted
    /// and in the [`Status::Active`] state.
    ///
    /// [`Block`]s and [`Reservation`]s further constrain an open [`Room`]
    /// per date.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.deleted_at.is_none() && self.status == Status::Active
    }
}

/// ID of a [`Room`].
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

/// Number of a [`Room`], as printed on its door.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Number`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Number`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        number.trim() == number && !number.is_empty() && number.len() <= 16
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Number`")
    }
}

/// Floor a [`Room`] is located on.
pub type Floor = i16;

/// Number of guests a [`Room`] accommodates.
pub type Capacity = u16;

/// Maximum number of overbooked [`Reservation`]s a [`Room`] accepts.
pub type MaxOverbooking = u16;

define_kind! {
    #[doc = "Status of a [`Room`]."]
    enum Status {
        #[doc = "The [`Room`] hosts guests."]
        Active = 1,

        #[doc = "The [`Room`] is withdrawn from service."]
        Inactive = 2,

        #[doc = "The [`Room`] is under maintenance."]
        Maintenance = 3,
    }
}

/// Amenity a [`Room`] offers.
///
/// The known set is deliberately small; anything outside it travels as
/// [`Amenity::Other`] with its raw tag preserved.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Amenity {
    /// Air conditioning.
    AirConditioning,

    /// Private balcony.
    Balcony,

    /// Stocked minibar.
    Minibar,

    /// Sea view.
    SeaView,

    /// Television.
    Tv,

    /// Wireless internet access.
    Wifi,

    /// Amenity outside the known set.
    Other(String),
}

impl Amenity {
    /// Returns the canonical tag of this [`Amenity`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AirConditioning => "air_conditioning",
            Self::Balcony => "balcony",
            Self::Minibar => "minibar",
            Self::SeaView => "sea_view",
            Self::Tv => "tv",
            Self::Wifi => "wifi",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Amenity {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "air_conditioning" => Self::AirConditioning,
            "balcony" => Self::Balcony,
            "minibar" => Self::Minibar,
            "sea_view" => Self::SeaView,
            "tv" => Self::Tv,
            "wifi" => Self::Wifi,
            _ => Self::Other(tag),
        }
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// [`DateTime`] when a [`Room`] was created.
pub type CreationDateTime = DateTimeOf<(Room, unit::Creation)>;

/// [`DateTime`] when a [`Room`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Room, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use super::Amenity;

    #[test]
    fn amenity_tags_round_trip() {
        let known =
            ["air_conditioning", "balcony", "minibar", "sea_view", "tv", "wifi"];
        for tag in known {
            let amenity = Amenity::from(tag.to_owned());
            assert!(!matches!(amenity, Amenity::Other(_)), "{tag}");
            assert_eq!(amenity.as_str(), tag);
        }

        let other = Amenity::from("rooftop_jacuzzi".to_owned());
        assert_eq!(other, Amenity::Other("rooftop_jacuzzi".into()));
        assert_eq!(other.as_str(), "rooftop_jacuzzi");
    }
}
