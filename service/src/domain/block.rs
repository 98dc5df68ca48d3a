//! [`Block`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Date, DateTimeOf, Stay};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{room, staff};
#[cfg(doc)]
use crate::domain::{Reservation, Room};

/// Administrative hold removing a [`Room`] from availability, regardless of
/// its [`Reservation`]s.
///
/// A [`Block`] is created only when it wouldn't conflict with an existing
/// confirmed [`Reservation`]: administrative holds must not retroactively
/// break guest commitments.
#[derive(Clone, Debug)]
pub struct Block {
    /// ID of this [`Block`].
    pub id: Id,

    /// ID of the [`Room`] this [`Block`] holds.
    pub room_id: room::Id,

    /// [`Reason`] of this [`Block`].
    pub reason: Reason,

    /// First day this [`Block`] holds the [`Room`] on.
    pub since: Date,

    /// Last day this [`Block`] holds the [`Room`] on (inclusive).
    ///
    /// [`None`] keeps the [`Block`] active until it's explicitly removed.
    pub until: Option<Date>,

    /// [`Priority`] of this [`Block`] among others of the same [`Room`].
    pub priority: Priority,

    /// Free-form [`Note`] on this [`Block`], if any.
    pub note: Option<Note>,

    /// ID of the staff member who created this [`Block`].
    pub created_by: staff::Id,

    /// [`DateTime`] when this [`Block`] was created.
    pub created_at: CreationDateTime,
}

impl Block {
    /// Indicates whether this [`Block`] constrains the provided [`Stay`].
    ///
    /// An open-ended [`Block`] constrains every [`Stay`] ending after the
    /// day it begins on.
    #[must_use]
    pub fn intersects(&self, stay: &Stay) -> bool {
        self.since < stay.check_out()
            && self.until.map_or(true, |until| stay.check_in() <= until)
    }

    /// Indicates whether this [`Block`] holds its [`Room`] on the provided
    /// [`Date`].
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.since <= date && self.until.map_or(true, |until| date <= until)
    }
}

/// ID of a [`Block`].
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

/// Reason of a [`Block`].
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
        reason.trim() == reason && !reason.is_empty() && reason.len() <= 128
    }
}

impl FromStr for Reason {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Reason`")
    }
}

/// Free-form note on a [`Block`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Note(String);

impl Note {
    /// Creates a new [`Note`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `note` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(note: impl Into<String>) -> Self {
        Self(note.into())
    }

    /// Creates a new [`Note`] if the given `note` is valid.
    #[must_use]
    pub fn new(note: impl Into<String>) -> Option<Self> {
        let note = note.into();
        Self::check(&note).then_some(Self(note))
    }

    /// Checks whether the given `note` is a valid [`Note`].
    fn check(note: impl AsRef<str>) -> bool {
        let note = note.as_ref();
        note.trim() == note && !note.is_empty() && note.len() <= 1024
    }
}

impl FromStr for Note {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Note`")
    }
}

/// Priority of a [`Block`] among others of the same [`Room`].
pub type Priority = i16;

/// [`DateTime`] when a [`Block`] was created.
pub type CreationDateTime = DateTimeOf<(Block, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Date, Stay};

    use crate::domain::{room, staff};

    use super::{Block, Id, Reason};

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    fn block(since: Date, until: Option<Date>) -> Block {
        Block {
            id: Id::new(),
            room_id: room::Id::new(),
            reason: Reason::new("deep cleaning").unwrap(),
            since,
            until,
            priority: 1,
            note: None,
            created_by: staff::Id::new(),
            created_at: common::DateTime::now().coerce(),
        }
    }

    #[test]
    fn open_ended_block_constrains_everything_after_its_start() {
        let block = block(date(2024, 7, 1), None);

        let after = Stay::new(date(2024, 7, 10), date(2024, 7, 12)).unwrap();
        let before = Stay::new(date(2024, 6, 10), date(2024, 6, 12)).unwrap();
        let ending_on_start =
            Stay::new(date(2024, 6, 28), date(2024, 7, 1)).unwrap();
        let crossing = Stay::new(date(2024, 6, 28), date(2024, 7, 2)).unwrap();

        assert!(block.intersects(&after));
        assert!(!block.intersects(&before));
        assert!(!block.intersects(&ending_on_start));
        assert!(block.intersects(&crossing));
    }

    #[test]
    fn bounded_block_frees_the_room_past_its_last_day() {
        let block = block(date(2024, 7, 1), Some(date(2024, 7, 5)));

        let inside = Stay::new(date(2024, 7, 4), date(2024, 7, 6)).unwrap();
        let after = Stay::new(date(2024, 7, 6), date(2024, 7, 8)).unwrap();
        let starting_on_last =
            Stay::new(date(2024, 7, 5), date(2024, 7, 7)).unwrap();

        assert!(block.intersects(&inside));
        assert!(!block.intersects(&after));
        assert!(block.intersects(&starting_on_last));
    }

    #[test]
    fn reason_parses_from_trimmed_non_empty_text() {
        assert!("deep cleaning".parse::<Reason>().is_ok());
        assert!(" padded ".parse::<Reason>().is_err());
        assert!("".parse::<Reason>().is_err());
    }

    #[test]
    fn covers_is_inclusive_of_both_boundary_days() {
        let block = block(date(2024, 7, 1), Some(date(2024, 7, 5)));

        assert!(!block.covers(date(2024, 6, 30)));
        assert!(block.covers(date(2024, 7, 1)));
        assert!(block.covers(date(2024, 7, 5)));
        assert!(!block.covers(date(2024, 7, 6)));
    }
}
