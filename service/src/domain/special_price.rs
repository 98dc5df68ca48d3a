//! [`SpecialPrice`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Date, DateSpan, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{room, staff};
#[cfg(doc)]
use crate::domain::Room;

/// Fixed nightly price of a [`Room`] over an explicit window of days,
/// overriding every multiplier-driven calculation.
///
/// Windows of [`SpecialPrice`]s of the same [`Room`] never overlap: the
/// invariant is enforced at creation time.
#[derive(Clone, Debug)]
pub struct SpecialPrice {
    /// ID of this [`SpecialPrice`].
    pub id: Id,

    /// ID of the [`Room`] this [`SpecialPrice`] applies to.
    pub room_id: room::Id,

    /// Nightly price charged within the window.
    pub price: Money,

    /// Inclusive window of days this [`SpecialPrice`] applies on.
    pub span: DateSpan,

    /// [`Label`] naming the occasion of this [`SpecialPrice`].
    pub label: Label,

    /// Free-form [`Note`] on this [`SpecialPrice`], if any.
    pub note: Option<Note>,

    /// ID of the staff member who created this [`SpecialPrice`].
    pub created_by: staff::Id,

    /// [`DateTime`] when this [`SpecialPrice`] was created.
    pub created_at: CreationDateTime,
}

impl SpecialPrice {
    /// Indicates whether this [`SpecialPrice`] applies on the provided
    /// [`Date`].
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.span.contains(date)
    }
}

/// ID of a [`SpecialPrice`].
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

/// Label naming the occasion of a [`SpecialPrice`] (an event, a fair, a
/// promotion).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Label(String);

impl Label {
    /// Creates a new [`Label`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `label` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Creates a new [`Label`] if the given `label` is valid.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Option<Self> {
        let label = label.into();
        Self::check(&label).then_some(Self(label))
    }

    /// Checks whether the given `label` is a valid [`Label`].
    fn check(label: impl AsRef<str>) -> bool {
        let label = label.as_ref();
        label.trim() == label && !label.is_empty() && label.len() <= 128
    }
}

impl FromStr for Label {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Label`")
    }
}

/// Free-form note on a [`SpecialPrice`].
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

/// [`DateTime`] when a [`SpecialPrice`] was created.
pub type CreationDateTime = DateTimeOf<(SpecialPrice, unit::Creation)>;
