//! Calendar-related read definitions.

use common::{Date, Money};

#[cfg(doc)]
use crate::domain::Room;

/// Single day of a [`Room`]'s availability calendar.
#[derive(Clone, Debug, PartialEq)]
pub struct Day {
    /// [`Date`] of the day.
    pub date: Date,

    /// Indicator whether the [`Room`] may be booked for the one-night stay
    /// starting this day.
    pub available: bool,

    /// Price of that one-night stay.
    pub price: Money,
}
