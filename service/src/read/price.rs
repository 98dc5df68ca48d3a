//! Price-related read definitions.

use common::{Date, Money};
use derive_more::Deref;
use rust_decimal::Decimal;

use crate::domain::special_price;
#[cfg(doc)]
use crate::domain::{Room, SpecialPrice, Tariff};

/// Priced stay of a [`Room`].
#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    /// Sum of all the [`Night`]s of the stay.
    pub total: Money,

    /// Number of charged nights (checkout day is never charged).
    pub nights: u32,

    /// Per-night breakdown, in chronological order.
    pub breakdown: Vec<Night>,
}

/// Price of a single night along with the way it was derived.
#[derive(Clone, Debug, PartialEq)]
pub struct Night {
    /// [`Date`] of the night.
    pub date: Date,

    /// Charged amount.
    pub amount: Money,

    /// [`Source`] the amount was derived from.
    pub source: Source,
}

/// Source of a [`Night`]'s price.
#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    /// Verbatim [`SpecialPrice`], bypassing every multiplier.
    Special {
        /// ID of the applied [`SpecialPrice`].
        id: special_price::Id,

        /// [`special_price::Label`] of the applied [`SpecialPrice`].
        label: special_price::Label,
    },

    /// Multiplier-driven [`Tariff`] calculation over the [`Room`]'s nightly
    /// rate.
    Tariff {
        /// Applied seasonal multiplier.
        seasonal: Decimal,

        /// Applied day-of-week multiplier.
        weekday: Decimal,

        /// Applied occupancy multiplier.
        occupancy: Decimal,
    },
}

/// Share of [`Room`]s occupied on a day, as a `0.0..=1.0` ratio.
///
/// A hotel without any [`Room`]s counts as fully vacant.
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct Occupancy(pub Decimal);
