//! [`Tariff`] definitions.

use common::{Date, MonthDay};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[cfg(doc)]
use crate::domain::{Reservation, Room, SpecialPrice};

/// Multiplier tables driving every [`Room`] price calculation not overridden
/// by a [`SpecialPrice`].
///
/// A [`Tariff`] is pure configuration: it's loaded once on startup and never
/// consults the database.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Tariff {
    /// Yearly recurring [`Season`]s, checked in declaration order with the
    /// first match winning.
    pub seasons: Vec<Season>,

    /// [`Weekend`] uplift applied on top of the seasonal multiplier.
    pub weekend: Weekend,

    /// [`OccupancyBand`]s, checked in declaration order with the first match
    /// winning.
    pub occupancy: Vec<OccupancyBand>,
}

impl Tariff {
    /// Returns the seasonal multiplier applying on the provided [`Date`].
    #[must_use]
    pub fn seasonal_multiplier(&self, date: Date) -> Decimal {
        self.seasons
            .iter()
            .find(|s| s.matches(date))
            .map_or(Decimal::ONE, |s| s.multiplier)
    }

    /// Returns the day-of-week multiplier applying on the provided [`Date`].
    #[must_use]
    pub fn weekday_multiplier(&self, date: Date) -> Decimal {
        let day = Weekday::from(date.weekday());
        if self.weekend.days.contains(&day) {
            self.weekend.multiplier
        } else {
            Decimal::ONE
        }
    }

    /// Returns the multiplier of the first [`OccupancyBand`] matching the
    /// provided occupancy `rate` (a `0.0..=1.0` ratio of occupied
    /// [`Room`]s).
    #[must_use]
    pub fn occupancy_multiplier(&self, rate: Decimal) -> Decimal {
        self.occupancy
            .iter()
            .find(|b| b.matches(rate))
            .map_or(Decimal::ONE, |b| b.multiplier)
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            seasons: vec![
                Season::new((6, 1), (8, 31), Decimal::new(15, 1)),
                Season::new((12, 15), (1, 5), Decimal::new(20, 1)),
                Season::new((1, 6), (5, 31), Decimal::new(8, 1)),
                Season::new((9, 1), (12, 14), Decimal::new(8, 1)),
            ],
            weekend: Weekend::default(),
            occupancy: vec![
                OccupancyBand {
                    at_least: Some(Decimal::new(9, 1)),
                    at_most: None,
                    multiplier: Decimal::new(13, 1),
                },
                OccupancyBand {
                    at_least: Some(Decimal::new(7, 1)),
                    at_most: None,
                    multiplier: Decimal::new(11, 1),
                },
                OccupancyBand {
                    at_least: None,
                    at_most: Some(Decimal::new(3, 1)),
                    multiplier: Decimal::new(9, 1),
                },
            ],
        }
    }
}

/// Yearly recurring window of days carrying a price multiplier.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Season {
    /// First [`MonthDay`] of this [`Season`], in any year.
    pub since: MonthDay,

    /// Last [`MonthDay`] of this [`Season`] (inclusive), in any year.
    ///
    /// An `until` preceding `since` wraps the year end: such a [`Season`]
    /// matches both the tail of one year and the head of the next.
    pub until: MonthDay,

    /// Multiplier applied to the nightly rate within this [`Season`].
    pub multiplier: Decimal,
}

impl Season {
    // Only called with the literal default tables above.
    #[expect(clippy::unwrap_used, reason = "statically valid")]
    fn new(since: (u8, u8), until: (u8, u8), multiplier: Decimal) -> Self {
        Self {
            since: MonthDay::new(since.0, since.1).unwrap(),
            until: MonthDay::new(until.0, until.1).unwrap(),
            multiplier,
        }
    }

    /// Indicates whether this [`Season`] covers the provided [`Date`], in
    /// whatever year it falls.
    #[must_use]
    pub fn matches(&self, date: Date) -> bool {
        let day = date.month_day();
        if self.since <= self.until {
            self.since <= day && day <= self.until
        } else {
            day >= self.since || day <= self.until
        }
    }
}

/// Days of the week carrying a price multiplier.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Weekend {
    /// [`Weekday`]s this [`Weekend`] consists of.
    pub days: Vec<Weekday>,

    /// Multiplier applied to the nightly rate on the [`Weekend::days`].
    pub multiplier: Decimal,
}

impl Default for Weekend {
    fn default() -> Self {
        Self {
            days: vec![Weekday::Friday, Weekday::Saturday],
            multiplier: Decimal::new(12, 1),
        }
    }
}

/// Day of the week.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumString,
    Eq,
    Hash,
    PartialEq,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Weekday {
    /// Monday.
    Monday,

    /// Tuesday.
    Tuesday,

    /// Wednesday.
    Wednesday,

    /// Thursday.
    Thursday,

    /// Friday.
    Friday,

    /// Saturday.
    Saturday,

    /// Sunday.
    Sunday,
}

impl From<time::Weekday> for Weekday {
    fn from(day: time::Weekday) -> Self {
        match day {
            time::Weekday::Monday => Self::Monday,
            time::Weekday::Tuesday => Self::Tuesday,
            time::Weekday::Wednesday => Self::Wednesday,
            time::Weekday::Thursday => Self::Thursday,
            time::Weekday::Friday => Self::Friday,
            time::Weekday::Saturday => Self::Saturday,
            time::Weekday::Sunday => Self::Sunday,
        }
    }
}

/// Occupancy range carrying a price multiplier.
///
/// Bounds are inclusive; an omitted bound is unconstrained.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OccupancyBand {
    /// Lower occupancy bound of this [`OccupancyBand`], if any.
    #[serde(default)]
    pub at_least: Option<Decimal>,

    /// Upper occupancy bound of this [`OccupancyBand`], if any.
    #[serde(default)]
    pub at_most: Option<Decimal>,

    /// Multiplier applied to the nightly rate within this
    /// [`OccupancyBand`].
    pub multiplier: Decimal,
}

impl OccupancyBand {
    /// Indicates whether this [`OccupancyBand`] covers the provided
    /// occupancy `rate`.
    #[must_use]
    pub fn matches(&self, rate: Decimal) -> bool {
        self.at_least.map_or(true, |b| rate >= b)
            && self.at_most.map_or(true, |b| rate <= b)
    }
}

#[cfg(test)]
mod spec {
    use common::Date;
    use rust_decimal::Decimal;

    use super::Tariff;

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    #[test]
    fn summer_season_covers_its_boundary_days() {
        let tariff = Tariff::default();

        assert_eq!(
            tariff.seasonal_multiplier(date(2024, 6, 1)),
            Decimal::new(15, 1),
        );
        assert_eq!(
            tariff.seasonal_multiplier(date(2024, 8, 31)),
            Decimal::new(15, 1),
        );
        assert_eq!(
            tariff.seasonal_multiplier(date(2024, 9, 1)),
            Decimal::new(8, 1),
        );
    }

    #[test]
    fn holiday_season_wraps_the_year_end() {
        let tariff = Tariff::default();

        assert_eq!(
            tariff.seasonal_multiplier(date(2024, 12, 15)),
            Decimal::new(20, 1),
        );
        assert_eq!(
            tariff.seasonal_multiplier(date(2024, 12, 31)),
            Decimal::new(20, 1),
        );
        assert_eq!(
            tariff.seasonal_multiplier(date(2025, 1, 5)),
            Decimal::new(20, 1),
        );
        assert_eq!(
            tariff.seasonal_multiplier(date(2025, 1, 6)),
            Decimal::new(8, 1),
        );
        assert_eq!(
            tariff.seasonal_multiplier(date(2024, 12, 14)),
            Decimal::new(8, 1),
        );
    }

    #[test]
    fn first_declared_season_wins_on_overlap() {
        let mut tariff = Tariff::default();
        tariff.seasons.swap(0, 2);

        // 2024-05-31 is a shoulder day whichever order seasons come in, but
        // reordering must not change which multiplier a summer day gets.
        assert_eq!(
            tariff.seasonal_multiplier(date(2024, 7, 15)),
            Decimal::new(15, 1),
        );
    }

    #[test]
    fn weekend_uplift_applies_on_friday_and_saturday_only() {
        let tariff = Tariff::default();

        // 2024-07-05 is a Friday.
        assert_eq!(
            tariff.weekday_multiplier(date(2024, 7, 5)),
            Decimal::new(12, 1),
        );
        assert_eq!(
            tariff.weekday_multiplier(date(2024, 7, 6)),
            Decimal::new(12, 1),
        );
        assert_eq!(tariff.weekday_multiplier(date(2024, 7, 7)), Decimal::ONE);
        assert_eq!(tariff.weekday_multiplier(date(2024, 7, 8)), Decimal::ONE);
    }

    #[test]
    fn occupancy_bands_match_in_declaration_order() {
        let tariff = Tariff::default();

        assert_eq!(
            tariff.occupancy_multiplier(Decimal::new(95, 2)),
            Decimal::new(13, 1),
        );
        assert_eq!(
            tariff.occupancy_multiplier(Decimal::new(9, 1)),
            Decimal::new(13, 1),
        );
        assert_eq!(
            tariff.occupancy_multiplier(Decimal::new(7, 1)),
            Decimal::new(11, 1),
        );
        assert_eq!(
            tariff.occupancy_multiplier(Decimal::new(5, 1)),
            Decimal::ONE,
        );
        assert_eq!(
            tariff.occupancy_multiplier(Decimal::new(3, 1)),
            Decimal::new(9, 1),
        );
        assert_eq!(
            tariff.occupancy_multiplier(Decimal::ZERO),
            Decimal::new(9, 1),
        );
    }
}
