//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::BorrowedFormatItem, macros::format_description};

/// [ISO 8601] calendar date format (`YYYY-MM-DD`).
///
/// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
const ISO8601_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Single calendar day, with no time-of-day or timezone attached.
///
/// All hotel-night arithmetic is done in whole [`Date`]s: rates are nightly,
/// stays begin and end on day boundaries.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn new(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the current [`Date`] in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Creates a new [`Date`] from the provided [ISO 8601] (`YYYY-MM-DD`)
    /// string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [ISO 8601] date.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    pub fn from_iso8601(input: &str) -> Result<Self, ParseError> {
        time::Date::parse(input, ISO8601_DATE)
            .map(Self)
            .map_err(ParseError)
    }

    /// Returns the [`Date`] as an [ISO 8601] (`YYYY-MM-DD`) string.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.format(ISO8601_DATE).unwrap_or_else(|e| {
            panic!("cannot format `Date` as ISO 8601: {e}")
        })
    }

    /// Returns the day of the week this [`Date`] falls on.
    #[must_use]
    pub fn weekday(&self) -> time::Weekday {
        self.0.weekday()
    }

    /// Returns the year-agnostic [`MonthDay`] of this [`Date`].
    #[must_use]
    pub fn month_day(&self) -> MonthDay {
        MonthDay {
            month: u8::from(self.0.month()),
            day: self.0.day(),
        }
    }

    /// Returns the [`Date`] of the following day.
    ///
    /// [`None`] is returned on calendar overflow.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// Returns the [`Date`] of the preceding day.
    ///
    /// [`None`] is returned on calendar underflow.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.0.previous_day().map(Self)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso8601())
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso8601(s)
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub struct ParseError(time::error::Parse);

/// Day of a month, with no year attached.
///
/// Ordering is lexicographic over `(month, day)`, making it usable as a
/// boundary of a yearly recurring period.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MonthDay {
    /// Month number, `1..=12`.
    month: u8,

    /// Day of the month, `1..=31`.
    day: u8,
}

impl MonthDay {
    /// Creates a new [`MonthDay`] by checking the provided components form a
    /// valid day of a month (February 29 is considered valid).
    #[must_use]
    pub fn new(month: u8, day: u8) -> Option<Self> {
        ((1..=12).contains(&month) && (1..=Self::days_in(month)).contains(&day))
            .then_some(Self { month, day })
    }

    /// Returns the month number of this [`MonthDay`].
    #[must_use]
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the day of the month of this [`MonthDay`].
    #[must_use]
    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns the number of days in the provided month, in any year.
    fn days_in(month: u8) -> u8 {
        match month {
            2 => 29,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, day) = s.split_once('-').ok_or("missing `-` separator")?;
        let month = month.parse().map_err(|_| "invalid month")?;
        let day = day.parse().map_err(|_| "invalid day")?;
        Self::new(month, day).ok_or("no such day of month")
    }
}

/// Inclusive range of calendar days.
///
/// Used for whole-day windows (special prices, blocks, calendars) where both
/// boundary days belong to the range.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DateSpan {
    /// First day of this [`DateSpan`].
    since: Date,

    /// Last day of this [`DateSpan`].
    until: Date,
}

impl DateSpan {
    /// Creates a new [`DateSpan`] by checking `since` doesn't come after
    /// `until`.
    #[must_use]
    pub fn new(since: Date, until: Date) -> Option<Self> {
        (since <= until).then_some(Self { since, until })
    }

    /// Creates a new single-day [`DateSpan`].
    #[must_use]
    pub fn single(date: Date) -> Self {
        Self {
            since: date,
            until: date,
        }
    }

    /// Returns the first day of this [`DateSpan`].
    #[must_use]
    pub fn since(&self) -> Date {
        self.since
    }

    /// Returns the last day of this [`DateSpan`].
    #[must_use]
    pub fn until(&self) -> Date {
        self.until
    }

    /// Indicates whether the provided [`Date`] belongs to this [`DateSpan`].
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.since <= date && date <= self.until
    }

    /// Indicates whether this [`DateSpan`] shares at least one day with the
    /// provided one (both boundaries inclusive).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.since <= other.until && other.since <= self.until
    }

    /// Returns the number of days in this [`DateSpan`] (at least 1).
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn days(&self) -> u32 {
        let span = time::Date::from(self.until) - time::Date::from(self.since);
        u32::try_from(span.whole_days() + 1)
            .expect("non-negative by construction")
    }

    /// Returns an [`Iterator`] over the days of this [`DateSpan`], in
    /// ascending order.
    #[must_use]
    pub fn iter(&self) -> Iter {
        Iter {
            next: Some(self.since),
            until: self.until,
        }
    }
}

impl IntoIterator for DateSpan {
    type Item = Date;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// [`Iterator`] over the days of a [`DateSpan`].
#[derive(Clone, Copy, Debug)]
pub struct Iter {
    /// Next [`Date`] to yield.
    next: Option<Date>,

    /// Last [`Date`] to yield.
    until: Date,
}

impl Iterator for Iter {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.next.filter(|d| *d <= self.until)?;
        self.next = date.next();
        Some(date)
    }
}

/// Half-open guest stay: the check-in day is occupied, the check-out day is
/// not, so back-to-back stays may share a single calendar day without
/// conflicting.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Stay {
    /// Day the stay begins on.
    check_in: Date,

    /// Day the stay ends on (not occupied itself).
    check_out: Date,
}

impl Stay {
    /// Creates a new [`Stay`] by checking it lasts at least one night.
    #[must_use]
    pub fn new(check_in: Date, check_out: Date) -> Option<Self> {
        (check_in < check_out).then_some(Self {
            check_in,
            check_out,
        })
    }

    /// Creates a new one-night [`Stay`] occupying the provided [`Date`].
    ///
    /// [`None`] is returned on calendar overflow.
    #[must_use]
    pub fn single_night(date: Date) -> Option<Self> {
        date.next().and_then(|next| Self::new(date, next))
    }

    /// Returns the check-in [`Date`] of this [`Stay`].
    #[must_use]
    pub fn check_in(&self) -> Date {
        self.check_in
    }

    /// Returns the check-out [`Date`] of this [`Stay`].
    #[must_use]
    pub fn check_out(&self) -> Date {
        self.check_out
    }

    /// Returns the last occupied [`Date`] of this [`Stay`] (the day before
    /// check-out).
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn last_night(&self) -> Date {
        self.check_out.previous().expect("at least one night long")
    }

    /// Returns the number of nights of this [`Stay`] (at least 1).
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn nights(&self) -> u32 {
        let stay = time::Date::from(self.check_out)
            - time::Date::from(self.check_in);
        u32::try_from(stay.whole_days()).expect("positive by construction")
    }

    /// Returns the inclusive [`DateSpan`] of the occupied days of this
    /// [`Stay`].
    #[must_use]
    pub fn span(&self) -> DateSpan {
        DateSpan {
            since: self.check_in,
            until: self.last_night(),
        }
    }

    /// Returns an [`Iterator`] over the occupied days of this [`Stay`]
    /// (check-out day excluded), in ascending order.
    #[must_use]
    pub fn dates(&self) -> Iter {
        self.span().iter()
    }

    /// Indicates whether this [`Stay`] occupies at least one day together
    /// with the provided one.
    ///
    /// Half-open intervals `[a, b)` and `[c, d)` intersect iff `a < d` and
    /// `c < b`.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Indicates whether the provided [`Date`]'s night is occupied by this
    /// [`Stay`].
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.check_in <= date && date < self.check_out
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{
        de::Error as _, Deserialize, Deserializer, Serialize, Serializer,
    };

    use super::MonthDay;

    impl Serialize for MonthDay {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_string())
        }
    }

    impl<'de> Deserialize<'de> for MonthDay {
        fn deserialize<D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Self, D::Error> {
            String::deserialize(deserializer)?
                .parse()
                .map_err(D::Error::custom)
        }
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in [ISO 8601] (`YYYY-MM-DD`) format.
    ///
    /// [ISO 8601]: https://en.wikipedia.org/wiki/ISO_8601
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = super::Date;

    impl Date {
        fn to_output<S: ScalarValue>(date: &Date) -> Value<S> {
            Value::scalar(date.to_iso8601())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_iso8601(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use time::macros::date;

    use super::{Date, DateSpan, MonthDay, Stay};

    fn day(d: time::Date) -> Date {
        Date::from(d)
    }

    #[test]
    fn parses_and_formats_iso8601() {
        let parsed = Date::from_iso8601("2024-08-01").unwrap();
        assert_eq!(parsed, day(date!(2024 - 08 - 01)));
        assert_eq!(parsed.to_iso8601(), "2024-08-01");

        assert!(Date::from_iso8601("2024-13-01").is_err());
        assert!(Date::from_iso8601("2024-02-30").is_err());
        assert!(Date::from_iso8601("01.08.2024").is_err());
    }

    #[test]
    fn month_day_ordering_is_calendar_order() {
        let june = MonthDay::new(6, 1).unwrap();
        let august = MonthDay::new(8, 31).unwrap();
        let december = MonthDay::new(12, 15).unwrap();

        assert!(june < august);
        assert!(august < december);
        assert_eq!("06-01".parse::<MonthDay>().unwrap(), june);
        assert_eq!(june.to_string(), "06-01");

        assert!(MonthDay::new(0, 1).is_none());
        assert!(MonthDay::new(13, 1).is_none());
        assert!(MonthDay::new(4, 31).is_none());
        assert!(MonthDay::new(2, 29).is_some());
    }

    #[test]
    fn span_boundaries_are_inclusive() {
        let span = DateSpan::new(
            day(date!(2024 - 07 - 01)),
            day(date!(2024 - 07 - 03)),
        )
        .unwrap();

        assert!(span.contains(day(date!(2024 - 07 - 01))));
        assert!(span.contains(day(date!(2024 - 07 - 03))));
        assert!(!span.contains(day(date!(2024 - 07 - 04))));
        assert_eq!(span.days(), 3);
        assert_eq!(
            span.iter().collect::<Vec<_>>(),
            [
                day(date!(2024 - 07 - 01)),
                day(date!(2024 - 07 - 02)),
                day(date!(2024 - 07 - 03)),
            ],
        );
    }

    #[test]
    fn spans_sharing_a_single_day_overlap() {
        let first = DateSpan::new(
            day(date!(2024 - 07 - 01)),
            day(date!(2024 - 07 - 05)),
        )
        .unwrap();
        let second = DateSpan::new(
            day(date!(2024 - 07 - 05)),
            day(date!(2024 - 07 - 10)),
        )
        .unwrap();
        let third = DateSpan::new(
            day(date!(2024 - 07 - 06)),
            day(date!(2024 - 07 - 10)),
        )
        .unwrap();

        assert!(first.overlaps(&second));
        assert!(second.overlaps(&first));
        assert!(!first.overlaps(&third));
    }

    #[test]
    fn stay_must_last_at_least_one_night() {
        let date = day(date!(2024 - 08 - 01));

        assert!(Stay::new(date, date).is_none());
        assert!(Stay::new(date, day(date!(2024 - 07 - 31))).is_none());
        assert!(Stay::new(date, day(date!(2024 - 08 - 02))).is_some());
    }

    #[test]
    fn stay_excludes_check_out_day() {
        let stay = Stay::new(
            day(date!(2024 - 08 - 01)),
            day(date!(2024 - 08 - 04)),
        )
        .unwrap();

        assert_eq!(stay.nights(), 3);
        assert_eq!(stay.last_night(), day(date!(2024 - 08 - 03)));
        assert!(stay.covers(day(date!(2024 - 08 - 01))));
        assert!(stay.covers(day(date!(2024 - 08 - 03))));
        assert!(!stay.covers(day(date!(2024 - 08 - 04))));
        assert_eq!(
            stay.dates().collect::<Vec<_>>(),
            [
                day(date!(2024 - 08 - 01)),
                day(date!(2024 - 08 - 02)),
                day(date!(2024 - 08 - 03)),
            ],
        );
    }

    #[test]
    fn back_to_back_stays_do_not_intersect() {
        let existing = Stay::new(
            day(date!(2024 - 08 - 01)),
            day(date!(2024 - 08 - 05)),
        )
        .unwrap();
        let overlapping = Stay::new(
            day(date!(2024 - 08 - 04)),
            day(date!(2024 - 08 - 06)),
        )
        .unwrap();
        let adjacent = Stay::new(
            day(date!(2024 - 08 - 05)),
            day(date!(2024 - 08 - 07)),
        )
        .unwrap();

        assert!(existing.intersects(&overlapping));
        assert!(overlapping.intersects(&existing));
        assert!(!existing.intersects(&adjacent));
        assert!(!adjacent.intersects(&existing));
    }
}
