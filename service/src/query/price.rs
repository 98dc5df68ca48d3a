//! [`Query`] collection related to [`Room`] prices.

use common::{
    operations::{By, Insert, Select},
    Date, DateSpan, Money, Stay,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{room, Room, SpecialPrice},
    infra::{cache, database, Cache, Database},
    read,
    Service,
};
#[cfg(doc)]
use crate::domain::Tariff;

use super::Query;

/// [`Query`] of the price of a single night of a [`Room`].
///
/// A [`SpecialPrice`] covering the night wins over the [`Tariff`]
/// calculation; otherwise the [`Room`]'s nightly rate is multiplied by the
/// seasonal, day-of-week and occupancy multipliers, and the result is
/// rounded to the minor currency unit.
#[derive(Clone, Copy, Debug)]
pub struct PerNight {
    /// ID of the [`Room`] to price.
    pub room_id: room::Id,

    /// [`Date`] of the night to price.
    pub date: Date,
}

impl<Db, Ch> Query<PerNight> for Service<Db, Ch>
where
    Db: Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<SpecialPrice>, (room::Id, DateSpan)>>,
            Ok = Vec<SpecialPrice>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::price::Occupancy, Date>>,
            Ok = read::price::Occupancy,
            Err = Traced<database::Error>,
        >,
    Ch: Cache<
            Select<cache::Key>,
            Ok = Option<cache::Value>,
            Err = Traced<cache::Error>,
        > + Cache<
            Insert<(cache::Key, cache::Value, cache::Ttl)>,
            Ok = (),
            Err = Traced<cache::Error>,
        >,
{
    type Ok = read::price::Night;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        PerNight { room_id, date }: PerNight,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        self.cached(cache::Key::Price { room_id, date }, || async {
            let room = self
                .database()
                .execute(Select(By::<Option<Room>, _>::new(room_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::RoomNotExists(room_id))
                .map_err(tracerr::wrap!())?;

            let specials = self
                .database()
                .execute(Select(By::<Vec<SpecialPrice>, _>::new((
                    room_id,
                    DateSpan::single(date),
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(special) =
                specials.into_iter().find(|s| s.covers(date))
            {
                return Ok(read::price::Night {
                    date,
                    amount: special.price.round_minor(),
                    source: read::price::Source::Special {
                        id: special.id,
                        label: special.label,
                    },
                });
            }

            let read::price::Occupancy(rate) = self
                .database()
                .execute(Select(By::<read::price::Occupancy, _>::new(date)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;

            let tariff = &self.config().tariff;
            let seasonal = tariff.seasonal_multiplier(date);
            let weekday = tariff.weekday_multiplier(date);
            let occupancy = tariff.occupancy_multiplier(rate);

            let amount = Money {
                amount: room.rate.amount * seasonal * weekday * occupancy,
                currency: room.rate.currency,
            }
            .round_minor();

            Ok(read::price::Night {
                date,
                amount,
                source: read::price::Source::Tariff {
                    seasonal,
                    weekday,
                    occupancy,
                },
            })
        })
        .await
    }
}

/// [`Query`] of the full price of a [`Stay`] of a [`Room`].
///
/// The check-out day is never charged: a [`Stay`] of `N` nights yields `N`
/// breakdown entries.
#[derive(Clone, Copy, Debug)]
pub struct ForStay {
    /// ID of the [`Room`] to price.
    pub room_id: room::Id,

    /// [`Stay`] to price.
    pub stay: Stay,
}

impl<Db, Ch> Query<ForStay> for Service<Db, Ch>
where
    Self: Query<
        PerNight,
        Ok = read::price::Night,
        Err = Traced<ExecutionError>,
    >,
{
    type Ok = read::price::Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ForStay { room_id, stay }: ForStay,
    ) -> Result<Self::Ok, Self::Err> {
        let mut breakdown = Vec::new();
        for date in stay.dates() {
            let night = self
                .execute(PerNight { room_id, date })
                .await
                .map_err(tracerr::wrap!())?;
            breakdown.push(night);
        }

        let first = breakdown.first().expect("at least one night long");
        let total = Money {
            amount: breakdown.iter().map(|n| n.amount.amount).sum(),
            currency: first.amount.currency,
        };

        Ok(read::price::Quote {
            total,
            nights: stay.nights(),
            breakdown,
        })
    }
}

/// Error of a price [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Room`] with the provided ID doesn't exist.
    #[display("`Room(id: {_0})` doesn't exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use common::{Currency, Date, DateSpan, Money, Stay};
    use rust_decimal::Decimal;

    use crate::{
        infra::mock::{self, Mock},
        read,
        Query as _,
    };

    use super::{ForStay, PerNight};

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    fn usd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Usd,
        }
    }

    #[tokio::test]
    async fn shoulder_weekday_night_gets_the_seasonal_discount() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        // 2024-10-07 is a shoulder-season Monday with zero occupancy, so
        // 100 × 0.8 × 1.0 × 0.9 = 72.00.
        let night = service
            .execute(PerNight {
                room_id: room.id,
                date: date(2024, 10, 7),
            })
            .await
            .unwrap();

        assert_eq!(night.amount, usd("72.00"));
        assert_eq!(
            night.source,
            read::price::Source::Tariff {
                seasonal: Decimal::new(8, 1),
                weekday: Decimal::ONE,
                occupancy: Decimal::new(9, 1),
            },
        );
    }

    #[tokio::test]
    async fn summer_friday_night_stacks_every_multiplier() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        // 2024-07-05 is a summer Friday with zero occupancy:
        // 100 × 1.5 × 1.2 × 0.9 = 162.00.
        let night = service
            .execute(PerNight {
                room_id: room.id,
                date: date(2024, 7, 5),
            })
            .await
            .unwrap();

        assert_eq!(night.amount, usd("162.00"));
    }

    #[tokio::test]
    async fn mid_band_occupancy_leaves_the_rate_untouched() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let _ = mock.add_room(mock::room(usd("100")));
        let night_of = date(2024, 7, 5);
        mock.occupy(room.id, night_of);
        let service = mock::service(mock);

        // One of two rooms is taken, so the 0.5 occupancy falls between
        // every band: a summer Friday prices as 100 × 1.5 × 1.2 × 1.0 =
        // 180.00.
        let night = service
            .execute(PerNight {
                room_id: room.id,
                date: night_of,
            })
            .await
            .unwrap();

        assert_eq!(night.amount, usd("180.00"));
        assert_eq!(
            night.source,
            read::price::Source::Tariff {
                seasonal: Decimal::new(15, 1),
                weekday: Decimal::new(12, 1),
                occupancy: Decimal::ONE,
            },
        );
    }

    #[tokio::test]
    async fn special_price_overrides_every_multiplier() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        mock.add_special_price(mock::special_price(
            room.id,
            usd("250"),
            DateSpan::new(date(2024, 7, 4), date(2024, 7, 6)).unwrap(),
        ));
        let service = mock::service(mock);

        // A summer Friday, but the special price applies verbatim.
        let night = service
            .execute(PerNight {
                room_id: room.id,
                date: date(2024, 7, 5),
            })
            .await
            .unwrap();

        assert_eq!(night.amount, usd("250.00"));
        assert!(matches!(
            night.source,
            read::price::Source::Special { .. },
        ));
    }

    #[tokio::test]
    async fn night_after_the_special_window_falls_back_to_the_tariff() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        mock.add_special_price(mock::special_price(
            room.id,
            usd("250"),
            DateSpan::single(date(2024, 10, 7)),
        ));
        let service = mock::service(mock);

        let night = service
            .execute(PerNight {
                room_id: room.id,
                date: date(2024, 10, 8),
            })
            .await
            .unwrap();

        assert_eq!(night.amount, usd("72.00"));
    }

    #[tokio::test]
    async fn quote_charges_every_night_but_the_check_out_day() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        // Mon/Tue/Wed shoulder nights: 3 × 72.00.
        let quote = service
            .execute(ForStay {
                room_id: room.id,
                stay: Stay::new(date(2024, 10, 7), date(2024, 10, 10))
                    .unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(quote.nights, 3);
        assert_eq!(quote.total, usd("216.00"));
        assert_eq!(
            quote
                .breakdown
                .iter()
                .map(|n| n.date)
                .collect::<Vec<_>>(),
            [date(2024, 10, 7), date(2024, 10, 8), date(2024, 10, 9)],
        );
    }

    #[tokio::test]
    async fn quote_mixes_special_and_tariff_nights() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        mock.add_special_price(mock::special_price(
            room.id,
            usd("250"),
            DateSpan::single(date(2024, 10, 8)),
        ));
        let service = mock::service(mock);

        let quote = service
            .execute(ForStay {
                room_id: room.id,
                stay: Stay::new(date(2024, 10, 7), date(2024, 10, 10))
                    .unwrap(),
            })
            .await
            .unwrap();

        // 72 + 250 + 72.
        assert_eq!(quote.total, usd("394.00"));
        assert!(matches!(
            quote.breakdown[1].source,
            read::price::Source::Special { .. },
        ));
    }

    #[tokio::test]
    async fn occupancy_band_raises_the_price_of_a_busy_night() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let busy = date(2024, 10, 7);
        mock.occupy(room.id, busy);
        let service = mock::service(mock);

        // The only room is occupied: 100 × 0.8 × 1.0 × 1.3 = 104.00.
        let night = service
            .execute(PerNight {
                room_id: room.id,
                date: busy,
            })
            .await
            .unwrap();

        assert_eq!(night.amount, usd("104.00"));
    }

    #[tokio::test]
    async fn pricing_an_unknown_room_fails() {
        let service = mock::service(Mock::default());

        let result = service
            .execute(PerNight {
                room_id: crate::domain::room::Id::new(),
                date: date(2024, 10, 7),
            })
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            super::ExecutionError::RoomNotExists(_),
        ));
    }

    #[tokio::test]
    async fn repeated_lookups_are_served_from_the_cache() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock.clone());

        let cold = service
            .execute(PerNight {
                room_id: room.id,
                date: date(2024, 10, 7),
            })
            .await
            .unwrap();

        // A rate change behind the cache's back must not show up until the
        // entry is invalidated or expires.
        mock.set_rate(room.id, usd("999"));
        let warm = service
            .execute(PerNight {
                room_id: room.id,
                date: date(2024, 10, 7),
            })
            .await
            .unwrap();

        assert_eq!(cold, warm);
    }
}
