//! [`Query`] collection related to [`Room`] availability.

use common::{
    operations::{By, Insert, Select},
    DateSpan, Stay,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{room, room_type, Block, Reservation, Room},
    infra::{cache, database, Cache, Database},
    query::price,
    read,
    Service,
};
#[cfg(doc)]
use crate::domain::RoomType;

use super::Query;

/// [`Query`] of the availability [`read::availability::Verdict`] of a
/// [`Room`] for a [`Stay`].
///
/// An unknown or deleted [`Room`] reads as closed rather than erroring:
/// availability is a read path and answers any question it's asked.
#[derive(Clone, Copy, Debug)]
pub struct OfRoom {
    /// ID of the [`Room`] to check.
    pub room_id: room::Id,

    /// [`Stay`] to check the [`Room`] for.
    pub stay: Stay,
}

impl<Db, Ch> Query<OfRoom> for Service<Db, Ch>
where
    Db: Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Block>, (room::Id, Stay)>>,
            Ok = Vec<Block>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Reservation>, (room::Id, Stay)>>,
            Ok = Vec<Reservation>,
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
    type Ok = read::availability::Verdict;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        OfRoom { room_id, stay }: OfRoom,
    ) -> Result<Self::Ok, Self::Err> {
        use read::availability::{Reason, Verdict};
        use ExecutionError as E;

        self.cached(cache::Key::Availability { room_id, stay }, || async {
            let room = self
                .database()
                .execute(Select(By::<Option<Room>, _>::new(room_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let Some(room) = room.filter(Room::is_open) else {
                return Ok(Verdict::Unavailable(Reason::RoomClosed));
            };

            let blocks = self
                .database()
                .execute(Select(By::<Vec<Block>, _>::new((room_id, stay))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if !blocks.is_empty() {
                return Ok(Verdict::Unavailable(Reason::Blocked));
            }

            let conflicts = self
                .database()
                .execute(Select(By::<Vec<Reservation>, _>::new((
                    room_id, stay,
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            // Only reservations already overbooked spend the allowance.
            let overbooked =
                conflicts.iter().filter(|r| r.is_overbooked).count();
            Ok(if conflicts.is_empty()
                || (room.allow_overbooking
                    && overbooked < usize::from(room.max_overbooking))
            {
                Verdict::Available
            } else {
                Verdict::Unavailable(Reason::Booked)
            })
        })
        .await
    }
}

/// [`Query`] of all [`Room`]s open for a [`Stay`], optionally narrowed to a
/// single [`RoomType`].
///
/// Results are ordered by [`room::Id`] ascending; an unknown [`RoomType`]
/// yields an empty list rather than an error.
#[derive(Clone, Copy, Debug)]
pub struct Search {
    /// ID of the [`RoomType`] to narrow the search to, if any.
    pub kind_id: Option<room_type::Id>,

    /// [`Stay`] to search open [`Room`]s for.
    pub stay: Stay,
}

impl<Db, Ch> Query<Search> for Service<Db, Ch>
where
    Db: Database<
        Select<By<Vec<Room>, Option<room_type::Id>>>,
        Ok = Vec<Room>,
        Err = Traced<database::Error>,
    >,
    Self: Query<
        OfRoom,
        Ok = read::availability::Verdict,
        Err = Traced<ExecutionError>,
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
    type Ok = Vec<read::availability::OpenRoom>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Search { kind_id, stay }: Search,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        self.cached(cache::Key::Search { kind_id, stay }, || async {
            let rooms = self
                .database()
                .execute(Select(By::<Vec<Room>, _>::new(kind_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;

            let mut open = Vec::new();
            for room in rooms {
                let verdict = self
                    .execute(OfRoom {
                        room_id: room.id,
                        stay,
                    })
                    .await
                    .map_err(tracerr::wrap!())?;
                if verdict.is_available() {
                    open.push(read::availability::OpenRoom {
                        id: room.id,
                        number: room.number,
                        kind_id: room.kind_id,
                        capacity: room.capacity,
                        rate: room.rate,
                    });
                }
            }
            Ok(open)
        })
        .await
    }
}

/// [`Query`] of the day-by-day availability calendar of a [`Room`] over a
/// [`DateSpan`].
///
/// Each day carries the verdict and the price of the one-night stay
/// starting on it.
#[derive(Clone, Copy, Debug)]
pub struct Calendar {
    /// ID of the [`Room`] to build the calendar of.
    pub room_id: room::Id,

    /// Covered [`DateSpan`].
    pub span: DateSpan,
}

impl<Db, Ch> Query<Calendar> for Service<Db, Ch>
where
    Self: Query<
            OfRoom,
            Ok = read::availability::Verdict,
            Err = Traced<ExecutionError>,
        > + Query<
            price::PerNight,
            Ok = read::price::Night,
            Err = Traced<price::ExecutionError>,
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
    type Ok = Vec<read::calendar::Day>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Calendar { room_id, span }: Calendar,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        self.cached(cache::Key::Calendar { room_id, span }, || async {
            let mut days = Vec::new();
            for date in span {
                // `None` only at the very end of the supported calendar.
                let Some(stay) = Stay::single_night(date) else {
                    break;
                };

                let verdict = self
                    .execute(OfRoom { room_id, stay })
                    .await
                    .map_err(tracerr::wrap!())?;
                let night = self
                    .execute(price::PerNight { room_id, date })
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;

                days.push(read::calendar::Day {
                    date,
                    available: verdict.is_available(),
                    price: night.amount,
                });
            }
            Ok(days)
        })
        .await
    }
}

/// Error of an availability [`Query`] execution.
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

impl From<price::ExecutionError> for ExecutionError {
    fn from(e: price::ExecutionError) -> Self {
        match e {
            price::ExecutionError::Db(e) => Self::Db(e),
            price::ExecutionError::RoomNotExists(id) => {
                Self::RoomNotExists(id)
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{Currency, Date, Money, Stay};

    use crate::{
        infra::mock::{self, Mock},
        read::availability::{Reason, Verdict},
        Query as _,
    };

    use super::{Calendar, OfRoom, Search};

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    fn usd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Usd,
        }
    }

    fn stay(since: Date, until: Date) -> Stay {
        Stay::new(since, until).unwrap()
    }

    #[tokio::test]
    async fn open_room_without_holds_is_available() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let verdict = service
            .execute(OfRoom {
                room_id: room.id,
                stay: stay(date(2024, 10, 7), date(2024, 10, 10)),
            })
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::Available);
    }

    #[tokio::test]
    async fn unknown_room_reads_as_closed() {
        let service = mock::service(Mock::default());

        let verdict = service
            .execute(OfRoom {
                room_id: crate::domain::room::Id::new(),
                stay: stay(date(2024, 10, 7), date(2024, 10, 10)),
            })
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::Unavailable(Reason::RoomClosed));
    }

    #[tokio::test]
    async fn block_beats_an_otherwise_free_window() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        mock.add_block(mock::block(
            room.id,
            date(2024, 10, 8),
            Some(date(2024, 10, 9)),
        ));
        let service = mock::service(mock);

        let verdict = service
            .execute(OfRoom {
                room_id: room.id,
                stay: stay(date(2024, 10, 7), date(2024, 10, 10)),
            })
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::Unavailable(Reason::Blocked));
    }

    #[tokio::test]
    async fn reservation_conflicts_only_when_stays_share_a_night() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        mock.add_reservation(mock::reservation(
            room.id,
            stay(date(2024, 10, 7), date(2024, 10, 10)),
        ));
        let service = mock::service(mock);

        let overlapping = service
            .execute(OfRoom {
                room_id: room.id,
                stay: stay(date(2024, 10, 9), date(2024, 10, 12)),
            })
            .await
            .unwrap();
        let back_to_back = service
            .execute(OfRoom {
                room_id: room.id,
                stay: stay(date(2024, 10, 10), date(2024, 10, 12)),
            })
            .await
            .unwrap();

        assert_eq!(overlapping, Verdict::Unavailable(Reason::Booked));
        assert_eq!(back_to_back, Verdict::Available);
    }

    #[tokio::test]
    async fn overbooking_allowance_admits_extra_reservations() {
        let mock = Mock::default();
        let mut room = mock::room(usd("100"));
        room.allow_overbooking = true;
        room.max_overbooking = 1;
        let room = mock.add_room(room);
        let window = stay(date(2024, 10, 7), date(2024, 10, 10));
        mock.add_reservation(mock::reservation(room.id, window));
        let service = mock::service(mock.clone());

        let one_booked = service
            .execute(OfRoom {
                room_id: room.id,
                stay: window,
            })
            .await
            .unwrap();
        assert_eq!(one_booked, Verdict::Available);

        let mut extra = mock::reservation(room.id, window);
        extra.is_overbooked = true;
        mock.add_reservation(extra);
        let service = mock::service(mock);
        let allowance_spent = service
            .execute(OfRoom {
                room_id: room.id,
                stay: window,
            })
            .await
            .unwrap();
        assert_eq!(allowance_spent, Verdict::Unavailable(Reason::Booked));
    }

    #[tokio::test]
    async fn chained_stays_leave_the_overbooking_allowance_untouched() {
        let mock = Mock::default();
        let mut room = mock::room(usd("100"));
        room.allow_overbooking = true;
        room.max_overbooking = 1;
        let room = mock.add_room(room);
        mock.add_reservation(mock::reservation(
            room.id,
            stay(date(2024, 10, 1), date(2024, 10, 3)),
        ));
        mock.add_reservation(mock::reservation(
            room.id,
            stay(date(2024, 10, 3), date(2024, 10, 5)),
        ));
        let service = mock::service(mock);

        // Both chained stays conflict with the covering window, but neither
        // is overbooked, so the allowance is still free to admit it.
        let verdict = service
            .execute(OfRoom {
                room_id: room.id,
                stay: stay(date(2024, 10, 1), date(2024, 10, 5)),
            })
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::Available);
    }

    #[tokio::test]
    async fn search_returns_open_rooms_ordered_by_id() {
        let mock = Mock::default();
        let first = mock.add_room(mock::room(usd("100")));
        let second = mock.add_room(mock::room(usd("150")));
        let booked = mock.add_room(mock::room(usd("200")));
        let window = stay(date(2024, 10, 7), date(2024, 10, 10));
        mock.add_reservation(mock::reservation(booked.id, window));
        let service = mock::service(mock);

        let open = service
            .execute(Search {
                kind_id: None,
                stay: window,
            })
            .await
            .unwrap();

        let mut expected = [first.id, second.id];
        expected.sort_by_key(|id| uuid::Uuid::from(*id));
        assert_eq!(
            open.iter().map(|r| r.id).collect::<Vec<_>>(),
            expected,
        );
    }

    #[tokio::test]
    async fn search_for_an_unknown_kind_is_empty() {
        let mock = Mock::default();
        let _ = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let open = service
            .execute(Search {
                kind_id: Some(crate::domain::room_type::Id::new()),
                stay: stay(date(2024, 10, 7), date(2024, 10, 10)),
            })
            .await
            .unwrap();

        assert!(open.is_empty());
    }

    #[tokio::test]
    async fn calendar_marks_held_days_and_prices_the_rest() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        mock.add_block(mock::block(
            room.id,
            date(2024, 10, 8),
            Some(date(2024, 10, 8)),
        ));
        let service = mock::service(mock);

        let days = service
            .execute(Calendar {
                room_id: room.id,
                span: common::DateSpan::new(
                    date(2024, 10, 7),
                    date(2024, 10, 9),
                )
                .unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(days.len(), 3);
        assert!(days[0].available);
        assert!(!days[1].available);
        assert!(days[2].available);
        // Shoulder weekday with zero occupancy.
        assert_eq!(days[0].price, usd("72.00"));
    }
}
