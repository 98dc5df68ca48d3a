//! [`Command`] for placing a new [`Reservation`].

use common::{
    operations::{
        By, Commit, Insert, Invalidate, Lock, Select, Transact, Transacted,
    },
    DateTime, Stay,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{block, guest, reservation, room, Block, Reservation, Room},
    infra::{cache, database, Cache, Database},
    query::price,
    read,
    Query, Service,
};

use super::Command;

/// [`Command`] for placing a new [`Reservation`] of a [`Room`] for a
/// [`Stay`].
///
/// The availability re-check and the insert happen under the [`Room`]'s
/// lock, so two racing bookings of the same window never both succeed
/// (beyond the [`Room`]'s explicit overbooking allowance).
#[derive(Clone, Copy, Debug)]
pub struct PlaceReservation {
    /// ID of the [`Room`] to book.
    pub room_id: room::Id,

    /// ID of the booking guest.
    pub guest_id: guest::Id,

    /// Booked [`Stay`].
    pub stay: Stay,
}

impl<Db, Ch> Command<PlaceReservation> for Service<Db, Ch>
where
    Self: Query<
        price::ForStay,
        Ok = read::price::Quote,
        Err = Traced<price::ExecutionError>,
    >,
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Room, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<
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
        > + Database<Insert<Reservation>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ch: Cache<
        Invalidate<cache::Scope>,
        Ok = (),
        Err = Traced<cache::Error>,
    >,
{
    type Ok = Reservation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        PlaceReservation {
            room_id,
            guest_id,
            stay,
        }: PlaceReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let quote = self
            .execute(price::ForStay { room_id, stay })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Room`.
        tx.execute(Lock(By::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let room = tx
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;
        if !room.is_open() {
            return Err(tracerr::new!(E::RoomClosed(room.id)));
        }

        let blocks = tx
            .execute(Select(By::<Vec<Block>, _>::new((room.id, stay))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(held) = blocks.first() {
            return Err(tracerr::new!(E::Blocked(held.id)));
        }

        let conflicts = tx
            .execute(Select(By::<Vec<Reservation>, _>::new((room.id, stay))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        // Only reservations already overbooked spend the allowance.
        let overbooked = conflicts.iter().filter(|r| r.is_overbooked).count();
        if !conflicts.is_empty()
            && !(room.allow_overbooking
                && overbooked < usize::from(room.max_overbooking))
        {
            return Err(tracerr::new!(E::Booked(room.id)));
        }

        let reservation = Reservation {
            id: reservation::Id::new(),
            room_id: room.id,
            guest_id,
            stay,
            status: reservation::Status::Confirmed,
            is_overbooked: !conflicts.is_empty(),
            total: quote.total,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        tx.execute(Insert(reservation.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(cache::Scope::Span {
            room_id: room.id,
            span: stay.span(),
        })
        .await;

        Ok(reservation)
    }
}

/// Error of [`PlaceReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Room`] with the provided ID doesn't exist.
    #[display("`Room(id: {_0})` doesn't exist")]
    RoomNotExists(#[error(not(source))] room::Id),

    /// [`Room`] with the provided ID doesn't host guests at the moment.
    #[display("`Room(id: {_0})` doesn't host guests")]
    RoomClosed(#[error(not(source))] room::Id),

    /// [`Block`] holds the [`Room`] within the requested window.
    #[display("`Block(id: {_0})` holds the room within the window")]
    Blocked(#[error(not(source))] block::Id),

    /// [`Room`] is fully booked for the requested window.
    #[display("`Room(id: {_0})` is fully booked for the window")]
    Booked(#[error(not(source))] room::Id),
}

impl From<price::ExecutionError> for ExecutionError {
    fn from(err: price::ExecutionError) -> Self {
        match err {
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
        query,
        read::availability::{Reason, Verdict},
        Command as _, Query as _,
    };

    use super::{ExecutionError, PlaceReservation};

    fn usd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Usd,
        }
    }

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    fn cmd(
        room_id: crate::domain::room::Id,
        stay: Stay,
    ) -> PlaceReservation {
        PlaceReservation {
            room_id,
            guest_id: crate::domain::guest::Id::new(),
            stay,
        }
    }

    #[tokio::test]
    async fn booking_flips_availability_and_charges_the_quote() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        // Shoulder-season Mon..Thu: 3 nights at 100 * 0.8 * 1.0 * 0.9.
        let stay = Stay::new(date(2024, 10, 7), date(2024, 10, 10)).unwrap();
        let before = service
            .execute(query::availability::OfRoom {
                room_id: room.id,
                stay,
            })
            .await
            .unwrap();
        assert_eq!(before, Verdict::Available);

        let reservation = service.execute(cmd(room.id, stay)).await.unwrap();
        assert_eq!(reservation.total, usd("216.00"));
        assert!(!reservation.is_overbooked);

        let after = service
            .execute(query::availability::OfRoom {
                room_id: room.id,
                stay,
            })
            .await
            .unwrap();
        assert_eq!(after, Verdict::Unavailable(Reason::Booked));
    }

    #[tokio::test]
    async fn back_to_back_stays_share_the_turnover_day() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        service
            .execute(cmd(
                room.id,
                Stay::new(date(2024, 10, 7), date(2024, 10, 10)).unwrap(),
            ))
            .await
            .unwrap();

        // Checking in on the previous guest's checkout day is fine.
        let next = service
            .execute(cmd(
                room.id,
                Stay::new(date(2024, 10, 10), date(2024, 10, 12)).unwrap(),
            ))
            .await
            .unwrap();
        assert!(!next.is_overbooked);
    }

    #[tokio::test]
    async fn overbooking_allowance_is_honored_and_flagged() {
        let mock = Mock::default();
        let mut room = mock::room(usd("100"));
        room.allow_overbooking = true;
        room.max_overbooking = 1;
        let room = mock.add_room(room);
        let service = mock::service(mock);

        let stay = Stay::new(date(2024, 10, 7), date(2024, 10, 10)).unwrap();
        let first = service.execute(cmd(room.id, stay)).await.unwrap();
        assert!(!first.is_overbooked);

        let second = service.execute(cmd(room.id, stay)).await.unwrap();
        assert!(second.is_overbooked);

        let third = service.execute(cmd(room.id, stay)).await;
        assert!(matches!(
            third.unwrap_err().into_inner(),
            ExecutionError::Booked(id) if id == room.id,
        ));
    }

    #[tokio::test]
    async fn chained_stays_dont_spend_the_overbooking_allowance() {
        let mock = Mock::default();
        let mut room = mock::room(usd("100"));
        room.allow_overbooking = true;
        room.max_overbooking = 1;
        let room = mock.add_room(room);
        let service = mock::service(mock);

        service
            .execute(cmd(
                room.id,
                Stay::new(date(2024, 10, 1), date(2024, 10, 3)).unwrap(),
            ))
            .await
            .unwrap();
        service
            .execute(cmd(
                room.id,
                Stay::new(date(2024, 10, 3), date(2024, 10, 5)).unwrap(),
            ))
            .await
            .unwrap();

        // The covering window conflicts with both chained stays, yet the
        // allowance is untouched: only overbooked reservations spend it.
        let covering = service
            .execute(cmd(
                room.id,
                Stay::new(date(2024, 10, 1), date(2024, 10, 5)).unwrap(),
            ))
            .await
            .unwrap();
        assert!(covering.is_overbooked);

        let beyond = service
            .execute(cmd(
                room.id,
                Stay::new(date(2024, 10, 1), date(2024, 10, 5)).unwrap(),
            ))
            .await;
        assert!(matches!(
            beyond.unwrap_err().into_inner(),
            ExecutionError::Booked(id) if id == room.id,
        ));
    }

    #[tokio::test]
    async fn blocked_room_rejects_booking() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let block = mock.add_block(mock::block(
            room.id,
            date(2024, 10, 8),
            Some(date(2024, 10, 8)),
        ));
        let service = mock::service(mock);

        let result = service
            .execute(cmd(
                room.id,
                Stay::new(date(2024, 10, 7), date(2024, 10, 10)).unwrap(),
            ))
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::Blocked(id) if id == block.id,
        ));
    }

    #[tokio::test]
    async fn booking_an_unknown_room_fails() {
        let service = mock::service(Mock::default());

        let result = service
            .execute(cmd(
                crate::domain::room::Id::new(),
                Stay::new(date(2024, 10, 7), date(2024, 10, 10)).unwrap(),
            ))
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::RoomNotExists(_),
        ));
    }
}
