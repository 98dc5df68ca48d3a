//! [`Command`] for creating a new [`Block`].

use common::{
    operations::{
        By, Commit, Insert, Invalidate, Lock, Select, Transact, Transacted,
    },
    Date, DateSpan, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{block, reservation, room, staff, Block, Reservation, Room},
    infra::{cache, database, Cache, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Block`].
///
/// A [`Block`] must not retroactively break guest commitments, so it's
/// rejected whenever an active [`Reservation`] intersects its window; the
/// check and the insert happen under the [`Room`]'s lock.
#[derive(Clone, Debug)]
pub struct AddBlock {
    /// ID of the [`Room`] to hold.
    pub room_id: room::Id,

    /// [`block::Reason`] of the hold.
    pub reason: block::Reason,

    /// First day of the hold.
    pub since: Date,

    /// Last day of the hold (inclusive), or [`None`] to hold the [`Room`]
    /// until the [`Block`] is explicitly removed.
    pub until: Option<Date>,

    /// [`block::Priority`] among other [`Block`]s of the [`Room`].
    pub priority: block::Priority,

    /// Free-form [`block::Note`], if any.
    pub note: Option<block::Note>,

    /// ID of the staff member performing the operation.
    pub created_by: staff::Id,
}

impl<Db, Ch> Command<AddBlock> for Service<Db, Ch>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Room, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Reservation>, (room::Id, Date)>>,
            Ok = Vec<Reservation>,
            Err = Traced<database::Error>,
        > + Database<Insert<Block>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ch: Cache<
        Invalidate<cache::Scope>,
        Ok = (),
        Err = Traced<cache::Error>,
    >,
{
    type Ok = Block;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: AddBlock) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddBlock {
            room_id,
            reason,
            since,
            until,
            priority,
            note,
            created_by,
        } = cmd;

        if until.is_some_and(|until| until < since) {
            return Err(tracerr::new!(E::InvalidWindow));
        }

        let room = self
            .database()
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|r| r.deleted_at.is_none())
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;

        let block = Block {
            id: block::Id::new(),
            room_id: room.id,
            reason,
            since,
            until,
            priority,
            note,
            created_by,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Room`.
        tx.execute(Lock(By::new(room.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Every active reservation ending after the hold begins; the
        // bounded tail is filtered here.
        let reservations = tx
            .execute(Select(By::<Vec<Reservation>, _>::new((room.id, since))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(conflict) =
            reservations.iter().find(|r| block.intersects(&r.stay))
        {
            return Err(tracerr::new!(E::ReservationConflict(conflict.id)));
        }

        tx.execute(Insert(block.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(match until {
            Some(until) => cache::Scope::Span {
                room_id: room.id,
                span: DateSpan::new(since, until)
                    .expect("window validated above"),
            },
            None => cache::Scope::Room(room.id),
        })
        .await;

        Ok(block)
    }
}

/// Error of [`AddBlock`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided `until` day precedes the `since` day.
    #[display("`Block` window must not end before it begins")]
    InvalidWindow,

    /// [`Room`] with the provided ID doesn't exist.
    #[display("`Room(id: {_0})` doesn't exist")]
    RoomNotExists(#[error(not(source))] room::Id),

    /// Active [`Reservation`] intersects the provided window.
    #[display("`Reservation(id: {_0})` intersects the provided window")]
    ReservationConflict(#[error(not(source))] reservation::Id),
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

    use super::{AddBlock, ExecutionError};

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    fn usd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Usd,
        }
    }

    fn cmd(
        room_id: crate::domain::room::Id,
        since: Date,
        until: Option<Date>,
    ) -> AddBlock {
        AddBlock {
            room_id,
            reason: "renovation".parse().unwrap(),
            since,
            until,
            priority: 1,
            note: None,
            created_by: crate::domain::staff::Id::new(),
        }
    }

    #[tokio::test]
    async fn blocked_window_stops_being_bookable() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let window = Stay::new(date(2024, 11, 4), date(2024, 11, 6)).unwrap();
        let before = service
            .execute(query::availability::OfRoom {
                room_id: room.id,
                stay: window,
            })
            .await
            .unwrap();
        assert_eq!(before, Verdict::Available);

        service
            .execute(cmd(
                room.id,
                date(2024, 11, 5),
                Some(date(2024, 11, 5)),
            ))
            .await
            .unwrap();

        let after = service
            .execute(query::availability::OfRoom {
                room_id: room.id,
                stay: window,
            })
            .await
            .unwrap();
        assert_eq!(after, Verdict::Unavailable(Reason::Blocked));
    }

    #[tokio::test]
    async fn conflicting_reservation_rejects_the_block() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let booked = mock.add_reservation(mock::reservation(
            room.id,
            Stay::new(date(2024, 11, 4), date(2024, 11, 8)).unwrap(),
        ));
        let service = mock::service(mock);

        let result = service
            .execute(cmd(
                room.id,
                date(2024, 11, 6),
                Some(date(2024, 11, 10)),
            ))
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::ReservationConflict(id) if id == booked.id,
        ));
    }

    #[tokio::test]
    async fn open_ended_block_holds_every_later_window() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        service
            .execute(cmd(room.id, date(2024, 11, 5), None))
            .await
            .unwrap();

        let later = service
            .execute(query::availability::OfRoom {
                room_id: room.id,
                stay: Stay::new(date(2025, 2, 1), date(2025, 2, 3)).unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(later, Verdict::Unavailable(Reason::Blocked));
    }

    #[tokio::test]
    async fn inverted_window_is_rejected() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let result = service
            .execute(cmd(
                room.id,
                date(2024, 11, 5),
                Some(date(2024, 11, 4)),
            ))
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::InvalidWindow,
        ));
    }
}
