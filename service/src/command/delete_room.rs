//! [`Command`] for deleting a [`Room`].

use common::{
    operations::{
        By, Commit, Invalidate, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{room, Room},
    infra::{cache, database, Cache, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Room`].
///
/// The deletion is soft: the row is kept forever to preserve the booking
/// history referring to it, but the [`Room`] stops being listed, searched
/// and priced.
#[derive(Clone, Copy, Debug)]
pub struct DeleteRoom {
    /// ID of the [`Room`] to delete.
    pub id: room::Id,
}

impl<Db, Ch> Command<DeleteRoom> for Service<Db, Ch>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Room, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<Update<Room>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ch: Cache<
        Invalidate<cache::Scope>,
        Ok = (),
        Err = Traced<cache::Error>,
    >,
{
    type Ok = Room;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteRoom { id }: DeleteRoom,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Room`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut room = tx
            .execute(Select(By::<Option<Room>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|r| r.deleted_at.is_none())
            .ok_or(E::RoomNotExists(id))
            .map_err(tracerr::wrap!())?;

        room.deleted_at = Some(DateTime::now().coerce());
        tx.execute(Update(room.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(cache::Scope::Room(room.id)).await;

        Ok(room)
    }
}

/// Error of [`DeleteRoom`] [`Command`] execution.
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
    use common::{Currency, Date, Money, Stay};

    use crate::{
        infra::mock::{self, Mock},
        query,
        read::availability::{Reason, Verdict},
        Command as _, Query as _,
    };

    use super::{DeleteRoom, ExecutionError};

    fn usd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Usd,
        }
    }

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn deleted_room_reads_as_closed_and_leaves_searches() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let window = Stay::new(date(2024, 11, 4), date(2024, 11, 6)).unwrap();
        service.execute(DeleteRoom { id: room.id }).await.unwrap();

        let verdict = service
            .execute(query::availability::OfRoom {
                room_id: room.id,
                stay: window,
            })
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Unavailable(Reason::RoomClosed));

        let open = service
            .execute(query::availability::Search {
                kind_id: None,
                stay: window,
            })
            .await
            .unwrap();
        assert!(open.is_empty());
    }

    #[tokio::test]
    async fn double_deletion_fails() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        service.execute(DeleteRoom { id: room.id }).await.unwrap();
        let result = service.execute(DeleteRoom { id: room.id }).await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::RoomNotExists(_),
        ));
    }
}
