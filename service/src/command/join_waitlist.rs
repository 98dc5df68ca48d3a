//! [`Command`] for queueing a guest onto a [`Room`]'s waitlist.

use common::{
    operations::{By, Insert, Select},
    DateTime, Stay,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{guest, room, waitlist, Room, WaitlistEntry},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for queueing a guest onto a [`Room`]'s waitlist.
///
/// The entry waits for the exact [`Stay`] window: the guest is notified only
/// if the [`Room`] becomes free for the whole of it.
#[derive(Clone, Copy, Debug)]
pub struct JoinWaitlist {
    /// ID of the awaited [`Room`].
    pub room_id: room::Id,

    /// ID of the waiting guest.
    pub guest_id: guest::Id,

    /// Awaited [`Stay`].
    pub stay: Stay,
}

impl<Db, Ch> Command<JoinWaitlist> for Service<Db, Ch>
where
    Db: Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<Insert<WaitlistEntry>, Err = Traced<database::Error>>,
{
    type Ok = WaitlistEntry;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        JoinWaitlist {
            room_id,
            guest_id,
            stay,
        }: JoinWaitlist,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let room = self
            .database()
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|r| r.deleted_at.is_none())
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;

        if !room.allow_waitlist {
            return Err(tracerr::new!(E::WaitlistClosed(room.id)));
        }

        let entry = WaitlistEntry {
            id: waitlist::Id::new(),
            room_id: room.id,
            guest_id,
            stay,
            status: waitlist::Status::Waiting,
            created_at: DateTime::now().coerce(),
            notified_at: None,
        };
        self.database()
            .execute(Insert(entry.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(entry)
    }
}

/// Error of [`JoinWaitlist`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Room`] with the provided ID doesn't exist.
    #[display("`Room(id: {_0})` doesn't exist")]
    RoomNotExists(#[error(not(source))] room::Id),

    /// [`Room`] with the provided ID doesn't accept waitlisting.
    #[display("`Room(id: {_0})` doesn't accept waitlisting")]
    WaitlistClosed(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use common::{Currency, Date, Money, Stay};

    use crate::{
        domain::{guest, waitlist},
        infra::mock::{self, Mock},
        Command as _,
    };

    use super::{ExecutionError, JoinWaitlist};

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
    async fn entry_starts_waiting() {
        let mock = Mock::default();
        let mut room = mock::room(usd("100"));
        room.allow_waitlist = true;
        let room = mock.add_room(room);
        let service = mock::service(mock);

        let entry = service
            .execute(JoinWaitlist {
                room_id: room.id,
                guest_id: guest::Id::new(),
                stay: Stay::new(date(2024, 11, 4), date(2024, 11, 6)).unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(entry.status, waitlist::Status::Waiting);
        assert_eq!(entry.room_id, room.id);
        assert!(entry.notified_at.is_none());
    }

    #[tokio::test]
    async fn room_without_waitlist_rejects() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let result = service
            .execute(JoinWaitlist {
                room_id: room.id,
                guest_id: guest::Id::new(),
                stay: Stay::new(date(2024, 11, 4), date(2024, 11, 6)).unwrap(),
            })
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::WaitlistClosed(id) if id == room.id,
        ));
    }

    #[tokio::test]
    async fn unknown_room_rejects() {
        let service = mock::service(Mock::default());

        let result = service
            .execute(JoinWaitlist {
                room_id: crate::domain::room::Id::new(),
                guest_id: guest::Id::new(),
                stay: Stay::new(date(2024, 11, 4), date(2024, 11, 6)).unwrap(),
            })
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::RoomNotExists(_),
        ));
    }
}
