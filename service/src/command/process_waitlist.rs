//! [`Command`] for notifying waitlisted guests of a freed [`Room`].

use common::{
    operations::{By, Invalidate, Select, Update},
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{room, waitlist, Room, WaitlistEntry},
    infra::{cache, database, Cache, Database},
    query::availability,
    read,
    Query, Service,
};

use super::Command;

/// [`Command`] for walking a [`Room`]'s waitlist once it may have freed up.
///
/// Ran whenever a [`Reservation`](crate::domain::Reservation) is cancelled
/// or a [`Block`](crate::domain::Block) is removed: every still-waiting
/// entry whose awaited window turns out available gets notified.
#[derive(Clone, Copy, Debug)]
pub struct ProcessWaitlist {
    /// ID of the possibly freed [`Room`].
    pub room_id: room::Id,

    /// Day the processing happens on; entries whose check-in day already
    /// passed are skipped.
    pub date: Date,
}

impl<Db, Ch> Command<ProcessWaitlist> for Service<Db, Ch>
where
    Self: Query<
        availability::OfRoom,
        Ok = read::availability::Verdict,
        Err = Traced<availability::ExecutionError>,
    >,
    Db: Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<WaitlistEntry>, (room::Id, Date)>>,
            Ok = Vec<WaitlistEntry>,
            Err = Traced<database::Error>,
        > + Database<Update<WaitlistEntry>, Err = Traced<database::Error>>,
    Ch: Cache<
        Invalidate<cache::Scope>,
        Ok = (),
        Err = Traced<cache::Error>,
    >,
{
    type Ok = Vec<WaitlistEntry>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ProcessWaitlist { room_id, date }: ProcessWaitlist,
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

        // The trigger means the room's state changed, so cached verdicts
        // cannot be trusted anymore.
        self.invalidate(cache::Scope::Room(room.id)).await;

        let waiting = self
            .database()
            .execute(Select(By::<Vec<WaitlistEntry>, _>::new((room.id, date))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut notified = Vec::new();
        for mut entry in waiting {
            let verdict = self
                .execute(availability::OfRoom {
                    room_id: room.id,
                    stay: entry.stay,
                })
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if !verdict.is_available() {
                continue;
            }

            entry.status = waitlist::Status::Notified;
            entry.notified_at = Some(DateTime::now().coerce());
            self.database()
                .execute(Update(entry.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            // TODO: Hand over to a real notification channel once the
            //       guest-messaging service lands.
            log::info!(
                entry = %entry.id,
                guest = %entry.guest_id,
                room = %room.id,
                "waitlisted guest notified",
            );
            notified.push(entry);
        }

        Ok(notified)
    }
}

/// Error of [`ProcessWaitlist`] [`Command`] execution.
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

impl From<availability::ExecutionError> for ExecutionError {
    fn from(err: availability::ExecutionError) -> Self {
        match err {
            availability::ExecutionError::Db(e) => Self::Db(e),
            availability::ExecutionError::RoomNotExists(id) => {
                Self::RoomNotExists(id)
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{Currency, Date, Money, Stay};

    use crate::{
        command,
        domain::{guest, waitlist},
        infra::mock::{self, Mock},
        Command as _,
    };

    use super::{ExecutionError, ProcessWaitlist};

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
    async fn freed_room_notifies_waiting_guest() {
        let mock = Mock::default();
        let mut room = mock::room(usd("100"));
        room.allow_waitlist = true;
        let room = mock.add_room(room);
        let block = mock.add_block(mock::block(
            room.id,
            date(2024, 11, 4),
            Some(date(2024, 11, 7)),
        ));
        let service = mock::service(mock);

        let stay = Stay::new(date(2024, 11, 4), date(2024, 11, 6)).unwrap();
        let entry = service
            .execute(command::JoinWaitlist {
                room_id: room.id,
                guest_id: guest::Id::new(),
                stay,
            })
            .await
            .unwrap();

        // Nothing to notify while the hold is in place.
        let none = service
            .execute(ProcessWaitlist {
                room_id: room.id,
                date: date(2024, 11, 1),
            })
            .await
            .unwrap();
        assert!(none.is_empty());

        service
            .execute(command::RemoveBlock { id: block.id })
            .await
            .unwrap();

        let notified = service
            .execute(ProcessWaitlist {
                room_id: room.id,
                date: date(2024, 11, 1),
            })
            .await
            .unwrap();
        assert_eq!(notified.len(), 1);
        assert_eq!(notified[0].id, entry.id);
        assert_eq!(notified[0].status, waitlist::Status::Notified);
        assert!(notified[0].notified_at.is_some());
    }

    #[tokio::test]
    async fn notified_entry_is_not_notified_twice() {
        let mock = Mock::default();
        let mut room = mock::room(usd("100"));
        room.allow_waitlist = true;
        let room = mock.add_room(room);
        let service = mock::service(mock);

        service
            .execute(command::JoinWaitlist {
                room_id: room.id,
                guest_id: guest::Id::new(),
                stay: Stay::new(date(2024, 11, 4), date(2024, 11, 6)).unwrap(),
            })
            .await
            .unwrap();

        let first = service
            .execute(ProcessWaitlist {
                room_id: room.id,
                date: date(2024, 11, 1),
            })
            .await
            .unwrap();
        assert_eq!(first.len(), 1);

        let second = service
            .execute(ProcessWaitlist {
                room_id: room.id,
                date: date(2024, 11, 1),
            })
            .await
            .unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn unknown_room_fails() {
        let service = mock::service(Mock::default());

        let result = service
            .execute(ProcessWaitlist {
                room_id: crate::domain::room::Id::new(),
                date: date(2024, 11, 1),
            })
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::RoomNotExists(_),
        ));
    }
}
