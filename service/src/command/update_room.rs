//! [`Command`] for updating a [`Room`]'s attributes.

use common::operations::{
    By, Commit, Invalidate, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{room, Room},
    infra::{cache, database, Cache, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Room`]'s attributes.
///
/// Only the provided fields change; the nightly rate has its own audited
/// [`UpdateRoomRate`](super::UpdateRoomRate) command.
#[derive(Clone, Debug)]
pub struct UpdateRoom {
    /// ID of the [`Room`] to update.
    pub id: room::Id,

    /// New floor of the [`Room`], if any.
    pub floor: Option<room::Floor>,

    /// New capacity of the [`Room`], if any.
    pub capacity: Option<room::Capacity>,

    /// New [`room::Status`] of the [`Room`], if any.
    pub status: Option<room::Status>,

    /// New [`room::Amenity`] set of the [`Room`], if any.
    pub amenities: Option<Vec<room::Amenity>>,

    /// New waitlist allowance of the [`Room`], if any.
    pub allow_waitlist: Option<bool>,

    /// New overbooking allowance of the [`Room`], if any.
    pub allow_overbooking: Option<bool>,

    /// New overbooking limit of the [`Room`], if any.
    pub max_overbooking: Option<room::MaxOverbooking>,
}

impl<Db, Ch> Command<UpdateRoom> for Service<Db, Ch>
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

    async fn execute(&self, cmd: UpdateRoom) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRoom {
            id,
            floor,
            capacity,
            status,
            amenities,
            allow_waitlist,
            allow_overbooking,
            max_overbooking,
        } = cmd;

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

        if let Some(floor) = floor {
            room.floor = floor;
        }
        if let Some(capacity) = capacity {
            room.capacity = capacity;
        }
        if let Some(status) = status {
            room.status = status;
        }
        if let Some(amenities) = amenities {
            room.amenities = amenities;
        }
        if let Some(allow_waitlist) = allow_waitlist {
            room.allow_waitlist = allow_waitlist;
        }
        if let Some(allow_overbooking) = allow_overbooking {
            room.allow_overbooking = allow_overbooking;
        }
        if let Some(max_overbooking) = max_overbooking {
            room.max_overbooking = max_overbooking;
        }

        tx.execute(Update(room.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Status flips affect every cached verdict of the room.
        self.invalidate(cache::Scope::Room(room.id)).await;

        Ok(room)
    }
}

/// Error of [`UpdateRoom`] [`Command`] execution.
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
        domain::room,
        infra::mock::{self, Mock},
        query,
        read::availability::{Reason, Verdict},
        Command as _, Query as _,
    };

    use super::{ExecutionError, UpdateRoom};

    fn usd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Usd,
        }
    }

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    fn cmd(id: room::Id) -> UpdateRoom {
        UpdateRoom {
            id,
            floor: None,
            capacity: None,
            status: None,
            amenities: None,
            allow_waitlist: None,
            allow_overbooking: None,
            max_overbooking: None,
        }
    }

    #[tokio::test]
    async fn only_provided_fields_change() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let updated = service
            .execute(UpdateRoom {
                floor: Some(5),
                ..cmd(room.id)
            })
            .await
            .unwrap();

        assert_eq!(updated.floor, 5);
        assert_eq!(updated.capacity, room.capacity);
        assert_eq!(updated.rate, room.rate);
    }

    #[tokio::test]
    async fn deactivation_closes_cached_availability() {
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
            .execute(UpdateRoom {
                status: Some(room::Status::Maintenance),
                ..cmd(room.id)
            })
            .await
            .unwrap();

        let after = service
            .execute(query::availability::OfRoom {
                room_id: room.id,
                stay: window,
            })
            .await
            .unwrap();
        assert_eq!(after, Verdict::Unavailable(Reason::RoomClosed));
    }

    #[tokio::test]
    async fn updating_an_unknown_room_fails() {
        let service = mock::service(Mock::default());

        let result = service.execute(cmd(room::Id::new())).await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::RoomNotExists(_),
        ));
    }
}
