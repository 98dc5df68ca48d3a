//! [`Command`] for creating a new [`Room`].

use common::{
    operations::{By, Commit, Insert, Invalidate, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{room, room_type, Room, RoomType},
    infra::{cache, database, Cache, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Room`] of an existing [`RoomType`].
///
/// The nightly rate and capacity default to the [`RoomType`]'s ones when
/// not provided explicitly.
#[derive(Clone, Debug)]
pub struct CreateRoom {
    /// [`room::Number`] of the new [`Room`], unique within the hotel.
    pub number: room::Number,

    /// ID of the [`RoomType`] the new [`Room`] belongs to.
    pub kind_id: room_type::Id,

    /// Floor the new [`Room`] is located on.
    pub floor: room::Floor,

    /// Number of guests the new [`Room`] accommodates, if different from
    /// the [`RoomType`]'s default.
    pub capacity: Option<room::Capacity>,

    /// Nightly rate of the new [`Room`], if different from the
    /// [`RoomType`]'s base rate.
    pub rate: Option<Money>,

    /// [`room::Amenity`]s the new [`Room`] offers.
    pub amenities: Vec<room::Amenity>,

    /// Indicator whether guests may queue for the new [`Room`].
    pub allow_waitlist: bool,

    /// Indicator whether the new [`Room`] accepts overbooked reservations.
    pub allow_overbooking: bool,

    /// Maximum number of overbooked reservations the new [`Room`] accepts.
    pub max_overbooking: room::MaxOverbooking,
}

impl<Db, Ch> Command<CreateRoom> for Service<Db, Ch>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<RoomType>, room_type::Id>>,
            Ok = Option<RoomType>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Select<By<Option<Room>, room::Number>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<Insert<Room>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ch: Cache<
        Invalidate<cache::Scope>,
        Ok = (),
        Err = Traced<cache::Error>,
    >,
{
    type Ok = Room;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRoom) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRoom {
            number,
            kind_id,
            floor,
            capacity,
            rate,
            amenities,
            allow_waitlist,
            allow_overbooking,
            max_overbooking,
        } = cmd;

        if rate.is_some_and(|rate| !rate.is_positive()) {
            return Err(tracerr::new!(E::NonPositiveRate));
        }

        let kind = self
            .database()
            .execute(Select(By::<Option<RoomType>, _>::new(kind_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|k| k.deleted_at.is_none())
            .ok_or(E::KindNotExists(kind_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Some(existing) = tx
            .execute(Select(By::<Option<Room>, _>::new(number.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::NumberOccupied(existing.id)));
        }

        let room = Room {
            id: room::Id::new(),
            number,
            kind_id: kind.id,
            floor,
            capacity: capacity.unwrap_or(kind.capacity),
            rate: rate.unwrap_or(kind.base_rate),
            status: room::Status::Active,
            amenities,
            allow_waitlist,
            allow_overbooking,
            max_overbooking,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        tx.execute(Insert(room.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // A new room may show up in any cached search.
        self.invalidate(cache::Scope::Room(room.id)).await;

        Ok(room)
    }
}

/// Error of [`CreateRoom`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`RoomType`] with the provided ID doesn't exist.
    #[display("`RoomType(id: {_0})` doesn't exist")]
    KindNotExists(#[error(not(source))] room_type::Id),

    /// Provided rate is zero or negative.
    #[display("`Room` nightly rate must be positive")]
    NonPositiveRate,

    /// Another [`Room`] carries the provided [`room::Number`].
    #[display("`Room(id: {_0})` carries the provided number already")]
    NumberOccupied(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use common::{Currency, Money};

    use crate::{
        domain::room,
        infra::mock::{self, Mock},
        Command as _,
    };

    use super::{CreateRoom, ExecutionError};

    fn usd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Usd,
        }
    }

    fn cmd(
        number: &str,
        kind_id: crate::domain::room_type::Id,
    ) -> CreateRoom {
        CreateRoom {
            number: number.parse().unwrap(),
            kind_id,
            floor: 2,
            capacity: None,
            rate: None,
            amenities: vec![room::Amenity::Wifi],
            allow_waitlist: false,
            allow_overbooking: false,
            max_overbooking: 0,
        }
    }

    #[tokio::test]
    async fn room_inherits_kind_defaults() {
        let mock = Mock::default();
        let kind = mock.add_room_type(mock::room_type(usd("120"), 3));
        let service = mock::service(mock);

        let room = service.execute(cmd("204", kind.id)).await.unwrap();

        assert_eq!(room.kind_id, kind.id);
        assert_eq!(room.rate, usd("120"));
        assert_eq!(room.capacity, 3);
        assert_eq!(room.status, room::Status::Active);
    }

    #[tokio::test]
    async fn duplicate_number_is_rejected() {
        let mock = Mock::default();
        let kind = mock.add_room_type(mock::room_type(usd("120"), 3));
        let service = mock::service(mock);

        let first = service.execute(cmd("204", kind.id)).await.unwrap();
        let result = service.execute(cmd("204", kind.id)).await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::NumberOccupied(id) if id == first.id,
        ));
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let service = mock::service(Mock::default());

        let result = service
            .execute(cmd("204", crate::domain::room_type::Id::new()))
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::KindNotExists(_),
        ));
    }
}
