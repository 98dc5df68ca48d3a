//! [`Command`] for updating a [`Room`]'s nightly rate.

use common::{
    operations::{
        By, Commit, Insert, Invalidate, Lock, Select, Transact, Transacted,
        Update,
    },
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rate_change, room, staff, RateChange, Room},
    infra::{cache, database, Cache, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Room`]'s nightly rate.
///
/// The update is audited: a [`RateChange`] carrying the previous and the new
/// rate is appended in the same transaction.
#[derive(Clone, Debug)]
pub struct UpdateRoomRate {
    /// ID of the [`Room`] to re-price.
    pub room_id: room::Id,

    /// New nightly rate of the [`Room`].
    pub rate: Money,

    /// [`rate_change::Reason`] of the update, if any.
    pub reason: Option<rate_change::Reason>,

    /// ID of the staff member performing the operation.
    pub performed_by: staff::Id,
}

impl<Db, Ch> Command<UpdateRoomRate> for Service<Db, Ch>
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
        + Database<Insert<RateChange>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ch: Cache<
        Invalidate<cache::Scope>,
        Ok = (),
        Err = Traced<cache::Error>,
    >,
{
    type Ok = RateChange;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateRoomRate,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRoomRate {
            room_id,
            rate,
            reason,
            performed_by,
        } = cmd;

        if !rate.is_positive() {
            return Err(tracerr::new!(E::NonPositiveRate));
        }

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

        let mut room = tx
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|r| r.deleted_at.is_none())
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;

        let change = RateChange {
            id: rate_change::Id::new(),
            room_id: room.id,
            previous: room.rate,
            current: rate,
            reason,
            performed_by,
            created_at: DateTime::now().coerce(),
        };

        room.rate = rate;
        tx.execute(Update(room))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Insert(change.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Every cached price of the room derives from the old rate.
        self.invalidate(cache::Scope::Room(change.room_id)).await;

        Ok(change)
    }
}

/// Error of [`UpdateRoomRate`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided rate is zero or negative.
    #[display("`Room` nightly rate must be positive")]
    NonPositiveRate,

    /// [`Room`] with the provided ID doesn't exist.
    #[display("`Room(id: {_0})` doesn't exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use common::{Currency, Date, Money};

    use crate::{
        domain::staff,
        infra::mock::{self, Mock},
        query,
        Command as _, Query as _,
    };

    use super::{ExecutionError, UpdateRoomRate};

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
    async fn audited_update_reprices_cached_nights() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        // Shoulder-season Monday: 100 * 0.8 * 1.0 * 0.9.
        let night = query::price::PerNight {
            room_id: room.id,
            date: date(2024, 10, 7),
        };
        let before = service.execute(night).await.unwrap();
        assert_eq!(before.amount, usd("72.00"));

        let change = service
            .execute(UpdateRoomRate {
                room_id: room.id,
                rate: usd("200"),
                reason: Some("seasonal reprice".parse().unwrap()),
                performed_by: staff::Id::new(),
            })
            .await
            .unwrap();
        assert_eq!(change.previous, usd("100"));
        assert_eq!(change.current, usd("200"));

        let after = service.execute(night).await.unwrap();
        assert_eq!(after.amount, usd("144.00"));
    }

    #[tokio::test]
    async fn non_positive_rate_is_rejected() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let result = service
            .execute(UpdateRoomRate {
                room_id: room.id,
                rate: usd("0"),
                reason: None,
                performed_by: staff::Id::new(),
            })
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::NonPositiveRate,
        ));
    }

    #[tokio::test]
    async fn repricing_an_unknown_room_fails() {
        let service = mock::service(Mock::default());

        let result = service
            .execute(UpdateRoomRate {
                room_id: crate::domain::room::Id::new(),
                rate: usd("200"),
                reason: None,
                performed_by: staff::Id::new(),
            })
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::RoomNotExists(_),
        ));
    }
}
