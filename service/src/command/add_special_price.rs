//! [`Command`] for creating a new [`SpecialPrice`].

use common::{
    operations::{
        By, Commit, Insert, Invalidate, Lock, Select, Transact, Transacted,
    },
    DateSpan, DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{room, special_price, staff, Room, SpecialPrice},
    infra::{cache, database, Cache, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`SpecialPrice`].
///
/// Windows of [`SpecialPrice`]s of the same [`Room`] never overlap, so the
/// check and the insert happen under the [`Room`]'s lock.
#[derive(Clone, Debug)]
pub struct AddSpecialPrice {
    /// ID of the [`Room`] to price.
    pub room_id: room::Id,

    /// Nightly price charged within the window.
    pub price: Money,

    /// Inclusive window of days the price applies on.
    pub span: DateSpan,

    /// [`special_price::Label`] naming the occasion.
    pub label: special_price::Label,

    /// Free-form [`special_price::Note`], if any.
    pub note: Option<special_price::Note>,

    /// ID of the staff member performing the operation.
    pub created_by: staff::Id,
}

impl<Db, Ch> Command<AddSpecialPrice> for Service<Db, Ch>
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
            Select<By<Vec<SpecialPrice>, (room::Id, DateSpan)>>,
            Ok = Vec<SpecialPrice>,
            Err = Traced<database::Error>,
        > + Database<Insert<SpecialPrice>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ch: Cache<
        Invalidate<cache::Scope>,
        Ok = (),
        Err = Traced<cache::Error>,
    >,
{
    type Ok = SpecialPrice;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AddSpecialPrice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddSpecialPrice {
            room_id,
            price,
            span,
            label,
            note,
            created_by,
        } = cmd;

        if !price.is_positive() {
            return Err(tracerr::new!(E::NonPositivePrice));
        }

        let room = self
            .database()
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|r| r.deleted_at.is_none())
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;

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

        let overlapping = tx
            .execute(Select(By::<Vec<SpecialPrice>, _>::new((room.id, span))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(existing) = overlapping.first() {
            return Err(tracerr::new!(E::SpanOccupied(existing.id)));
        }

        let special = SpecialPrice {
            id: special_price::Id::new(),
            room_id: room.id,
            price,
            span,
            label,
            note,
            created_by,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(special.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(cache::Scope::Span {
            room_id: room.id,
            span,
        })
        .await;

        Ok(special)
    }
}

/// Error of [`AddSpecialPrice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided price is zero or negative.
    #[display("`SpecialPrice` must be positive")]
    NonPositivePrice,

    /// [`Room`] with the provided ID doesn't exist.
    #[display("`Room(id: {_0})` doesn't exist")]
    RoomNotExists(#[error(not(source))] room::Id),

    /// Another [`SpecialPrice`] overlaps the provided window.
    #[display("`SpecialPrice(id: {_0})` overlaps the provided window")]
    SpanOccupied(#[error(not(source))] special_price::Id),
}

#[cfg(test)]
mod spec {
    use common::{Currency, Date, DateSpan, Money, Stay};

    use crate::{
        infra::mock::{self, Mock},
        query,
        read,
        Command as _, Query as _,
    };

    use super::{AddSpecialPrice, ExecutionError};

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
        price: Money,
        span: DateSpan,
    ) -> AddSpecialPrice {
        AddSpecialPrice {
            room_id,
            price,
            span,
            label: "trade fair".parse().unwrap(),
            note: None,
            created_by: crate::domain::staff::Id::new(),
        }
    }

    #[tokio::test]
    async fn overlapping_windows_are_rejected() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let first =
            DateSpan::new(date(2024, 9, 1), date(2024, 9, 5)).unwrap();
        let touching =
            DateSpan::new(date(2024, 9, 5), date(2024, 9, 8)).unwrap();
        let disjoint =
            DateSpan::new(date(2024, 9, 6), date(2024, 9, 8)).unwrap();

        let created = service
            .execute(cmd(room.id, usd("200"), first))
            .await
            .unwrap();

        let conflict = service
            .execute(cmd(room.id, usd("300"), touching))
            .await
            .unwrap_err();
        assert!(matches!(
            conflict.into_inner(),
            ExecutionError::SpanOccupied(id) if id == created.id,
        ));

        service
            .execute(cmd(room.id, usd("300"), disjoint))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_positive_price_is_rejected() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let span = DateSpan::single(date(2024, 9, 1));
        let result = service.execute(cmd(room.id, usd("0"), span)).await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::NonPositivePrice,
        ));
    }

    #[tokio::test]
    async fn unknown_room_is_rejected() {
        let service = mock::service(Mock::default());

        let span = DateSpan::single(date(2024, 9, 1));
        let result = service
            .execute(cmd(crate::domain::room::Id::new(), usd("200"), span))
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::RoomNotExists(_),
        ));
    }

    #[tokio::test]
    async fn cached_prices_are_dropped_for_the_affected_window() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let service = mock::service(mock);

        let inside = date(2024, 10, 8);
        let outside = date(2024, 10, 20);
        let stay = Stay::new(date(2024, 10, 7), date(2024, 10, 10)).unwrap();

        // Warm the price, availability and quote caches.
        let cold_inside = service
            .execute(query::price::PerNight {
                room_id: room.id,
                date: inside,
            })
            .await
            .unwrap();
        let cold_outside = service
            .execute(query::price::PerNight {
                room_id: room.id,
                date: outside,
            })
            .await
            .unwrap();
        assert_eq!(cold_inside.amount, usd("72.00"));

        service
            .execute(cmd(
                room.id,
                usd("250"),
                DateSpan::new(date(2024, 10, 8), date(2024, 10, 9)).unwrap(),
            ))
            .await
            .unwrap();

        // The overridden night reprices immediately, the untouched one is
        // still served from the cache.
        let warm_inside = service
            .execute(query::price::PerNight {
                room_id: room.id,
                date: inside,
            })
            .await
            .unwrap();
        let warm_outside = service
            .execute(query::price::PerNight {
                room_id: room.id,
                date: outside,
            })
            .await
            .unwrap();

        assert_eq!(warm_inside.amount, usd("250.00"));
        assert!(matches!(
            warm_inside.source,
            read::price::Source::Special { .. },
        ));
        assert_eq!(warm_outside, cold_outside);

        // The quote over the window reflects the override as well.
        let quote = service
            .execute(query::price::ForStay {
                room_id: room.id,
                stay,
            })
            .await
            .unwrap();
        assert_eq!(quote.total, usd("572.00"));
    }
}
