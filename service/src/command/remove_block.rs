//! [`Command`] for removing a [`Block`].

use common::{
    operations::{By, Delete, Invalidate, Select},
    DateSpan,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{block, Block},
    infra::{cache, database, Cache, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::Room;

use super::Command;

/// [`Command`] for removing a [`Block`], releasing its [`Room`] back into
/// availability.
#[derive(Clone, Copy, Debug)]
pub struct RemoveBlock {
    /// ID of the [`Block`] to remove.
    pub id: block::Id,
}

impl<Db, Ch> Command<RemoveBlock> for Service<Db, Ch>
where
    Db: Database<
            Select<By<Option<Block>, block::Id>>,
            Ok = Option<Block>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Block, block::Id>>,
            Err = Traced<database::Error>,
        >,
    Ch: Cache<
        Invalidate<cache::Scope>,
        Ok = (),
        Err = Traced<cache::Error>,
    >,
{
    type Ok = Block;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        RemoveBlock { id }: RemoveBlock,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let block = self
            .database()
            .execute(Select(By::<Option<Block>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Delete(By::<Block, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(match block.until {
            Some(until) => cache::Scope::Span {
                room_id: block.room_id,
                span: DateSpan::new(block.since, until)
                    .expect("valid by construction"),
            },
            None => cache::Scope::Room(block.room_id),
        })
        .await;

        Ok(block)
    }
}

/// Error of [`RemoveBlock`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Block`] with the provided ID doesn't exist.
    #[display("`Block(id: {_0})` doesn't exist")]
    NotExists(#[error(not(source))] block::Id),
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

    use super::{ExecutionError, RemoveBlock};

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    fn usd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Usd,
        }
    }

    #[tokio::test]
    async fn removing_a_block_releases_the_room() {
        let mock = Mock::default();
        let room = mock.add_room(mock::room(usd("100")));
        let block = mock.add_block(mock::block(
            room.id,
            date(2024, 11, 5),
            Some(date(2024, 11, 5)),
        ));
        let service = mock::service(mock);

        let window = Stay::new(date(2024, 11, 4), date(2024, 11, 6)).unwrap();
        let held = service
            .execute(query::availability::OfRoom {
                room_id: room.id,
                stay: window,
            })
            .await
            .unwrap();
        assert_eq!(held, Verdict::Unavailable(Reason::Blocked));

        let removed =
            service.execute(RemoveBlock { id: block.id }).await.unwrap();
        assert_eq!(removed.id, block.id);

        let released = service
            .execute(query::availability::OfRoom {
                room_id: room.id,
                stay: window,
            })
            .await
            .unwrap();
        assert_eq!(released, Verdict::Available);
    }

    #[tokio::test]
    async fn removing_an_unknown_block_fails() {
        let service = mock::service(Mock::default());

        let result = service
            .execute(RemoveBlock {
                id: crate::domain::block::Id::new(),
            })
            .await;

        assert!(matches!(
            result.unwrap_err().into_inner(),
            ExecutionError::NotExists(_),
        ));
    }
}
