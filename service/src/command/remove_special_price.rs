//! [`Command`] for removing a [`SpecialPrice`].

use common::operations::{By, Delete, Invalidate, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{special_price, SpecialPrice},
    infra::{cache, database, Cache, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::Room;

use super::Command;

/// [`Command`] for removing a [`SpecialPrice`], reverting the covered
/// nights back to the multiplier-driven calculation.
#[derive(Clone, Copy, Debug)]
pub struct RemoveSpecialPrice {
    /// ID of the [`SpecialPrice`] to remove.
    pub id: special_price::Id,
}

impl<Db, Ch> Command<RemoveSpecialPrice> for Service<Db, Ch>
where
    Db: Database<
            Select<By<Option<SpecialPrice>, special_price::Id>>,
            Ok = Option<SpecialPrice>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<SpecialPrice, special_price::Id>>,
            Err = Traced<database::Error>,
        >,
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
        RemoveSpecialPrice { id }: RemoveSpecialPrice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let special = self
            .database()
            .execute(Select(By::<Option<SpecialPrice>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Delete(By::<SpecialPrice, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.invalidate(cache::Scope::Span {
            room_id: special.room_id,
            span: special.span,
        })
        .await;

        Ok(special)
    }
}

/// Error of [`RemoveSpecialPrice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`SpecialPrice`] with the provided ID doesn't exist.
    #[display("`SpecialPrice(id: {_0})` doesn't exist")]
    NotExists(#[error(not(source))] special_price::Id),
}
