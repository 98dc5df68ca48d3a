//! [`Query`] collection related to a single [`Room`].

use common::operations::{By, Insert, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{room, Room},
    infra::{cache, database, Cache, Database},
    query::DatabaseQuery,
    Service,
};

use super::Query;

/// [`Query`] of a single [`Room`] by its ID.
///
/// Found [`Room`]s are cached as metadata entries; absence is never cached,
/// so a freshly created [`Room`] shows up immediately.
#[derive(Clone, Copy, Debug)]
pub struct ById {
    /// ID of the [`Room`] to look up.
    pub id: room::Id,
}

impl<Db, Ch> Query<ById> for Service<Db, Ch>
where
    Db: Database<
        Select<By<Option<Room>, room::Id>>,
        Ok = Option<Room>,
        Err = Traced<database::Error>,
    >,
    Ch: Cache<
            Select<cache::Key>,
            Ok = Option<cache::Value>,
            Err = Traced<cache::Error>,
        > + Cache<
            Insert<(cache::Key, cache::Value, cache::Ttl)>,
            Ok = (),
            Err = Traced<cache::Error>,
        >,
{
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ById { id }: ById,
    ) -> Result<Self::Ok, Self::Err> {
        let key = cache::Key::Room { room_id: id };
        match self.cache().execute(Select(key.clone())).await {
            Ok(Some(cache::Value::Room(room))) => return Ok(Some(room)),
            Ok(Some(_) | None) => {}
            Err(e) => {
                log::warn!("`Cache` lookup failed, recomputing: {e}");
            }
        }

        let room = self
            .database()
            .execute(Select(By::<Option<Room>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?;

        if let Some(room) = &room {
            let ttl = self.config().cache.ttl_of(&key);
            let entry = (key, cache::Value::Room(room.clone()), ttl);
            if let Err(e) = self.cache().execute(Insert(entry)).await {
                log::warn!("`Cache` population failed: {e}");
            }
        }
        Ok(room)
    }
}

/// [`Query`] of a single [`Room`] by its [`room::Number`].
pub type ByNumber = DatabaseQuery<By<Option<Room>, room::Number>>;
