//! [`RoomType`]-related [`Database`] implementations.

use common::{operations::{By, Select}, Money};
use tracerr::Traced;

use crate::{
    domain::{room, room_type, RoomType},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<RoomType>, room_type::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RoomType>, room_type::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: room_type::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, base_rate, currency, capacity, amenities, \
                   created_at, deleted_at \
            FROM room_kinds \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| RoomType {
                id: row.get("id"),
                name: row.get("name"),
                base_rate: Money {
                    amount: row.get("base_rate"),
                    currency: row.get("currency"),
                },
                capacity: u16::try_from(row.get::<_, i32>("capacity"))
                    .expect("`capacity` overflow"),
                amenities: row
                    .get::<_, Vec<String>>("amenities")
                    .into_iter()
                    .map(room::Amenity::from)
                    .collect(),
                created_at: row.get("created_at"),
                deleted_at: row.get("deleted_at"),
            }))
    }
}
