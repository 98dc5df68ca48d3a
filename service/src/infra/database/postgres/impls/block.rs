//! [`Block`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select},
    Stay,
};
use tracerr::Traced;

use crate::{
    domain::{block, room, Block},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Maps a `blocks` table row onto a [`Block`].
fn from_row(row: &tokio_postgres::Row) -> Block {
    Block {
        id: row.get("id"),
        room_id: row.get("room_id"),
        reason: row.get("reason"),
        since: row.get("since"),
        until: row.get("until"),
        priority: row.get("priority"),
        note: row.get("note"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
    }
}

/// Column list shared by every `blocks` select.
const COLUMNS: &str = "\
    id, room_id, reason, since, until, \
    priority, note, created_by, created_at";

impl<C> Database<Select<By<Option<Block>, block::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Block>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Block>, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: block::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM blocks \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Select<By<Vec<Block>, (room::Id, Stay)>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Block>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Block>, (room::Id, Stay)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (room_id, stay) = by.into_inner();

        // An open-ended block (`until IS NULL`) constrains every stay
        // ending after its first day.
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM blocks \
             WHERE room_id = $1::UUID \
               AND since < $3::DATE \
               AND (until IS NULL OR until >= $2::DATE) \
             ORDER BY priority DESC, since ASC",
        );
        Ok(self
            .query(&sql, &[&room_id, &stay.check_in(), &stay.check_out()])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Block>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(block): Insert<Block>,
    ) -> Result<Self::Ok, Self::Err> {
        let Block {
            id,
            room_id,
            reason,
            since,
            until,
            priority,
            note,
            created_by,
            created_at,
        } = block;

        const SQL: &str = "\
            INSERT INTO blocks (\
                id, room_id, reason, since, until, \
                priority, note, created_by, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::DATE, $5::DATE, \
                $6::INT2, $7::VARCHAR, $8::UUID, $9::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &room_id,
                &reason,
                &since,
                &until,
                &priority,
                &note,
                &created_by,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Block, block::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Block, block::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: block::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM blocks \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
