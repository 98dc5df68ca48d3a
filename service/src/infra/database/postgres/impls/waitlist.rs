//! [`WaitlistEntry`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select, Update},
    Date, Stay,
};
use tracerr::Traced;

use crate::{
    domain::{room, waitlist, WaitlistEntry},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Maps a `waitlist_entries` table row onto a [`WaitlistEntry`].
fn from_row(row: &tokio_postgres::Row) -> WaitlistEntry {
    WaitlistEntry {
        id: row.get("id"),
        room_id: row.get("room_id"),
        guest_id: row.get("guest_id"),
        stay: Stay::new(row.get("check_in"), row.get("check_out"))
            .expect("`check_in` before `check_out`"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        notified_at: row.get("notified_at"),
    }
}

impl<C> Database<Select<By<Vec<WaitlistEntry>, (room::Id, Date)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<WaitlistEntry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<WaitlistEntry>, (room::Id, Date)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (room_id, today) = by.into_inner();

        const SQL: &str = "\
            SELECT id, room_id, guest_id, check_in, check_out, \
                   status, created_at, notified_at \
            FROM waitlist_entries \
            WHERE room_id = $1::UUID \
              AND status = $2::INT2 \
              AND check_in >= $3::DATE \
            ORDER BY created_at ASC";
        Ok(self
            .query(SQL, &[&room_id, &waitlist::Status::Waiting, &today])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<WaitlistEntry>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<WaitlistEntry>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(entry): Insert<WaitlistEntry>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(entry)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<WaitlistEntry>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(entry): Update<WaitlistEntry>,
    ) -> Result<Self::Ok, Self::Err> {
        let WaitlistEntry {
            id,
            room_id,
            guest_id,
            stay,
            status,
            created_at,
            notified_at,
        } = entry;

        const SQL: &str = "\
            INSERT INTO waitlist_entries (\
                id, room_id, guest_id, check_in, check_out, \
                status, created_at, notified_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::DATE, $5::DATE, \
                $6::INT2, $7::TIMESTAMPTZ, $8::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET status = EXCLUDED.status, \
                notified_at = EXCLUDED.notified_at";
        self.exec(
            SQL,
            &[
                &id,
                &room_id,
                &guest_id,
                &stay.check_in(),
                &stay.check_out(),
                &status,
                &created_at,
                &notified_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<By<Vec<waitlist::Id>, (Date, i64)>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<waitlist::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Vec<waitlist::Id>, (Date, i64)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (today, chunk) = by.into_inner();

        const SQL: &str = "\
            UPDATE waitlist_entries \
            SET status = $4::INT2 \
            WHERE id IN (\
                SELECT id \
                FROM waitlist_entries \
                WHERE status = $3::INT2 \
                  AND check_in < $1::DATE \
                LIMIT $2::INT8 \
            ) \
            RETURNING id";
        Ok(self
            .query(
                SQL,
                &[
                    &today,
                    &chunk,
                    &waitlist::Status::Waiting,
                    &waitlist::Status::Expired,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| row.get("id"))
            .collect())
    }
}
