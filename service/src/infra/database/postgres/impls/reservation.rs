//! [`Reservation`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select},
    Date, Money, Stay,
};
use tracerr::Traced;

use crate::{
    domain::{reservation, room, Reservation},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Maps a `reservations` table row onto a [`Reservation`].
fn from_row(row: &tokio_postgres::Row) -> Reservation {
    Reservation {
        id: row.get("id"),
        room_id: row.get("room_id"),
        guest_id: row.get("guest_id"),
        stay: Stay::new(row.get("check_in"), row.get("check_out"))
            .expect("`check_in` before `check_out`"),
        status: row.get("status"),
        is_overbooked: row.get("is_overbooked"),
        total: Money {
            amount: row.get("total"),
            currency: row.get("currency"),
        },
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
    }
}

/// Column list shared by every `reservations` select.
const COLUMNS: &str = "\
    id, room_id, guest_id, check_in, check_out, \
    status, is_overbooked, total, currency, \
    created_at, deleted_at";

/// [`reservation::Status`]es holding a room against new bookings.
const HOLDING: [reservation::Status; 2] = [
    reservation::Status::Confirmed,
    reservation::Status::CheckedIn,
];

impl<C> Database<Select<By<Vec<Reservation>, (room::Id, Stay)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, (room::Id, Stay)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (room_id, stay) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM reservations \
             WHERE room_id = $1::UUID \
               AND deleted_at IS NULL \
               AND status = ANY($2::INT2[]) \
               AND check_in < $4::DATE \
               AND check_out > $3::DATE \
             ORDER BY check_in ASC",
        );
        Ok(self
            .query(
                &sql,
                &[
                    &room_id,
                    &HOLDING.as_slice(),
                    &stay.check_in(),
                    &stay.check_out(),
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Reservation>, (room::Id, Date)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, (room::Id, Date)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (room_id, since) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM reservations \
             WHERE room_id = $1::UUID \
               AND deleted_at IS NULL \
               AND status = ANY($2::INT2[]) \
               AND check_out > $3::DATE \
             ORDER BY check_in ASC",
        );
        Ok(self
            .query(&sql, &[&room_id, &HOLDING.as_slice(), &since])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Reservation>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(reservation): Insert<Reservation>,
    ) -> Result<Self::Ok, Self::Err> {
        let Reservation {
            id,
            room_id,
            guest_id,
            stay,
            status,
            is_overbooked,
            total,
            created_at,
            deleted_at,
        } = reservation;

        const SQL: &str = "\
            INSERT INTO reservations (\
                id, room_id, guest_id, check_in, check_out, \
                status, is_overbooked, total, currency, \
                created_at, deleted_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::DATE, $5::DATE, \
                $6::INT2, $7::BOOL, $8::NUMERIC, $9::INT2, \
                $10::TIMESTAMPTZ, $11::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &room_id,
                &guest_id,
                &stay.check_in(),
                &stay.check_out(),
                &status,
                &is_overbooked,
                &total.amount,
                &total.currency,
                &created_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<read::price::Occupancy, Date>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::price::Occupancy;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::price::Occupancy, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let date: Date = by.into_inner();

        // A hotel without any rooms counts as fully vacant.
        const SQL: &str = "\
            SELECT (\
                SELECT COUNT(DISTINCT res.room_id) \
                FROM reservations AS res \
                JOIN rooms AS r \
                  ON r.id = res.room_id AND r.deleted_at IS NULL \
                WHERE res.deleted_at IS NULL \
                  AND res.status = ANY($2::INT2[]) \
                  AND res.check_in <= $1::DATE \
                  AND res.check_out > $1::DATE \
            )::NUMERIC \
            / GREATEST((\
                SELECT COUNT(*) \
                FROM rooms \
                WHERE deleted_at IS NULL \
            ), 1)::NUMERIC";
        self.query_opt(SQL, &[&date, &HOLDING.as_slice()])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| {
                read::price::Occupancy(
                    row.expect("always exists").get(0),
                )
            })
    }
}
