//! [`Room`]-related [`Database`] implementations.

use common::{operations::{By, Insert, Lock, Select, Update}, Money};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{room, room_type, Room},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Maps a `rooms` table row onto a [`Room`].
fn from_row(row: &tokio_postgres::Row) -> Room {
    Room {
        id: row.get("id"),
        number: row.get("number"),
        kind_id: row.get("kind_id"),
        floor: row.get("floor"),
        capacity: u16::try_from(row.get::<_, i32>("capacity"))
            .expect("`capacity` overflow"),
        rate: Money {
            amount: row.get("rate"),
            currency: row.get("currency"),
        },
        status: row.get("status"),
        amenities: row
            .get::<_, Vec<String>>("amenities")
            .into_iter()
            .map(room::Amenity::from)
            .collect(),
        allow_waitlist: row.get("allow_waitlist"),
        allow_overbooking: row.get("allow_overbooking"),
        max_overbooking: u16::try_from(row.get::<_, i32>("max_overbooking"))
            .expect("`max_overbooking` overflow"),
        created_at: row.get("created_at"),
        deleted_at: row.get("deleted_at"),
    }
}

/// Column list shared by every `rooms` select.
const COLUMNS: &str = "\
    id, number, kind_id, floor, capacity, \
    rate, currency, status, amenities, \
    allow_waitlist, allow_overbooking, max_overbooking, \
    created_at, deleted_at";

impl<C> Database<Select<By<Option<Room>, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: room::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rooms \
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

impl<C> Database<Select<By<Option<Room>, room::Number>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let number: room::Number = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rooms \
             WHERE number = $1::VARCHAR \
               AND deleted_at IS NULL \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&number])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Select<By<Vec<Room>, Option<room_type::Id>>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Room>, Option<room_type::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let kind_id: Option<room_type::Id> = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rooms \
             WHERE deleted_at IS NULL \
               AND ($1::UUID IS NULL OR kind_id = $1::UUID) \
             ORDER BY id ASC",
        );
        Ok(self
            .query(&sql, &[&kind_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Room>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Room>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(room): Insert<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(room)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Room>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(room): Update<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        let Room {
            id,
            number,
            kind_id,
            floor,
            capacity,
            rate,
            status,
            amenities,
            allow_waitlist,
            allow_overbooking,
            max_overbooking,
            created_at,
            deleted_at,
        } = room;

        let capacity = i32::from(capacity);
        let max_overbooking = i32::from(max_overbooking);
        let amenities = amenities
            .iter()
            .map(|a| a.as_str().to_owned())
            .collect::<Vec<_>>();

        const SQL: &str = "\
            INSERT INTO rooms (\
                id, number, kind_id, floor, capacity, \
                rate, currency, status, amenities, \
                allow_waitlist, allow_overbooking, max_overbooking, \
                created_at, deleted_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::UUID, $4::INT2, $5::INT4, \
                $6::NUMERIC, $7::INT2, $8::INT2, $9::VARCHAR[], \
                $10::BOOL, $11::BOOL, $12::INT4, \
                $13::TIMESTAMPTZ, $14::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET number = EXCLUDED.number, \
                kind_id = EXCLUDED.kind_id, \
                floor = EXCLUDED.floor, \
                capacity = EXCLUDED.capacity, \
                rate = EXCLUDED.rate, \
                currency = EXCLUDED.currency, \
                status = EXCLUDED.status, \
                amenities = EXCLUDED.amenities, \
                allow_waitlist = EXCLUDED.allow_waitlist, \
                allow_overbooking = EXCLUDED.allow_overbooking, \
                max_overbooking = EXCLUDED.max_overbooking, \
                created_at = EXCLUDED.created_at, \
                deleted_at = EXCLUDED.deleted_at";
        self.exec(
            SQL,
            &[
                &id,
                &number,
                &kind_id,
                &floor,
                &capacity,
                &rate.amount,
                &rate.currency,
                &status,
                &amenities,
                &allow_waitlist,
                &allow_overbooking,
                &max_overbooking,
                &created_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Room, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Room, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: room::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO rooms_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::room::list::Page, read::room::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::room::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::room::list::Page, read::room::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::room::list::Selector {
            arguments,
            filter: read::room::list::Filter { kind_id, status },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let kind_idx = kind_id.as_ref().map(|k| {
            ps.push(k);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM rooms \
             WHERE deleted_at IS NULL \
                   {cursor} \
                   {kind_filtering} \
                   {status_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            kind_filtering = kind_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND kind_id = ${idx}::UUID"))
            }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::room::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::room::list::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::room::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::room::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM rooms \
            WHERE deleted_at IS NULL";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
