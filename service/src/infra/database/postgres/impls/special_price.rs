//! [`SpecialPrice`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select},
    DateSpan, Money,
};
use tracerr::Traced;

use crate::{
    domain::{room, special_price, SpecialPrice},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Maps a `special_prices` table row onto a [`SpecialPrice`].
fn from_row(row: &tokio_postgres::Row) -> SpecialPrice {
    SpecialPrice {
        id: row.get("id"),
        room_id: row.get("room_id"),
        price: Money {
            amount: row.get("price"),
            currency: row.get("currency"),
        },
        span: DateSpan::new(row.get("since"), row.get("until"))
            .expect("`until` not before `since`"),
        label: row.get("label"),
        note: row.get("note"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<SpecialPrice>, special_price::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<SpecialPrice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<SpecialPrice>, special_price::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: special_price::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, room_id, price, currency, since, until, \
                   label, note, created_by, created_at \
            FROM special_prices \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Select<By<Vec<SpecialPrice>, (room::Id, DateSpan)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<SpecialPrice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<SpecialPrice>, (room::Id, DateSpan)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (room_id, span) = by.into_inner();

        const SQL: &str = "\
            SELECT id, room_id, price, currency, since, until, \
                   label, note, created_by, created_at \
            FROM special_prices \
            WHERE room_id = $1::UUID \
              AND since <= $3::DATE \
              AND until >= $2::DATE \
            ORDER BY since ASC";
        Ok(self
            .query(SQL, &[&room_id, &span.since(), &span.until()])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<SpecialPrice>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(price): Insert<SpecialPrice>,
    ) -> Result<Self::Ok, Self::Err> {
        let SpecialPrice {
            id,
            room_id,
            price,
            span,
            label,
            note,
            created_by,
            created_at,
        } = price;

        const SQL: &str = "\
            INSERT INTO special_prices (\
                id, room_id, price, currency, since, until, \
                label, note, created_by, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::NUMERIC, $4::INT2, \
                $5::DATE, $6::DATE, \
                $7::VARCHAR, $8::VARCHAR, $9::UUID, $10::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &room_id,
                &price.amount,
                &price.currency,
                &span.since(),
                &span.until(),
                &label,
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

impl<C> Database<Delete<By<SpecialPrice, special_price::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<SpecialPrice, special_price::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: special_price::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM special_prices \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
