//! [`RateChange`]-related [`Database`] implementations.

use common::operations::Insert;
use tracerr::Traced;

use crate::{
    domain::RateChange,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Insert<RateChange>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(change): Insert<RateChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let RateChange {
            id,
            room_id,
            previous,
            current,
            reason,
            performed_by,
            created_at,
        } = change;

        // Audit rows are append-only.
        const SQL: &str = "\
            INSERT INTO rate_changes (\
                id, room_id, previous, current, currency, \
                reason, performed_by, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::NUMERIC, $4::NUMERIC, $5::INT2, \
                $6::VARCHAR, $7::UUID, $8::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &room_id,
                &previous.amount,
                &current.amount,
                &current.currency,
                &reason,
                &performed_by,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
