//! [`RateChange`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// Audit record of a `Room` nightly rate update.
#[derive(Clone, Debug, From)]
pub struct RateChange(domain::RateChange);

/// Audit record of a `Room` nightly rate update.
#[graphql_object(context = Context)]
impl RateChange {
    /// Unique identifier of this `RateChange`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RateChange.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Re-priced `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RateChange.room",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn room(&self) -> api::Room {
        #[expect(
            unsafe_code,
            reason = "`RateChange` refers an existing `Room`"
        )]
        unsafe {
            api::Room::new_unchecked(self.0.room_id)
        }
    }

    /// Nightly rate before the update.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RateChange.previous",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn previous(&self) -> Money {
        self.0.previous
    }

    /// Nightly rate after the update.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RateChange.current",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn current(&self) -> Money {
        self.0.current
    }

    /// Reason of the update, if one was given.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RateChange.reason",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn reason(&self) -> Option<Reason> {
        self.0.reason.clone().map(Into::into)
    }

    /// Staff member who performed the update.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RateChange.performedBy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn performed_by(&self) -> api::staff::Id {
        self.0.performed_by.into()
    }

    /// `DateTime` when the update was performed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RateChange.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `RateChange`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::rate_change::Id)]
#[into(domain::rate_change::Id)]
#[graphql(name = "RateChangeId", transparent)]
pub struct Id(Uuid);

/// Reason of a `RateChange`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RateChangeReason",
    with = scalar::Via::<domain::rate_change::Reason>,
)]
pub struct Reason(domain::rate_change::Reason);
