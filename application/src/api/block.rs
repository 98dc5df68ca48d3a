//! [`Block`]-related definitions.

use common::{Date, DateTime};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// Administrative hold removing a `Room` from availability, regardless of
/// its `Reservation`s.
#[derive(Clone, Debug, From)]
pub struct Block(domain::Block);

/// Administrative hold removing a `Room` from availability.
#[graphql_object(context = Context)]
impl Block {
    /// Unique identifier of this `Block`.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Block.id", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Room` this `Block` holds.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Block.room", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn room(&self) -> api::Room {
        #[expect(unsafe_code, reason = "`Block` refers an existing `Room`")]
        unsafe {
            api::Room::new_unchecked(self.0.room_id)
        }
    }

    /// Reason of this `Block`.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Block.reason", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn reason(&self) -> Reason {
        self.0.reason.clone().into()
    }

    /// First day this `Block` holds the `Room` on.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Block.since", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn since(&self) -> Date {
        self.0.since
    }

    /// Last day this `Block` holds the `Room` on (inclusive).
    ///
    /// Absence keeps the `Block` active until it's explicitly removed.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Block.until", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn until(&self) -> Option<Date> {
        self.0.until
    }

    /// Priority of this `Block` among others of the same `Room`.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Block.priority", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn priority(&self) -> i32 {
        i32::from(self.0.priority)
    }

    /// Free-form note on this `Block`, if any.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Block.note", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn note(&self) -> Option<Note> {
        self.0.note.clone().map(Into::into)
    }

    /// Staff member who created this `Block`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Block.createdBy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_by(&self) -> api::staff::Id {
        self.0.created_by.into()
    }

    /// `DateTime` when this `Block` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Block.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Block`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::block::Id)]
#[into(domain::block::Id)]
#[graphql(name = "BlockId", transparent)]
pub struct Id(Uuid);

/// Reason of a `Block`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "BlockReason", with = scalar::Via::<domain::block::Reason>)]
pub struct Reason(domain::block::Reason);

/// Free-form note on a `Block`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "BlockNote", with = scalar::Via::<domain::block::Note>)]
pub struct Note(domain::block::Note);
