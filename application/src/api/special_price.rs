//! [`SpecialPrice`]-related definitions.

use common::{Date, DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// Fixed nightly price of a `Room` over an explicit window of days,
/// overriding every multiplier-driven calculation.
#[derive(Clone, Debug, From)]
pub struct SpecialPrice(domain::SpecialPrice);

/// Fixed nightly price of a `Room` over an explicit window of days.
#[graphql_object(context = Context)]
impl SpecialPrice {
    /// Unique identifier of this `SpecialPrice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SpecialPrice.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Room` this `SpecialPrice` applies to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SpecialPrice.room",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn room(&self) -> api::Room {
        #[expect(
            unsafe_code,
            reason = "`SpecialPrice` refers an existing `Room`"
        )]
        unsafe {
            api::Room::new_unchecked(self.0.room_id)
        }
    }

    /// Nightly price charged within the window.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SpecialPrice.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn price(&self) -> Money {
        self.0.price
    }

    /// First day this `SpecialPrice` applies on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SpecialPrice.since",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn since(&self) -> Date {
        self.0.span.since()
    }

    /// Last day this `SpecialPrice` applies on (inclusive).
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SpecialPrice.until",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn until(&self) -> Date {
        self.0.span.until()
    }

    /// Label naming the occasion of this `SpecialPrice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SpecialPrice.label",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn label(&self) -> Label {
        self.0.label.clone().into()
    }

    /// Free-form note on this `SpecialPrice`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SpecialPrice.note",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn note(&self) -> Option<Note> {
        self.0.note.clone().map(Into::into)
    }

    /// Staff member who created this `SpecialPrice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SpecialPrice.createdBy",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_by(&self) -> api::staff::Id {
        self.0.created_by.into()
    }

    /// `DateTime` when this `SpecialPrice` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SpecialPrice.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `SpecialPrice`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::special_price::Id)]
#[into(domain::special_price::Id)]
#[graphql(name = "SpecialPriceId", transparent)]
pub struct Id(Uuid);

/// Label naming the occasion of a `SpecialPrice`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SpecialPriceLabel",
    with = scalar::Via::<domain::special_price::Label>,
)]
pub struct Label(domain::special_price::Label);

/// Free-form note on a `SpecialPrice`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SpecialPriceNote",
    with = scalar::Via::<domain::special_price::Note>,
)]
pub struct Note(domain::special_price::Note);
