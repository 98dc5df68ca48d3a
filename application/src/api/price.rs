//! Price-related definitions.

use common::{Date, Money};
use derive_more::From;
use juniper::{graphql_object, GraphQLObject, GraphQLUnion};
use service::read;

use crate::{api, AsError, Context, Error};

/// Priced stay of a `Room`.
#[derive(Clone, Debug, From)]
pub struct Quote(read::price::Quote);

/// Priced stay of a `Room`.
#[graphql_object(context = Context)]
impl Quote {
    /// Sum of all the nights of the stay.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Quote.total", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn total(&self) -> Money {
        self.0.total
    }

    /// Number of charged nights (checkout day is never charged).
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Quote.nights", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn nights(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(self.0.nights)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Per-night breakdown, in chronological order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.breakdown",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn breakdown(&self) -> Vec<Night> {
        self.0.breakdown.iter().cloned().map(Into::into).collect()
    }
}

/// Price of a single night along with the way it was derived.
#[derive(Clone, Debug, From)]
pub struct Night(read::price::Night);

/// Price of a single night along with the way it was derived.
#[graphql_object(context = Context)]
impl Night {
    /// Date of the night.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Night.date", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn date(&self) -> Date {
        self.0.date
    }

    /// Charged amount.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Night.amount", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn amount(&self) -> Money {
        self.0.amount
    }

    /// Source the amount was derived from.
    #[tracing::instrument(
        skip_all,
        fields(gql.name = "Night.source", otel.name = api::Query::SPAN_NAME),
    )]
    pub fn source(&self) -> Source {
        self.0.source.clone().into()
    }
}

/// Source of a `Night`'s price.
#[derive(Clone, Debug, GraphQLUnion)]
#[graphql(name = "PriceSource", context = Context)]
pub enum Source {
    /// Verbatim `SpecialPrice`, bypassing every multiplier.
    Special(SpecialSource),

    /// Multiplier-driven tariff calculation over the `Room`'s nightly rate.
    Tariff(TariffSource),
}

impl From<read::price::Source> for Source {
    fn from(source: read::price::Source) -> Self {
        use read::price::Source as S;

        match source {
            S::Special { id, label } => Self::Special(SpecialSource {
                special_price_id: id.into(),
                label: label.into(),
            }),
            S::Tariff { seasonal, weekday, occupancy } => {
                Self::Tariff(TariffSource {
                    seasonal: seasonal.to_string(),
                    weekday: weekday.to_string(),
                    occupancy: occupancy.to_string(),
                })
            }
        }
    }
}

/// Verbatim `SpecialPrice` a night's price was taken from.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct SpecialSource {
    /// Applied `SpecialPrice`.
    pub special_price_id: api::special_price::Id,

    /// Label of the applied `SpecialPrice`.
    pub label: api::special_price::Label,
}

/// Tariff multipliers a night's price was derived with.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct TariffSource {
    /// Applied seasonal multiplier, as a decimal string.
    pub seasonal: String,

    /// Applied day-of-week multiplier, as a decimal string.
    pub weekday: String,

    /// Applied occupancy multiplier, as a decimal string.
    pub occupancy: String,
}
