//! [`RoomType`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// Grouping of `Room`s sharing a base rate and amenity set.
#[derive(Clone, Debug, From)]
pub struct RoomType {
    /// ID of this [`RoomType`].
    id: Id,

    /// Underlying [`domain::RoomType`].
    kind: OnceCell<domain::RoomType>,
}

impl From<domain::RoomType> for RoomType {
    fn from(kind: domain::RoomType) -> Self {
        Self {
            id: kind.id.into(),
            kind: OnceCell::new_with(Some(kind)),
        }
    }
}

impl RoomType {
    /// Creates a new [`RoomType`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`RoomType`] with the provided ID exists,
    /// otherwise accessing this [`RoomType`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            kind: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::RoomType`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::RoomType`] doesn't exist.
    async fn kind(&self, ctx: &Context) -> Result<&domain::RoomType, Error> {
        let id = self.id.into();
        self.kind
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::room_type::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|k| {
                        future::ready(k.ok_or_else(|| {
                            api::query::RoomTypeError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// Grouping of `Room`s sharing a base rate and amenity set.
#[graphql_object(context = Context)]
impl RoomType {
    /// Unique identifier of this `RoomType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomType.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `RoomType`, unique within the hotel.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomType.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.kind(ctx).await?.name.clone().into())
    }

    /// Default nightly rate of `Room`s of this `RoomType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomType.baseRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn base_rate(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.kind(ctx).await?.base_rate)
    }

    /// Default number of guests `Room`s of this `RoomType` accommodate.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomType.capacity",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn capacity(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(i32::from(self.kind(ctx).await?.capacity))
    }

    /// Amenities every `Room` of this `RoomType` offers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomType.amenities",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn amenities(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::room::Amenity>, Error> {
        Ok(self
            .kind(ctx)
            .await?
            .amenities
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// `DateTime` when this `RoomType` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomType.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.kind(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `RoomType`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::room_type::Id)]
#[into(domain::room_type::Id)]
#[graphql(name = "RoomTypeId", transparent)]
pub struct Id(Uuid);

/// Name of a `RoomType`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RoomTypeName",
    with = scalar::Via::<domain::room_type::Name>,
)]
pub struct Name(domain::room_type::Name);
