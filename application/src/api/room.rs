//! [`Room`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A hotel room.
#[derive(Clone, Debug, From)]
pub struct Room {
    /// ID of this [`Room`].
    id: Id,

    /// Underlying [`domain::Room`].
    room: OnceCell<domain::Room>,
}

impl From<domain::Room> for Room {
    fn from(room: domain::Room) -> Self {
        Self {
            id: room.id.into(),
            room: OnceCell::new_with(Some(room)),
        }
    }
}

impl Room {
    /// Creates a new [`Room`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Room`] with the provided ID exists,
    /// otherwise accessing this [`Room`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            room: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Room`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Room`] doesn't exist.
    async fn room(&self, ctx: &Context) -> Result<&domain::Room, Error> {
        let id = self.id.into();
        self.room
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::room::ById { id })
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::RoomError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A hotel room.
#[graphql_object(context = Context)]
impl Room {
    /// Unique identifier of this `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Number of this `Room`, as printed on its door.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.number",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn number(&self, ctx: &Context) -> Result<Number, Error> {
        Ok(self.room(ctx).await?.number.clone().into())
    }

    /// `RoomType` this `Room` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<api::RoomType, Error> {
        let kind_id = self.room(ctx).await?.kind_id;
        #[expect(unsafe_code, reason = "`Room` refers an existing `RoomType`")]
        Ok(unsafe { api::RoomType::new_unchecked(kind_id) })
    }

    /// Floor this `Room` is located on.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.floor",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn floor(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(i32::from(self.room(ctx).await?.floor))
    }

    /// Number of guests this `Room` accommodates.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.capacity",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn capacity(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(i32::from(self.room(ctx).await?.capacity))
    }

    /// Current nightly rate of this `Room`, before any multipliers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.rate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rate(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.room(ctx).await?.rate)
    }

    /// Status of this `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.room(ctx).await?.status.into())
    }

    /// Amenities this `Room` offers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.amenities",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn amenities(&self, ctx: &Context) -> Result<Vec<Amenity>, Error> {
        Ok(self
            .room(ctx)
            .await?
            .amenities
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Indicator whether guests may queue for this `Room` when it's
    /// unavailable.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.allowWaitlist",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn allow_waitlist(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.room(ctx).await?.allow_waitlist)
    }

    /// Indicator whether this `Room` accepts reservations beyond its
    /// physical capacity.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.allowOverbooking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn allow_overbooking(
        &self,
        ctx: &Context,
    ) -> Result<bool, Error> {
        Ok(self.room(ctx).await?.allow_overbooking)
    }

    /// Maximum number of overbooked reservations this `Room` accepts.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.maxOverbooking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn max_overbooking(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(i32::from(self.room(ctx).await?.max_overbooking))
    }

    /// `DateTime` when this `Room` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Room.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.room(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Room`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::room::Id)]
#[into(domain::room::Id)]
#[graphql(name = "RoomId", transparent)]
pub struct Id(Uuid);

/// Number of a `Room`, as printed on its door.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RoomNumber",
    with = scalar::Via::<domain::room::Number>,
)]
pub struct Number(domain::room::Number);

/// Status of a `Room`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RoomStatus")]
pub enum Status {
    /// The `Room` hosts guests.
    Active,

    /// The `Room` is withdrawn from service.
    Inactive,

    /// The `Room` is under maintenance.
    Maintenance,
}

impl From<domain::room::Status> for Status {
    fn from(status: domain::room::Status) -> Self {
        use domain::room::Status as S;
        match status {
            S::Active => Self::Active,
            S::Inactive => Self::Inactive,
            S::Maintenance => Self::Maintenance,
        }
    }
}

impl From<Status> for domain::room::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Active => Self::Active,
            Status::Inactive => Self::Inactive,
            Status::Maintenance => Self::Maintenance,
        }
    }
}

/// Amenity a `Room` offers.
///
/// Known amenities travel as their canonical tags (`wifi`, `balcony`, ...);
/// anything else is preserved verbatim.
#[derive(Clone, Debug, Display, GraphQLScalar)]
#[graphql(name = "RoomAmenity", transparent)]
pub struct Amenity(String);

impl From<domain::room::Amenity> for Amenity {
    fn from(amenity: domain::room::Amenity) -> Self {
        Self(amenity.as_str().to_owned())
    }
}

impl From<Amenity> for domain::room::Amenity {
    fn from(amenity: Amenity) -> Self {
        amenity.0.into()
    }
}

pub mod list {
    //! Definitions related to the [`Room`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Room};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Room` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::room::list::Cursor)]
    #[graphql(
        name = "RoomListCursor",
        with = scalar::Via::<read::room::list::Cursor>,
    )]
    pub struct Cursor(pub read::room::list::Cursor);

    /// Edge in the [`Room`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::room::list::Edge);

    /// Edge in the `Room` list.
    #[graphql_object(name = "RoomListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `RoomListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `RoomListEdge`.
        #[must_use]
        pub fn node(&self) -> Room {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Room` \
                          existence"
            )]
            unsafe {
                Room::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Room`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::room::list::Connection);

    /// Connection of the `Room` list.
    #[graphql_object(name = "RoomListConnection", context = Context)]
    impl Connection {
        /// Edges of this `RoomListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::room::list::PageInfo`].
        info: read::room::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `RoomListConnection` page.
    #[graphql_object(name = "RoomListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total `Room` count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::rooms::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
