//! GraphQL [`Query`]s definitions.

use common::{Date, DateSpan, Stay};
use itertools::Itertools as _;
use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Room` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_NOT_EXISTS` - the `Room` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "room",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn room(
        id: api::room::Id,
        ctx: &Context,
    ) -> Result<api::room::list::Edge, Error> {
        Self::rooms(
            None,
            Some(id.into()),
            None,
            Some(id.into()),
            None,
            None,
            ctx,
        )
        .await?
        .edges()
        .into_iter()
        .exactly_one()
        .map_err(|_| RoomError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Fetches the page of `Room`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            first = ?first,
            gql.name = "rooms",
            kind = ?kind.as_ref().map(ToString::to_string),
            last = ?last,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn rooms(
        first: Option<i32>,
        after: Option<api::room::list::Cursor>,
        last: Option<i32>,
        before: Option<api::room::list::Cursor>,
        kind: Option<api::room_type::Id>,
        status: Option<api::room::Status>,
        ctx: &Context,
    ) -> Result<api::room::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        ctx.service()
            .execute(query::rooms::List::by(read::room::list::Selector {
                arguments: read::room::list::Arguments::new(
                    first,
                    after.map(Into::into),
                    last,
                    before.map(Into::into),
                    DEFAULT_PAGE_SIZE,
                )
                .ok_or_else(|| api::PaginationError::Ambiguous.into())
                .map_err(ctx.error())?,
                filter: read::room::list::Filter {
                    kind_id: kind.map(Into::into),
                    status: status.map(Into::into),
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Room` with the specified number, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "roomByNumber",
            number = %number,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn room_by_number(
        number: api::room::Number,
        ctx: &Context,
    ) -> Result<Option<api::Room>, Error> {
        ctx.service()
            .execute(query::room::ByNumber::by(number.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|room| room.map(Into::into))
    }

    /// Returns the `RoomType` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_TYPE_NOT_EXISTS` - the `RoomType` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "roomType",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn room_type(
        id: api::room_type::Id,
        ctx: &Context,
    ) -> Result<api::RoomType, Error> {
        ctx.service()
            .execute(query::room_type::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| RoomTypeError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Checks whether the `Room` with the specified ID may be booked for the
    /// stay.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_STAY` - the check-out day doesn't come after the check-in
    ///                    day.
    #[tracing::instrument(
        skip_all,
        fields(
            check_in = ?check_in,
            check_out = ?check_out,
            gql.name = "roomAvailability",
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
        ),
    )]
    pub async fn room_availability(
        room_id: api::room::Id,
        check_in: Date,
        check_out: Date,
        ctx: &Context,
    ) -> Result<api::availability::Verdict, Error> {
        let stay = Stay::new(check_in, check_out)
            .ok_or_else(|| api::StayError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::availability::OfRoom {
                room_id: room_id.into(),
                stay,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Searches for `Room`s open for the stay, optionally narrowed to a
    /// single `RoomType`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_STAY` - the check-out day doesn't come after the check-in
    ///                    day.
    #[tracing::instrument(
        skip_all,
        fields(
            check_in = ?check_in,
            check_out = ?check_out,
            gql.name = "searchAvailability",
            kind = ?kind.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn search_availability(
        kind: Option<api::room_type::Id>,
        check_in: Date,
        check_out: Date,
        ctx: &Context,
    ) -> Result<Vec<api::availability::OpenRoom>, Error> {
        let stay = Stay::new(check_in, check_out)
            .ok_or_else(|| api::StayError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::availability::Search {
                kind_id: kind.map(Into::into),
                stay,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rooms| rooms.into_iter().map(Into::into).collect())
    }

    /// Prices the stay of the `Room` with the specified ID, night by night.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_STAY` - the check-out day doesn't come after the check-in
    ///                    day;
    /// - `ROOM_NOT_EXISTS` - the `Room` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            check_in = ?check_in,
            check_out = ?check_out,
            gql.name = "priceQuote",
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
        ),
    )]
    pub async fn price_quote(
        room_id: api::room::Id,
        check_in: Date,
        check_out: Date,
        ctx: &Context,
    ) -> Result<api::price::Quote, Error> {
        let stay = Stay::new(check_in, check_out)
            .ok_or_else(|| api::StayError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::price::ForStay {
                room_id: room_id.into(),
                stay,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Builds the day-by-day availability calendar of the `Room` with the
    /// specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_DATE_SPAN` - the span ends before it begins;
    /// - `ROOM_NOT_EXISTS` - the `Room` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "roomCalendar",
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
            since = ?since,
            until = ?until,
        ),
    )]
    pub async fn room_calendar(
        room_id: api::room::Id,
        since: Date,
        until: Date,
        ctx: &Context,
    ) -> Result<Vec<api::availability::Day>, Error> {
        let span = DateSpan::new(since, until)
            .ok_or_else(|| api::SpanError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::availability::Calendar {
                room_id: room_id.into(),
                span,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|days| days.into_iter().map(Into::into).collect())
    }
}

define_error! {
    enum RoomError {
        #[code = "ROOM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Room` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum RoomTypeError {
        #[code = "ROOM_TYPE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`RoomType` with the specified ID does not exist"]
        NotExists,
    }
}

impl AsError for query::price::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use query::price::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::RoomNotExists(_) => Some(RoomError::NotExists.into()),
        }
    }
}

impl AsError for query::availability::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use query::availability::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::RoomNotExists(_) => Some(RoomError::NotExists.into()),
        }
    }
}
