//! GraphQL [`Mutation`]s definitions.

use common::{Date, DateSpan, Money, Stay};
use juniper::graphql_object;
use service::{command, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Room` with the provided details.
    ///
    /// Omitted `capacity` and `rate` are inherited from the `RoomType`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_TYPE_NOT_EXISTS` - the `RoomType` with the provided ID does
    ///                            not exist;
    /// - `NON_POSITIVE_RATE` - the provided rate is zero or negative;
    /// - `ROOM_NUMBER_OCCUPIED` - another `Room` carries the provided number.
    #[tracing::instrument(
        skip_all,
        fields(
            allow_overbooking = ?allow_overbooking,
            allow_waitlist = ?allow_waitlist,
            capacity = ?capacity,
            floor = %floor,
            gql.name = "createRoom",
            kind_id = %kind_id,
            max_overbooking = ?max_overbooking,
            number = %number,
            otel.name = Self::SPAN_NAME,
            rate = ?rate.as_ref().map(ToString::to_string),
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_room(
        number: api::room::Number,
        kind_id: api::room_type::Id,
        floor: i32,
        capacity: Option<i32>,
        rate: Option<Money>,
        amenities: Option<Vec<api::room::Amenity>>,
        allow_waitlist: Option<bool>,
        allow_overbooking: Option<bool>,
        max_overbooking: Option<i32>,
        ctx: &Context,
    ) -> Result<api::Room, Error> {
        let floor = floor.try_into().map_err(AsError::into_error)?;
        let capacity = capacity
            .map(TryInto::try_into)
            .transpose()
            .map_err(AsError::into_error)?;
        let max_overbooking = max_overbooking
            .map(TryInto::try_into)
            .transpose()
            .map_err(AsError::into_error)?
            .unwrap_or_default();

        ctx.service()
            .execute(command::CreateRoom {
                number: number.into(),
                kind_id: kind_id.into(),
                floor,
                capacity,
                rate,
                amenities: amenities
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                allow_waitlist: allow_waitlist.unwrap_or_default(),
                allow_overbooking: allow_overbooking.unwrap_or_default(),
                max_overbooking,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the `Room` with the provided ID.
    ///
    /// Only the provided fields are touched.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_NOT_EXISTS` - the `Room` with the provided ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            allow_overbooking = ?allow_overbooking,
            allow_waitlist = ?allow_waitlist,
            capacity = ?capacity,
            floor = ?floor,
            gql.name = "updateRoom",
            id = %id,
            max_overbooking = ?max_overbooking,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn update_room(
        id: api::room::Id,
        floor: Option<i32>,
        capacity: Option<i32>,
        status: Option<api::room::Status>,
        amenities: Option<Vec<api::room::Amenity>>,
        allow_waitlist: Option<bool>,
        allow_overbooking: Option<bool>,
        max_overbooking: Option<i32>,
        ctx: &Context,
    ) -> Result<api::Room, Error> {
        let floor = floor
            .map(TryInto::try_into)
            .transpose()
            .map_err(AsError::into_error)?;
        let capacity = capacity
            .map(TryInto::try_into)
            .transpose()
            .map_err(AsError::into_error)?;
        let max_overbooking = max_overbooking
            .map(TryInto::try_into)
            .transpose()
            .map_err(AsError::into_error)?;

        ctx.service()
            .execute(command::UpdateRoom {
                id: id.into(),
                floor,
                capacity,
                status: status.map(Into::into),
                amenities: amenities
                    .map(|a| a.into_iter().map(Into::into).collect()),
                allow_waitlist,
                allow_overbooking,
                max_overbooking,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the nightly rate of the `Room` with the provided ID,
    /// appending a `RateChange` audit record in the same transaction.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NON_POSITIVE_RATE` - the provided rate is zero or negative;
    /// - `ROOM_NOT_EXISTS` - the `Room` with the provided ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateRoomRate",
            otel.name = Self::SPAN_NAME,
            performed_by = %performed_by,
            rate = %rate,
            reason = ?reason.as_ref().map(ToString::to_string),
            room_id = %room_id,
        ),
    )]
    pub async fn update_room_rate(
        room_id: api::room::Id,
        rate: Money,
        reason: Option<api::rate_change::Reason>,
        performed_by: api::staff::Id,
        ctx: &Context,
    ) -> Result<api::RateChange, Error> {
        ctx.service()
            .execute(command::UpdateRoomRate {
                room_id: room_id.into(),
                rate,
                reason: reason.map(Into::into),
                performed_by: performed_by.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Soft-deletes the `Room` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_NOT_EXISTS` - the `Room` with the provided ID does not exist
    ///                       or is deleted already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteRoom",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_room(
        id: api::room::Id,
        ctx: &Context,
    ) -> Result<api::Room, Error> {
        ctx.service()
            .execute(command::DeleteRoom { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `SpecialPrice` of the `Room` over the provided window.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_DATE_SPAN` - the window ends before it begins;
    /// - `NON_POSITIVE_PRICE` - the provided price is zero or negative;
    /// - `ROOM_NOT_EXISTS` - the `Room` with the provided ID does not exist;
    /// - `SPECIAL_PRICE_OVERLAP` - another `SpecialPrice` overlaps the
    ///                             provided window.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "addSpecialPrice",
            label = %label,
            created_by = %created_by,
            otel.name = Self::SPAN_NAME,
            price = %price,
            room_id = %room_id,
            since = ?since,
            until = ?until,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn add_special_price(
        room_id: api::room::Id,
        price: Money,
        since: Date,
        until: Date,
        label: api::special_price::Label,
        note: Option<api::special_price::Note>,
        created_by: api::staff::Id,
        ctx: &Context,
    ) -> Result<api::SpecialPrice, Error> {
        let span = DateSpan::new(since, until)
            .ok_or_else(|| api::SpanError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::AddSpecialPrice {
                room_id: room_id.into(),
                price,
                span,
                label: label.into(),
                note: note.map(Into::into),
                created_by: created_by.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `SpecialPrice` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SPECIAL_PRICE_NOT_EXISTS` - the `SpecialPrice` with the provided
    ///                                ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "removeSpecialPrice",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn remove_special_price(
        id: api::special_price::Id,
        ctx: &Context,
    ) -> Result<api::SpecialPrice, Error> {
        ctx.service()
            .execute(command::RemoveSpecialPrice { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Block` holding the `Room` over the provided window.
    ///
    /// An omitted `until` keeps the `Block` active until it's explicitly
    /// removed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BLOCK_INVALID_WINDOW` - the window ends before it begins;
    /// - `ROOM_NOT_EXISTS` - the `Room` with the provided ID does not exist;
    /// - `RESERVATION_CONFLICT` - an active `Reservation` intersects the
    ///                            provided window.
    #[tracing::instrument(
        skip_all,
        fields(
            created_by = %created_by,
            gql.name = "addBlock",
            otel.name = Self::SPAN_NAME,
            priority = ?priority,
            reason = %reason,
            room_id = %room_id,
            since = ?since,
            until = ?until,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn add_block(
        room_id: api::room::Id,
        reason: api::block::Reason,
        since: Date,
        until: Option<Date>,
        priority: Option<i32>,
        note: Option<api::block::Note>,
        created_by: api::staff::Id,
        ctx: &Context,
    ) -> Result<api::Block, Error> {
        let priority = priority
            .map(TryInto::try_into)
            .transpose()
            .map_err(AsError::into_error)?
            .unwrap_or_default();

        ctx.service()
            .execute(command::AddBlock {
                room_id: room_id.into(),
                reason: reason.into(),
                since,
                until,
                priority,
                note: note.map(Into::into),
                created_by: created_by.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `Block` with the provided ID, re-opening its `Room`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BLOCK_NOT_EXISTS` - the `Block` with the provided ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "removeBlock",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn remove_block(
        id: api::block::Id,
        ctx: &Context,
    ) -> Result<api::Block, Error> {
        ctx.service()
            .execute(command::RemoveBlock { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Places a confirmed `Reservation` of the `Room` for the stay, pricing
    /// it night by night.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_STAY` - the check-out day doesn't come after the check-in
    ///                    day;
    /// - `ROOM_NOT_EXISTS` - the `Room` with the provided ID does not exist;
    /// - `ROOM_CLOSED` - the `Room` doesn't host guests at the moment;
    /// - `ROOM_BLOCKED` - a `Block` holds the `Room` within the stay window;
    /// - `ROOM_BOOKED` - the `Room` is fully booked for the stay window.
    #[tracing::instrument(
        skip_all,
        fields(
            check_in = ?check_in,
            check_out = ?check_out,
            gql.name = "placeReservation",
            guest_id = %guest_id,
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
        ),
    )]
    pub async fn place_reservation(
        room_id: api::room::Id,
        guest_id: api::guest::Id,
        check_in: Date,
        check_out: Date,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        let stay = Stay::new(check_in, check_out)
            .ok_or_else(|| api::StayError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::PlaceReservation {
                room_id: room_id.into(),
                guest_id: guest_id.into(),
                stay,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Queues the guest for the currently unavailable `Room` and stay.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_STAY` - the check-out day doesn't come after the check-in
    ///                    day;
    /// - `ROOM_NOT_EXISTS` - the `Room` with the provided ID does not exist;
    /// - `WAITLIST_CLOSED` - the `Room` doesn't accept waitlisting.
    #[tracing::instrument(
        skip_all,
        fields(
            check_in = ?check_in,
            check_out = ?check_out,
            gql.name = "joinWaitlist",
            guest_id = %guest_id,
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
        ),
    )]
    pub async fn join_waitlist(
        room_id: api::room::Id,
        guest_id: api::guest::Id,
        check_in: Date,
        check_out: Date,
        ctx: &Context,
    ) -> Result<api::WaitlistEntry, Error> {
        let stay = Stay::new(check_in, check_out)
            .ok_or_else(|| api::StayError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::JoinWaitlist {
                room_id: room_id.into(),
                guest_id: guest_id.into(),
                stay,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Notifies the longest-waiting `WaitlistEntry`s whose window of the
    /// `Room` became free.
    ///
    /// Returns the notified entries.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_NOT_EXISTS` - the `Room` with the provided ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            date = ?date,
            gql.name = "processWaitlist",
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
        ),
    )]
    pub async fn process_waitlist(
        room_id: api::room::Id,
        date: Date,
        ctx: &Context,
    ) -> Result<Vec<api::WaitlistEntry>, Error> {
        ctx.service()
            .execute(command::ProcessWaitlist {
                room_id: room_id.into(),
                date,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|entries| entries.into_iter().map(Into::into).collect())
    }
}

impl AsError for command::create_room::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ROOM_TYPE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`RoomType` with the provided ID does not exist"]
                KindNotExists,

                #[code = "NON_POSITIVE_RATE"]
                #[status = BAD_REQUEST]
                #[message = "`Room` nightly rate must be positive"]
                NonPositiveRate,

                #[code = "ROOM_NUMBER_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "Another `Room` carries the provided number"]
                NumberOccupied,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::KindNotExists(_) => Error::KindNotExists.into(),
            Self::NonPositiveRate => Error::NonPositiveRate.into(),
            Self::NumberOccupied(_) => Error::NumberOccupied.into(),
        })
    }
}

impl AsError for command::update_room::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ROOM_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Room` with the provided ID does not exist"]
                RoomNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RoomNotExists(_) => Error::RoomNotExists.into(),
        })
    }
}

impl AsError for command::update_room_rate::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NON_POSITIVE_RATE"]
                #[status = BAD_REQUEST]
                #[message = "`Room` nightly rate must be positive"]
                NonPositiveRate,

                #[code = "ROOM_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Room` with the provided ID does not exist"]
                RoomNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NonPositiveRate => Error::NonPositiveRate.into(),
            Self::RoomNotExists(_) => Error::RoomNotExists.into(),
        })
    }
}

impl AsError for command::delete_room::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ROOM_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Room` with the provided ID does not exist or \
                             is deleted already"]
                RoomNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RoomNotExists(_) => Error::RoomNotExists.into(),
        })
    }
}

impl AsError for command::add_special_price::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NON_POSITIVE_PRICE"]
                #[status = BAD_REQUEST]
                #[message = "`SpecialPrice` must be positive"]
                NonPositivePrice,

                #[code = "ROOM_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Room` with the provided ID does not exist"]
                RoomNotExists,

                #[code = "SPECIAL_PRICE_OVERLAP"]
                #[status = CONFLICT]
                #[message = "Another `SpecialPrice` overlaps the provided \
                             window"]
                SpanOccupied,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NonPositivePrice => Error::NonPositivePrice.into(),
            Self::RoomNotExists(_) => Error::RoomNotExists.into(),
            Self::SpanOccupied(_) => Error::SpanOccupied.into(),
        })
    }
}

impl AsError for command::remove_special_price::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SPECIAL_PRICE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`SpecialPrice` with the provided ID does not \
                             exist"]
                NotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotExists(_) => Error::NotExists.into(),
        })
    }
}

impl AsError for command::add_block::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BLOCK_INVALID_WINDOW"]
                #[status = BAD_REQUEST]
                #[message = "`Block` window must not end before it begins"]
                InvalidWindow,

                #[code = "ROOM_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Room` with the provided ID does not exist"]
                RoomNotExists,

                #[code = "RESERVATION_CONFLICT"]
                #[status = CONFLICT]
                #[message = "Active `Reservation` intersects the provided \
                             window"]
                ReservationConflict,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidWindow => Error::InvalidWindow.into(),
            Self::RoomNotExists(_) => Error::RoomNotExists.into(),
            Self::ReservationConflict(_) => Error::ReservationConflict.into(),
        })
    }
}

impl AsError for command::remove_block::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BLOCK_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Block` with the provided ID does not exist"]
                NotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotExists(_) => Error::NotExists.into(),
        })
    }
}

impl AsError for command::place_reservation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ROOM_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Room` with the provided ID does not exist"]
                RoomNotExists,

                #[code = "ROOM_CLOSED"]
                #[status = CONFLICT]
                #[message = "`Room` with the provided ID does not host \
                             guests at the moment"]
                RoomClosed,

                #[code = "ROOM_BLOCKED"]
                #[status = CONFLICT]
                #[message = "`Block` holds the `Room` within the stay window"]
                Blocked,

                #[code = "ROOM_BOOKED"]
                #[status = CONFLICT]
                #[message = "`Room` is fully booked for the stay window"]
                Booked,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RoomNotExists(_) => Error::RoomNotExists.into(),
            Self::RoomClosed(_) => Error::RoomClosed.into(),
            Self::Blocked(_) => Error::Blocked.into(),
            Self::Booked(_) => Error::Booked.into(),
        })
    }
}

impl AsError for command::join_waitlist::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ROOM_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Room` with the provided ID does not exist"]
                RoomNotExists,

                #[code = "WAITLIST_CLOSED"]
                #[status = CONFLICT]
                #[message = "`Room` with the provided ID does not accept \
                             waitlisting"]
                WaitlistClosed,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RoomNotExists(_) => Error::RoomNotExists.into(),
            Self::WaitlistClosed(_) => Error::WaitlistClosed.into(),
        })
    }
}

impl AsError for command::process_waitlist::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ROOM_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Room` with the provided ID does not exist"]
                RoomNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RoomNotExists(_) => Error::RoomNotExists.into(),
        })
    }
}
