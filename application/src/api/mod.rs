//! GraphQL API definitions.

pub mod availability;
pub mod block;
pub mod guest;
mod mutation;
pub mod price;
mod query;
pub mod rate_change;
pub mod reservation;
pub mod room;
pub mod room_type;
pub mod scalar;
pub mod special_price;
pub mod staff;
pub mod waitlist;

use crate::{define_error, Context};

pub use self::{
    block::Block, mutation::Mutation, query::Query, rate_change::RateChange,
    reservation::Reservation, room::Room, room_type::RoomType,
    special_price::SpecialPrice, waitlist::WaitlistEntry,
};

/// GraphQL subscriptions root.
///
/// The API exposes no subscriptions.
pub type Subscription = juniper::EmptySubscription<Context>;

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}

define_error! {
    enum StayError {
        #[code = "INVALID_STAY"]
        #[status = BAD_REQUEST]
        #[message = "Check-out day must come after the check-in day"]
        Invalid,
    }
}

define_error! {
    enum SpanError {
        #[code = "INVALID_DATE_SPAN"]
        #[status = BAD_REQUEST]
        #[message = "Date span must not end before it begins"]
        Invalid,
    }
}
