//! Domain definitions.

pub mod block;
pub mod guest;
pub mod rate_change;
pub mod reservation;
pub mod room;
pub mod room_type;
pub mod special_price;
pub mod staff;
pub mod tariff;
pub mod waitlist;

pub use self::{
    block::Block, rate_change::RateChange, reservation::Reservation,
    room::Room, room_type::RoomType, special_price::SpecialPrice,
    tariff::Tariff, waitlist::WaitlistEntry,
};
