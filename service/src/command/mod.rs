//! [`Command`] definition.

pub mod add_block;
pub mod add_special_price;
pub mod create_room;
pub mod delete_room;
pub mod join_waitlist;
pub mod place_reservation;
pub mod process_waitlist;
pub mod remove_block;
pub mod remove_special_price;
pub mod update_room;
pub mod update_room_rate;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_block::AddBlock, add_special_price::AddSpecialPrice,
    create_room::CreateRoom, delete_room::DeleteRoom,
    join_waitlist::JoinWaitlist, place_reservation::PlaceReservation,
    process_waitlist::ProcessWaitlist, remove_block::RemoveBlock,
    remove_special_price::RemoveSpecialPrice, update_room::UpdateRoom,
    update_room_rate::UpdateRoomRate,
};
