//! Background [`Task`]s definitions.

mod background;
pub mod expire_waitlist_entries;

pub use common::Handler as Task;

pub use self::{
    background::Background, expire_waitlist_entries::ExpireWaitlistEntries,
};
