//! Read entities definitions.

pub mod availability;
pub mod calendar;
pub mod price;
pub mod room;
