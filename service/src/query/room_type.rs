//! [`Query`] collection related to [`RoomType`]s.

use common::operations::By;

use crate::domain::{room_type, RoomType};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a single [`RoomType`] by its ID.
pub type ById = DatabaseQuery<By<Option<RoomType>, room_type::Id>>;
