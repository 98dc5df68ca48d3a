//! [`Query`] collection related to the multiple [`Room`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Room, Query};

use super::DatabaseQuery;

/// Queries a list of [`Room`]s.
pub type List =
    DatabaseQuery<By<read::room::list::Page, read::room::list::Selector>>;

/// Queries total count of [`Room`] list items.
pub type TotalCount = DatabaseQuery<By<read::room::list::TotalCount, ()>>;
