//! Staff-related definitions.

use derive_more::{Display, From, Into};
use juniper::GraphQLScalar;
use service::domain;
use uuid::Uuid;

/// Unique identifier of a staff member, as known to the identity provider
/// in front of this service.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::staff::Id)]
#[into(domain::staff::Id)]
#[graphql(name = "StaffId", transparent)]
pub struct Id(Uuid);
