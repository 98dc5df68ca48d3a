//! Guest-related definitions.

use derive_more::{Display, From, Into};
use juniper::GraphQLScalar;
use service::domain;
use uuid::Uuid;

/// Unique identifier of a guest, as known to the identity provider in front
/// of this service.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::guest::Id)]
#[into(domain::guest::Id)]
#[graphql(name = "GuestId", transparent)]
pub struct Id(Uuid);
