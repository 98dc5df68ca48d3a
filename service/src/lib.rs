//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::future::Future;

use common::operations::{By, Insert, Invalidate, Select, Start};
use derive_more::{Debug, Display, Error};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Tariff,
    infra::{cache, Cache},
};

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// [`Tariff`] driving every multiplier-based price calculation.
    pub tariff: Tariff,

    /// TTLs of [`Cache`] entries, per key class.
    pub cache: cache::Config,

    /// [`task::ExpireWaitlistEntries`] configuration.
    pub expire_waitlist_entries: task::expire_waitlist_entries::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Ch> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Cache`] of this [`Service`].
    cache: Ch,
}

impl<Db, Ch> Service<Db, Ch> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        database: Db,
        cache: Ch,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::ExpireWaitlistEntries<Self>,
                        task::expire_waitlist_entries::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            cache,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().expire_waitlist_entries)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Cache`] of this [`Service`].
    #[must_use]
    pub fn cache(&self) -> &Ch {
        &self.cache
    }

    /// Returns the value cached under the provided [`cache::Key`], producing
    /// and caching it anew on a miss.
    ///
    /// [`Cache`] failures never fail the request: the value is produced as if
    /// the entry was missing, and the failure is logged.
    pub(crate) async fn cached<T, E, F, Fut>(
        &self,
        key: cache::Key,
        produce: F,
    ) -> Result<T, E>
    where
        T: Clone + Into<cache::Value> + TryFrom<cache::Value>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        Ch: Cache<
                Select<cache::Key>,
                Ok = Option<cache::Value>,
                Err = Traced<cache::Error>,
            > + Cache<
                Insert<(cache::Key, cache::Value, cache::Ttl)>,
                Ok = (),
                Err = Traced<cache::Error>,
            >,
    {
        match self.cache.execute(Select(key.clone())).await {
            Ok(Some(value)) => {
                if let Ok(value) = T::try_from(value) {
                    return Ok(value);
                }
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("`Cache` lookup failed, recomputing: {e}");
            }
        }

        let value = produce().await?;

        let ttl = self.config.cache.ttl_of(&key);
        let entry = (key, value.clone().into(), ttl);
        if let Err(e) = self.cache.execute(Insert(entry)).await {
            log::warn!("`Cache` population failed: {e}");
        }
        Ok(value)
    }

    /// Drops every [`Cache`] entry the provided [`cache::Scope`] covers.
    ///
    /// [`Cache`] failures are logged and swallowed: entry TTLs bound the
    /// staleness of whatever survives.
    pub(crate) async fn invalidate(&self, scope: cache::Scope)
    where
        Ch: Cache<
            Invalidate<cache::Scope>,
            Ok = (),
            Err = Traced<cache::Error>,
        >,
    {
        if let Err(e) = self.cache.execute(Invalidate(scope)).await {
            log::warn!("`Cache` invalidation failed: {e}");
        }
    }
}

/// Shortcut for the error of starting a [`Task`].
type TaskStartError<Svc, T, Args> = <Svc as Task<Start<By<T, Args>>>>::Err;

/// Error of starting a [`Service`].
#[derive(Debug, Display, Error)]
pub enum StartupError<Svc>
where
    Svc: Task<
        Start<
            By<
                task::ExpireWaitlistEntries<Svc>,
                task::expire_waitlist_entries::Config,
            >,
        >,
    >,
{
    /// [`task::ExpireWaitlistEntries`] failed to start.
    ExpireWaitlistEntriesTask(
        TaskStartError<
            Svc,
            task::ExpireWaitlistEntries<Svc>,
            task::expire_waitlist_entries::Config,
        >,
    ),
}
