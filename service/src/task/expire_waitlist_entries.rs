//! [`ExpireWaitlistEntries`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Perform, Start, Update},
    Date,
};
use smart_default::SmartDefault;
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::waitlist,
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::WaitlistEntry;

use super::Task;

/// Configuration for [`ExpireWaitlistEntries`] [`Task`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Interval between expiry sweeps.
    #[default(time::Duration::from_secs(60 * 60))]
    pub interval: time::Duration,

    /// Maximum number of [`WaitlistEntry`]s expired per sweep.
    #[default(500)]
    pub chunk: i64,
}

/// [`Task`] expiring waiting [`WaitlistEntry`]s whose check-in day has
/// passed without the guest being notified.
#[derive(Clone, Copy, Debug)]
pub struct ExpireWaitlistEntries<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Ch> Task<Start<By<ExpireWaitlistEntries<Self>, Config>>>
    for Service<Db, Ch>
where
    ExpireWaitlistEntries<Service<Db, Ch>>:
        Task<Perform<()>, Ok = Vec<waitlist::Id>, Err: Error>
            + Send
            + Sync
            + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ExpireWaitlistEntries<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ExpireWaitlistEntries {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task
                .execute(Perform(()))
                .await
                .map(|expired| {
                    if !expired.is_empty() {
                        log::info!(
                            "`task::ExpireWaitlistEntries` expired \
                             {} entries",
                            expired.len(),
                        );
                    }
                })
                .map_err(|e| {
                    log::error!("`task::ExpireWaitlistEntries` failed: {e}");
                });
        }
    }
}

impl<Db, Ch> Task<Perform<()>> for ExpireWaitlistEntries<Service<Db, Ch>>
where
    Db: Database<
        Update<By<Vec<waitlist::Id>, (Date, i64)>>,
        Ok = Vec<waitlist::Id>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<waitlist::Id>;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        self.service
            .database()
            .execute(Update(By::new((Date::today(), self.config.chunk))))
            .await
            .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`ExpireWaitlistEntries`] execution.
pub type ExecutionError = Traced<database::Error>;
