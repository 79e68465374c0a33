//! Background refresh of remotely sourced policy domains.
//!
//! Each remote domain gets its own task and interval. A failed fetch or an
//! unparseable payload is logged and the previous snapshot is kept; the next
//! tick is the retry. Domains never wait on each other.

use discovery_client::FetchPolicy;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use url::Url;

use super::payload;
use crate::policy::PolicyStore;

/// A mutable slice of the policy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyDomain {
    /// The maintenance flag
    Maintenance,
    /// The ban list
    Bans,
    /// Token -> group assignments
    GroupDefinitions,
}

impl PolicyDomain {
    /// Key naming this domain in the `options` section
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Maintenance => "maintenance",
            Self::Bans => "bans",
            Self::GroupDefinitions => "groupdefs",
        }
    }
}

impl fmt::Display for PolicyDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// What to poll, where from, and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTask {
    /// Domain being refreshed
    pub domain: PolicyDomain,
    /// Source URL
    pub url: Url,
    /// Time between fetches
    pub interval: Duration,
}

/// Fetches remote policy and swaps it into the store.
#[derive(Clone)]
pub struct Refresher {
    store: PolicyStore,
    fetcher: Arc<dyn FetchPolicy>,
}

impl Refresher {
    /// Create a refresher writing into `store`
    pub fn new(store: PolicyStore, fetcher: Arc<dyn FetchPolicy>) -> Self {
        Self { store, fetcher }
    }

    /// Run one fetch-parse-replace cycle for `domain`.
    ///
    /// On error nothing in the store changes.
    pub async fn refresh(&self, domain: PolicyDomain, url: &Url) -> crate::Result<()> {
        let doc = self.fetcher.fetch(url).await?;

        match domain {
            PolicyDomain::Maintenance => {
                let active = payload::parse_maintenance(&doc)?;
                self.store.replace_maintenance(active);
                info!(%domain, active, "updated maintenance status");
            }
            PolicyDomain::Bans => {
                let bans = payload::parse_bans(&doc)?;
                let entries = bans.len();
                self.store.replace_bans(bans);
                info!(%domain, entries, "updated ban list");
            }
            PolicyDomain::GroupDefinitions => {
                let definitions = payload::parse_group_definitions(&doc)?;
                let entries = definitions.len();
                self.store.replace_group_definitions(definitions);
                info!(%domain, entries, "updated group definitions");
            }
        }

        Ok(())
    }

    /// Start the polling loop for one task.
    ///
    /// The first fetch happens immediately. The loop runs until the task is
    /// aborted or the runtime shuts down.
    pub fn spawn(&self, task: RefreshTask) -> JoinHandle<()> {
        let refresher = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(task.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = refresher.refresh(task.domain, &task.url).await {
                    let stage = if e.is_fetch_error() { "fetch" } else { "parse" };
                    warn!(
                        domain = %task.domain,
                        url = %task.url,
                        stage,
                        status = ?e.status_code(),
                        error = %e,
                        "policy refresh failed, keeping previous snapshot"
                    );
                }
            }
        })
    }

    /// Start one independent polling loop per task.
    pub fn spawn_all(&self, tasks: impl IntoIterator<Item = RefreshTask>) -> Vec<JoinHandle<()>> {
        tasks
            .into_iter()
            .map(|task| {
                info!(
                    domain = %task.domain,
                    url = %task.url,
                    interval_secs = task.interval.as_secs(),
                    "scheduling policy refresh"
                );
                self.spawn(task)
            })
            .collect()
    }
}
