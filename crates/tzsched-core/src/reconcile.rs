//! Reconciliation of a compiled schedule set against published months.
//!
//! Every regime of a new set is republished; months that were published
//! before but are absent from the new set are retracted. A
//! [`ScheduleSession`] remembers which months the server holds and only
//! moves that snapshot forward after an entire batch has succeeded.

use std::collections::BTreeSet;

use async_trait::async_trait;
use futures_util::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{Result, ScheduleError};
use crate::models::{ScheduleRegime, ScheduleSet};

/// Requests needed to bring the server in line with a new schedule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_publish: ScheduleSet,
    pub to_retract: BTreeSet<String>,
}

/// Diff a new set against the months known to be published.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use tzsched_core::models::ScheduleSet;
/// use tzsched_core::reconcile::reconcile;
///
/// let known: BTreeSet<String> = ["01".to_string()].into();
/// let plan = reconcile(&ScheduleSet::default(), &known);
///
/// assert!(plan.to_retract.contains("01"));
/// ```
pub fn reconcile(new_set: &ScheduleSet, known_months: &BTreeSet<String>) -> ReconcilePlan {
    let new_months = new_set.months();
    let to_retract: BTreeSet<String> = known_months.difference(&new_months).cloned().collect();

    debug!(
        publish = new_set.len(),
        retract = to_retract.len(),
        "reconciled schedule set"
    );

    ReconcilePlan {
        to_publish: new_set.clone(),
        to_retract,
    }
}

/// Error payload returned by a transport, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Delivery of regimes and retractions to the schedule API.
///
/// Implementations own any retry policy; the session treats every returned
/// error as final for the batch.
#[async_trait]
pub trait ScheduleTransport: Send + Sync {
    async fn publish(&self, regime: &ScheduleRegime) -> std::result::Result<(), TransportError>;
    async fn retract(&self, month: &str) -> std::result::Result<(), TransportError>;
}

/// Outcome of a fully successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub published: usize,
    pub retracted: BTreeSet<String>,
}

/// One schedule-editing session and the months it believes are published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSession {
    known_months: BTreeSet<String>,
}

impl ScheduleSession {
    pub fn new(known_months: BTreeSet<String>) -> Self {
        Self { known_months }
    }

    /// Seed the snapshot from the regimes the server currently holds.
    pub fn from_published<'a, I>(regimes: I) -> Self
    where
        I: IntoIterator<Item = &'a ScheduleRegime>,
    {
        Self {
            known_months: regimes.into_iter().map(ScheduleRegime::month_key).collect(),
        }
    }

    pub fn known_months(&self) -> &BTreeSet<String> {
        &self.known_months
    }

    /// Plan the batch for `new_set` without sending anything.
    pub fn plan(&self, new_set: &ScheduleSet) -> ReconcilePlan {
        reconcile(new_set, &self.known_months)
    }

    /// Publish `new_set` and retract stale months as one batch.
    ///
    /// All requests are issued concurrently and awaited together. The known
    /// months are replaced only when every request succeeded; otherwise the
    /// snapshot is untouched and the whole batch must be reissued.
    pub async fn publish<T>(&mut self, new_set: &ScheduleSet, transport: &T) -> Result<PublishReport>
    where
        T: ScheduleTransport + ?Sized,
    {
        let plan = self.plan(new_set);

        let publishes = plan.to_publish.iter().map(|regime| async move {
            transport
                .publish(regime)
                .await
                .map_err(|e| failure(format!("{} {}", regime.month_key(), regime.kind), e))
        });
        let retractions = plan.to_retract.iter().map(|month| async move {
            transport
                .retract(month)
                .await
                .map_err(|e| failure(format!("{} retract", month), e))
        });

        let (published, retracted) = futures_util::join!(join_all(publishes), join_all(retractions));

        let failures: Vec<ScheduleError> = published
            .into_iter()
            .chain(retracted)
            .filter_map(|outcome| outcome.err())
            .collect();

        if !failures.is_empty() {
            for failure in &failures {
                warn!(error = %failure, "schedule batch member failed");
            }
            return Err(ScheduleError::ReconciliationAborted { failures });
        }

        self.known_months = new_set.months();
        debug!(known_months = ?self.known_months, "committed published months");

        Ok(PublishReport {
            published: plan.to_publish.len(),
            retracted: plan.to_retract,
        })
    }
}

fn failure(target: String, error: TransportError) -> ScheduleError {
    ScheduleError::PublishFailure {
        target,
        message: error.0,
    }
}
