// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detached credential-exchange worker.
//!
//! The submission handler answers before the worker runs. Nothing the worker
//! does can reach the caller again: every failure ends the exchange with a
//! `warn!` and the expected confirmation simply never arrives. There is no
//! retry and no cap on concurrent workers.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::cache::AgentMetadataCache;
use crate::error::ControllerError;
use crate::exchange::record::build_record;
use crate::exchange::{Confirmation, CredentialSubmission, ExchangeCorrelation};
use crate::upstream::agent::AgentQuery;
use crate::upstream::notify::Notifier;

/// Spawn a worker for one exchange. Its errors are logged, never returned.
///
/// The handle is only useful to tests; the submission path drops it.
pub fn spawn_exchange<Q>(
    cache: Arc<AgentMetadataCache<Q>>,
    notifier: Arc<Notifier>,
    submission: CredentialSubmission,
    correlation: ExchangeCorrelation,
) -> JoinHandle<()>
where
    Q: AgentQuery + 'static,
{
    tokio::spawn(async move {
        match run_exchange(&cache, &notifier, submission, &correlation).await {
            Ok(()) => {
                tracing::info!(exchange_id = %correlation.exchange_id, "credential exchange stored");
            }
            Err(e) => {
                tracing::warn!(
                    exchange_id = %correlation.exchange_id,
                    thread_id = %correlation.thread_id,
                    code = e.as_str(),
                    err = %e,
                    "credential exchange failed"
                );
            }
        }
    })
}

/// Build the record, post it to the registry, then post the confirmation.
///
/// Stops at the first failing step; the confirmation is only sent after the
/// registry accepted the record.
pub async fn run_exchange<Q: AgentQuery>(
    cache: &AgentMetadataCache<Q>,
    notifier: &Notifier,
    submission: CredentialSubmission,
    correlation: &ExchangeCorrelation,
) -> Result<(), ControllerError> {
    let record = build_record(&submission, correlation, cache).await?;
    tracing::debug!(
        exchange_id = %correlation.exchange_id,
        schema_id = %record.schema_id,
        claims = record.values.len(),
        registry_url = notifier.registry_url(),
        "posting credential record to registry"
    );
    notifier.post_record(&record).await?;

    let confirmation = Confirmation::stored(correlation, submission);
    tracing::debug!(
        exchange_id = %correlation.exchange_id,
        confirmation_url = notifier.confirmation_url(),
        "posting confirmation"
    );
    notifier.post_confirmation(&confirmation).await?;
    Ok(())
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
