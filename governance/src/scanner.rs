//! Discovery of which ledger ids exist, by probing a range in batches.

use std::ops::RangeInclusive;
use std::sync::Arc;

use agora_types::ProposalState;
use futures_util::future::join_all;

use crate::{LedgerError, LedgerGateway};

/// Outcome of a range scan, in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub found: Vec<(u64, ProposalState)>,
    pub missing: Vec<u64>,
    /// Ids whose query failed for reasons other than non-existence.
    pub errors: Vec<(u64, String)>,
}

impl ScanReport {
    pub fn active_ids(&self) -> Vec<u64> {
        self.found
            .iter()
            .filter(|(_, state)| state.accepts_votes())
            .map(|(id, _)| *id)
            .collect()
    }
}

pub struct ProposalScanner {
    ledger: Arc<dyn LedgerGateway>,
}

impl ProposalScanner {
    pub fn new(ledger: Arc<dyn LedgerGateway>) -> Self {
        Self { ledger }
    }

    /// Query the state of every ledger id in `ids`, `batch_size` at a time.
    ///
    /// Batches are drawn from the range lazily and run sequentially; queries
    /// within a batch run concurrently.
    pub async fn scan(&self, ids: RangeInclusive<u64>, batch_size: usize) -> ScanReport {
        let batch_size = batch_size.max(1);
        let mut ids = ids;
        let mut report = ScanReport::default();

        loop {
            let batch: Vec<u64> = ids.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }
            let results = join_all(batch.into_iter().map(|id| async move {
                (id, self.ledger.state(&id.to_string()).await)
            }))
            .await;

            for (id, result) in results {
                match result {
                    Ok(state) => report.found.push((id, state)),
                    Err(LedgerError::UnknownProposal) => report.missing.push(id),
                    Err(e) => report.errors.push((id, e.to_string())),
                }
            }
        }

        tracing::info!(
            found = report.found.len(),
            missing = report.missing.len(),
            errors = report.errors.len(),
            "proposal scan complete"
        );
        report
    }
}
