//! Tracker configuration.
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    native::DeferredMoveRelay,
    reposition::{
        BatchedRepositioner, RepositionMode, Repositioner, SequentialRepositioner,
        TransactionFactory,
    },
};

/// Configuration shared by every tracker of a host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerCfg {
    /// How follower windows are moved during a group move.
    pub reposition: RepositionMode,
}

impl TrackerCfg {
    /// Build the repositioner this configuration selects.
    ///
    /// Batched mode needs a transaction factory; without one it degrades to
    /// sequential moves.
    pub fn repositioner(
        &self,
        transactions: Option<Arc<dyn TransactionFactory>>,
        relay: Arc<dyn DeferredMoveRelay>,
    ) -> Arc<dyn Repositioner> {
        match (self.reposition, transactions) {
            (RepositionMode::Batched, Some(transactions)) => {
                Arc::new(BatchedRepositioner::new(transactions, relay))
            }
            (RepositionMode::Batched, None) => {
                warn!("batched repositioning requested without a transaction factory");
                Arc::new(SequentialRepositioner)
            }
            (RepositionMode::Sequential, _) => Arc::new(SequentialRepositioner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryTransactions, RecordingRelay};

    #[test]
    fn selects_repositioner() {
        let relay = Arc::new(RecordingRelay::new());
        let batched = TrackerCfg {
            reposition: RepositionMode::Batched,
        };
        let tx: Arc<dyn TransactionFactory> = Arc::new(MemoryTransactions::new());
        assert_eq!(
            batched.repositioner(Some(tx), relay.clone()).mode(),
            RepositionMode::Batched
        );
        assert_eq!(
            batched.repositioner(None, relay.clone()).mode(),
            RepositionMode::Sequential
        );
        let sequential = TrackerCfg {
            reposition: RepositionMode::Sequential,
        };
        assert_eq!(
            sequential.repositioner(None, relay).mode(),
            RepositionMode::Sequential
        );
    }
}
