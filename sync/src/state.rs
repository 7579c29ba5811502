use std::time::Duration;

use agora_types::{Proposal, Timestamp};

use crate::Tier;

/// Everything a view needs to render the proposal list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheState {
    pub all_proposals: Vec<Proposal>,
    pub active_proposal: Option<Proposal>,
    pub is_loading: bool,
    /// Non-fatal: set when a refresh failed and older live data is being kept.
    pub error: Option<String>,
    pub last_fetched: Option<Timestamp>,
    pub is_initialized: bool,
    /// Which tier supplied the current data.
    pub origin: Option<Tier>,
}

impl CacheState {
    pub fn is_fresh(&self, window: Duration, now: Timestamp) -> bool {
        self.last_fetched.is_some_and(|t| t.is_within(window, now))
    }

    pub fn find(&self, id: &str) -> Option<&Proposal> {
        self.all_proposals.iter().find(|p| p.id == id)
    }
}
