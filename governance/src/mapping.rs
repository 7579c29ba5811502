//! Translation from dashboard proposal ids to ledger proposal ids.
//!
//! The dashboard backend and the governance contract number proposals
//! independently. Resolution order for an internal id:
//!
//! 1. an explicit mapping wins;
//! 2. an id on the known-valid list passes through unchanged;
//! 3. anything else resolves to the fallback id, so every input maps to
//!    something the ledger can answer for.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

/// Ledger id used when nothing better is known.
pub const DEFAULT_FALLBACK_ID: &str = "1";

/// Ledger ids known to exist on the default governance contract.
pub const DEFAULT_KNOWN_IDS: [&str; 13] = [
    "1", "2", "3", "4", "5", "10", "20", "30", "40", "50", "60", "70", "80",
];

/// Internal → ledger pairs for proposals whose numbering diverges.
pub const DEFAULT_MAPPINGS: [(&str, &str); 2] = [("88", "88"), ("91", "88")];

/// Internally synchronized id mapper, shared by reference across tasks.
#[derive(Debug)]
pub struct IdentifierMapper {
    mappings: RwLock<HashMap<String, String>>,
    known_valid: BTreeSet<String>,
    fallback: String,
}

impl IdentifierMapper {
    /// Create a mapper with no explicit mappings.
    ///
    /// An empty `fallback` is replaced by [`DEFAULT_FALLBACK_ID`].
    pub fn new<I, S>(known_valid: I, fallback: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fallback = fallback.into();
        if fallback.trim().is_empty() {
            fallback = DEFAULT_FALLBACK_ID.to_string();
        }
        Self {
            mappings: RwLock::new(HashMap::new()),
            known_valid: known_valid.into_iter().map(Into::into).collect(),
            fallback,
        }
    }

    /// Add every pair in `pairs` as an explicit mapping.
    pub fn with_mappings<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (internal, external) in pairs {
            self.add_mapping(internal, external);
        }
        self
    }

    /// Resolve `internal_id` to the ledger id to query. Never empty.
    pub fn map(&self, internal_id: &str) -> String {
        if let Some(external) = self.read().get(internal_id) {
            return external.clone();
        }
        if self.known_valid.contains(internal_id) {
            return internal_id.to_string();
        }
        tracing::debug!(
            internal_id,
            fallback = %self.fallback,
            "no ledger mapping for proposal, using fallback"
        );
        self.fallback.clone()
    }

    /// Register (or replace) an explicit mapping. A blank target is ignored.
    pub fn add_mapping(&self, internal_id: impl Into<String>, external_id: impl Into<String>) {
        let internal_id = internal_id.into();
        let external_id = external_id.into();
        if external_id.trim().is_empty() {
            tracing::warn!(%internal_id, "ignoring mapping to an empty ledger id");
            return;
        }
        self.mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(internal_id, external_id);
    }

    /// Whether `internal_id` has an explicit mapping.
    pub fn is_mapped(&self, internal_id: &str) -> bool {
        self.read().contains_key(internal_id)
    }

    /// Every ledger id this mapper can produce other than the fallback path,
    /// in ascending numeric order where the ids are numeric.
    pub fn known_ids(&self) -> Vec<String> {
        let mut ids: BTreeSet<String> = self.known_valid.clone();
        ids.extend(self.read().values().cloned());
        let mut ids: Vec<String> = ids.into_iter().collect();
        ids.sort_by(|a, b| match (a.parse::<u128>(), b.parse::<u128>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        });
        ids
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, String>> {
        self.mappings.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for IdentifierMapper {
    fn default() -> Self {
        Self::new(DEFAULT_KNOWN_IDS, DEFAULT_FALLBACK_ID).with_mappings(DEFAULT_MAPPINGS)
    }
}
