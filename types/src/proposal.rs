//! Proposal records as served by the proposal backend.
//!
//! Records are immutable once fetched: a refresh replaces the whole set. The
//! backend speaks snake_case while older fixtures use camelCase, so every
//! multi-word field accepts both spellings. Vote counts arrive as integers,
//! floats, decimal strings or `null` depending on the indexer, and are
//! normalised into [`VoteCount`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::{ProposalState, TypesError};

/// A non-negative vote quantity (raw token units).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoteCount(u128);

impl VoteCount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Whole tokens, assuming 18 decimals.
    pub fn whole_tokens(&self) -> u128 {
        self.0 / 1_000_000_000_000_000_000
    }
}

impl fmt::Display for VoteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VoteCount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(raw) = trimmed.parse::<u128>() {
            return Ok(Self(raw));
        }
        trimmed
            .parse::<f64>()
            .map_err(|_| TypesError::InvalidCount(s.to_string()))
            .and_then(Self::try_from_f64)
    }
}

impl VoteCount {
    fn try_from_f64(value: f64) -> Result<Self, TypesError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value.round() as u128))
        } else {
            Err(TypesError::InvalidCount(value.to_string()))
        }
    }
}

// Serialized as a decimal string so values above 2^64 survive persistence.
impl Serialize for VoteCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VoteCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Float(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(v) => Ok(Self(v as u128)),
            Raw::Float(v) => Self::try_from_f64(v).map_err(serde::de::Error::custom),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// `null` and missing fields both mean zero.
fn count_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<VoteCount, D::Error> {
    Ok(Option::<VoteCount>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numbers or strings, kept as text.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Int(v) => v.to_string(),
        Raw::Float(v) => v.to_string(),
        Raw::Text(s) => s,
    }))
}

/// Delegate-vote totals for a proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    #[serde(
        rename = "for_delegate_votes",
        alias = "forDelegateVotes",
        default,
        deserialize_with = "count_or_zero"
    )]
    pub for_votes: VoteCount,
    #[serde(
        rename = "against_delegate_votes",
        alias = "againstDelegateVotes",
        default,
        deserialize_with = "count_or_zero"
    )]
    pub against_votes: VoteCount,
    #[serde(
        rename = "abstain_delegate_votes",
        alias = "abstainDelegateVotes",
        default,
        deserialize_with = "count_or_zero"
    )]
    pub abstain_votes: VoteCount,
    #[serde(
        rename = "total_delegate_votes",
        alias = "totalDelegateVotes",
        default,
        deserialize_with = "count_or_zero"
    )]
    pub total_votes: VoteCount,
}

impl VoteTally {
    /// Share of for-votes among for+against, in basis points.
    pub fn approval_bps(&self) -> Option<u32> {
        let decided = self.for_votes.raw() + self.against_votes.raw();
        if decided == 0 {
            return None;
        }
        Some((self.for_votes.raw() * 10_000 / decided) as u32)
    }
}

/// The account that created a proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposer {
    pub id: String,
    #[serde(alias = "delegatedVotesRaw", default, deserialize_with = "count_or_zero")]
    pub delegated_votes_raw: VoteCount,
    #[serde(alias = "numberVotes", default)]
    pub number_votes: Option<u64>,
    #[serde(alias = "tokenHoldersRepresentedAmount", default)]
    pub token_holders_represented_amount: Option<u64>,
}

/// A single delegate's vote on a proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub id: String,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub weight: VoteCount,
    #[serde(default)]
    pub choice: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub description: String,
    pub state: ProposalState,
    pub proposer: Proposer,
    #[serde(alias = "creationTime", default, deserialize_with = "lenient_text")]
    pub creation_time: Option<String>,
    #[serde(alias = "quorumVotes", default, deserialize_with = "count_or_zero")]
    pub quorum_votes: VoteCount,
    #[serde(default)]
    pub votes: Vec<VoteRecord>,
    #[serde(flatten)]
    pub tally: VoteTally,
}

impl Proposal {
    /// Title derived from the description: a markdown heading, or the first
    /// line truncated to 60 characters.
    pub fn title(&self) -> String {
        let first_line = self.description.lines().next().unwrap_or("").trim();
        if first_line.starts_with('#') {
            return first_line.trim_start_matches('#').trim().to_string();
        }
        if first_line.chars().count() > 60 {
            let head: String = first_line.chars().take(60).collect();
            format!("{head}...")
        } else {
            first_line.to_string()
        }
    }

    /// Coarse topic bucket from description keywords.
    pub fn category(&self) -> &'static str {
        let desc = self.description.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| desc.contains(w));
        if has(&["defi", "uniswap", "aave", "compound"]) {
            "DeFi"
        } else if has(&["nft", "opensea", "marketplace"]) {
            "NFT"
        } else if has(&["dao", "governance", "voting"]) {
            "DAO"
        } else if has(&["gaming", "game", "play"]) {
            "Gaming"
        } else if has(&["infrastructure", "oracle", "chainlink"]) {
            "Infrastructure"
        } else {
            "DeFi"
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.accepts_votes()
    }
}
