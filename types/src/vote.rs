//! Vote choices.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The support value submitted with a vote (Governor Bravo encoding).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteSupport {
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl VoteSupport {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl FromStr for VoteSupport {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "for" | "yes" | "1" => Ok(Self::For),
            "against" | "no" | "0" => Ok(Self::Against),
            "abstain" | "2" => Ok(Self::Abstain),
            _ => Err(TypesError::UnknownSupport(s.to_string())),
        }
    }
}

impl fmt::Display for VoteSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Against => f.write_str("against"),
            Self::For => f.write_str("for"),
            Self::Abstain => f.write_str("abstain"),
        }
    }
}
