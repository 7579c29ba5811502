//! Voter address type (20-byte EVM account, `0x`-prefixed hex).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The account a signing session votes from.
///
/// Stored lower-cased so equality is independent of checksum casing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VoterAddress(String);

impl VoterAddress {
    pub const PREFIX: &'static str = "0x";

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234…abcd` form for terminal output.
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl FromStr for VoterAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix(Self::PREFIX)
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| TypesError::InvalidAddress(s.to_string()))?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypesError::InvalidAddress(s.to_string()));
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }
}

impl TryFrom<String> for VoterAddress {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VoterAddress> for String {
    fn from(address: VoterAddress) -> Self {
        address.0
    }
}

impl fmt::Display for VoterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_checksum_case() {
        let a: VoterAddress = "0x408ED6354d4973f66138C91495F2f2FCbd8724C3".parse().unwrap();
        let b: VoterAddress = "0x408ed6354d4973f66138c91495f2f2fcbd8724c3".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.short(), "0x408e…24c3");
    }

    #[test]
    fn rejects_malformed() {
        assert!("408ed6354d4973f66138c91495f2f2fcbd8724c3".parse::<VoterAddress>().is_err());
        assert!("0x1234".parse::<VoterAddress>().is_err());
        assert!("0xzz8ed6354d4973f66138c91495f2f2fcbd8724c3".parse::<VoterAddress>().is_err());
    }
}
