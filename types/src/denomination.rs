//! Pool denominations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Identifies which fixed-denomination pool a snapshot describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Denomination {
    /// 0.5 BTC pool.
    #[serde(rename = "05")]
    Btc05,
    /// 0.05 BTC pool.
    #[serde(rename = "005")]
    Btc005,
    /// 0.01 BTC pool.
    #[serde(rename = "001")]
    Btc001,
}

impl Denomination {
    /// Every known pool, in the order point lookups probe them.
    pub const ALL: [Self; 3] = [Self::Btc05, Self::Btc005, Self::Btc001];

    /// Code used in snapshot file names.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Btc05 => "05",
            Self::Btc005 => "005",
            Self::Btc001 => "001",
        }
    }
}

impl FromStr for Denomination {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "05" => Ok(Self::Btc05),
            "005" => Ok(Self::Btc005),
            "001" => Ok(Self::Btc001),
            other => Err(TypesError::UnknownDenomination(other.to_string())),
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
