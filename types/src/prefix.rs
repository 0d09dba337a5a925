//! Short txid prefixes used to index back into a snapshot.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Number of leading txid bytes kept as the lookup key.
pub const TXID_PREFIX_LENGTH: usize = 8;

/// The first [`TXID_PREFIX_LENGTH`] bytes of an external transaction id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxPrefix([u8; TXID_PREFIX_LENGTH]);

impl TxPrefix {
    pub fn new(bytes: [u8; TXID_PREFIX_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TXID_PREFIX_LENGTH] {
        &self.0
    }

    /// Parse a full txid or a prefix of at least 16 hex characters.
    ///
    /// Only the leading 16 characters are read; the remainder is ignored, so a full
    /// 64-character txid and its prefix resolve to the same key.
    pub fn from_txid(txid: &str) -> Result<Self, TypesError> {
        let txid = txid.trim();
        let wanted = 2 * TXID_PREFIX_LENGTH;
        let head = txid.get(..wanted).ok_or_else(|| TypesError::InvalidPrefix {
            value: txid.to_string(),
            reason: format!("need at least {wanted} hex characters"),
        })?;
        let mut bytes = [0u8; TXID_PREFIX_LENGTH];
        hex::decode_to_slice(head, &mut bytes).map_err(|e| TypesError::InvalidPrefix {
            value: txid.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(bytes))
    }
}

impl FromStr for TxPrefix {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_txid(s)
    }
}

impl fmt::Debug for TxPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxPrefix({})", hex::encode(self.0))
    }
}

impl fmt::Display for TxPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for TxPrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TxPrefix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_txid(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_txid_and_prefix_resolve_to_same_key() {
        let full = "450f236d596fc8a43916d624734fa7608cff1f17af5c3ddf81d7ad79021a645d";
        let short = "450f236d596fc8a4";
        assert_eq!(TxPrefix::from_txid(full).unwrap(), TxPrefix::from_txid(short).unwrap());
    }

    #[test]
    fn prefix_is_case_insensitive() {
        let lower = TxPrefix::from_txid("abcdef0123456789").unwrap();
        let upper = TxPrefix::from_txid("ABCDEF0123456789").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.to_string(), "abcdef0123456789");
    }

    #[test]
    fn short_txid_is_rejected() {
        let err = TxPrefix::from_txid("abcd").unwrap_err();
        assert!(matches!(err, TypesError::InvalidPrefix { .. }));
    }

    #[test]
    fn non_hex_txid_is_rejected() {
        assert!(TxPrefix::from_txid("zzzzzzzzzzzzzzzz").is_err());
    }
}
