//! Fundamental types for Whirlpool statistics.
//!
//! This crate defines the identifiers shared across every other crate in the workspace:
//! dense transaction ids, external txid prefixes, confirmation timestamps and pool
//! denominations.

pub mod denomination;
pub mod error;
pub mod prefix;
pub mod tiid;
pub mod time;

pub use denomination::Denomination;
pub use error::TypesError;
pub use prefix::{TxPrefix, TXID_PREFIX_LENGTH};
pub use tiid::Tiid;
pub use time::Timestamp;
