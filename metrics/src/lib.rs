//! Privacy metrics over Whirlpool transaction graphs.
//!
//! - [`BackwardAnonsetEngine`]: how many Tx0s could have funded each mix round.
//! - [`ForwardAnonsetEngine`]: how many exit outputs each mix round could have become.
//! - [`CounterpartyHeterogeneityEngine`]: how varied the co-participants of each Tx0 were.
//! - [`PointScoreLookup`]: the scores of one transaction, without a full pass.
//!
//! Anonset engines run either exactly, with one graph walk per mix, or in a
//! single streaming pass over mergeable cardinality sketches.

pub mod analysis;
pub mod backward;
mod cache;
pub mod config;
pub mod counterparty;
pub mod error;
pub mod forward;
pub mod lookup;
pub mod report;
pub mod validate;
pub mod walk;

#[cfg(test)]
mod fixtures;

pub use analysis::Analysis;
pub use backward::{BackwardAnonsetEngine, BackwardReport};
pub use cache::CacheStats;
pub use config::{AnalysisConfig, AnonsetMode};
pub use counterparty::{CounterpartyHeterogeneityEngine, CounterpartyReport, FundingMetric};
pub use error::MetricsError;
pub use forward::{ForwardAnonsetEngine, ForwardReport};
pub use lookup::{score_any, MixScore, PointScore, PointScoreLookup, Score};
pub use report::{spread, ActivityReport, DayActivity, RoundMetric};
pub use validate::{validate, Discrepancy, ValidationReport};
pub use walk::ExactWalker;
