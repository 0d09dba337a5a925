//! The Whirlpool transaction graph.
//!
//! A snapshot holds every funding transaction (Tx0) and mix transaction of one pool,
//! plus the links between them: `source -> target` means an output of `source` is
//! spent as an input of `target`. The graph is indexed both ways:
//!
//! ```text
//! Tx0 ─┐
//! Tx0 ─┼─> mix ──> mix ──> ... ──> exits (unspent or left the pool)
//! mix ─┘
//! ```
//!
//! Snapshots are built once from three ordered record streams and never mutated
//! afterwards; every metric engine borrows them read-only.

pub mod error;
pub mod loader;
pub mod node;
pub mod records;
pub mod session;
pub mod snapshot;
pub mod source;

pub use error::GraphError;
pub use loader::load_snapshot;
pub use node::{Node, NodeKind};
pub use records::{EdgeRecord, FundingRecord, MixRecord, Stream};
pub use session::Session;
pub use snapshot::{GraphSnapshot, SnapshotBuilder, DEFAULT_PARTICIPANTS};
pub use source::{DirectorySource, MemorySource, SnapshotSource};
