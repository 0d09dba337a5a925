use thiserror::Error;

use wst_graph::GraphError;
use wst_sketch::SketchError;
use wst_types::{Tiid, TypesError};

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("transaction {0} not found in any loaded snapshot")]
    NotFound(String),

    #[error("invalid txid: {0}")]
    InvalidTxid(#[from] TypesError),

    #[error("tiid {0} is not a mix transaction")]
    NotAMix(Tiid),

    #[error("tiid {0} is not a Tx0")]
    NotAFunding(Tiid),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("sketch error: {0}")]
    Sketch(#[from] SketchError),

    #[error("config error: {0}")]
    Config(String),
}
