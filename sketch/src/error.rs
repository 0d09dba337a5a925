use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SketchError {
    #[error("sketch precision {given} out of range ({min}..={max})")]
    InvalidPrecision { given: u8, min: u8, max: u8 },
}
