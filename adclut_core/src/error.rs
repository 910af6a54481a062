use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("dataset contains no samples")]
    EmptyDataset,
    #[error("dataset malformed: {0}")]
    DatasetMalformed(String),
    #[error("degenerate interpolation: need at least 2 distinct points, got {distinct}")]
    DegenerateInterpolation { distinct: usize },
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("invalid table: {0}")]
    InvalidTable(String),
}

pub type Result<T> = std::result::Result<T, CalibrationError>;
