use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinanceError {
    /// Emission mode outside `min`, `mid`, `max`
    #[error("unknown emission mode {0:?} (expected min, mid or max)")]
    UnknownEmissionMode(String),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type FinanceResult<T> = Result<T, FinanceError>;
