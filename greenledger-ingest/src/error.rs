use thiserror::Error;

/// Failures surfaced while turning a statement into a ledger.
///
/// Only `DocumentUnreadable` (and the I/O failure behind it) is fatal for a
/// request; `MalformedAmount` is consumed by the line parser.
#[derive(Error, Debug)]
pub enum IngestError {
    /// A monetary token does not follow the amount grammar
    #[error("malformed amount: {0:?}")]
    MalformedAmount(String),

    /// The source document could not be opened or decoded at all
    #[error("document unreadable: {0}")]
    DocumentUnreadable(String),

    #[error("failed to read statement: {0}")]
    Io(#[from] std::io::Error),

    /// A page worker panicked or was cancelled
    #[error("page worker failed: {0}")]
    PageWorker(#[from] tokio::task::JoinError),
}

pub type IngestResult<T> = Result<T, IngestError>;
