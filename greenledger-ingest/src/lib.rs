//! greenledger-ingest: statement page text to an ordered ledger of transactions.

pub mod amount;
pub mod document;
pub mod error;
pub mod extract;
pub mod noise;
pub mod parsers;
pub mod types;

pub use amount::normalize;
pub use document::{statement_id, Document};
pub use error::{IngestError, IngestResult};
pub use extract::{extract_concurrent, StatementExtractor};
pub use noise::NoiseFilter;
pub use parsers::{LineParser, ParseStrategy};
pub use types::Transaction;
