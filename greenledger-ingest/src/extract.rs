//! Page and line driver: page text in, ordered ledger out.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::document::Document;
use crate::error::IngestResult;
use crate::noise::NoiseFilter;
use crate::parsers::{collapse_whitespace, LineParser};
use crate::types::Transaction;

/// Classifier plus parser, shared read-only across page workers.
#[derive(Debug, Clone, Default)]
pub struct StatementExtractor {
    noise: Arc<NoiseFilter>,
    parser: LineParser,
}

impl StatementExtractor {
    pub fn new(noise: Arc<NoiseFilter>, parser: LineParser) -> Self {
        Self { noise, parser }
    }

    /// Parse every candidate line of one page, in line order.
    pub fn extract_page(&self, page: &str) -> Vec<Transaction> {
        let mut out = Vec::new();
        for raw in page.lines() {
            let line = collapse_whitespace(raw);
            if self.noise.is_noise(&line) {
                continue;
            }
            match self.parser.parse(&line) {
                Some(txn) => out.push(txn),
                None => debug!(line = %line, "unparsable candidate line"),
            }
        }
        out
    }

    /// Pages in document order; pages without text are skipped.
    pub fn extract<S: AsRef<str>>(&self, pages: &[S]) -> Vec<Transaction> {
        let mut out = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            if let Some(txns) = self.extract_numbered_page(index + 1, page.as_ref()) {
                out.extend(txns);
            }
        }
        out
    }

    pub fn extract_document(&self, document: &Document) -> Vec<Transaction> {
        self.extract(document.pages())
    }

    fn extract_numbered_page(&self, number: usize, page: &str) -> Option<Vec<Transaction>> {
        if page.trim().is_empty() {
            warn!(page = number, "page yielded no text; skipping");
            return None;
        }
        let txns = self.extract_page(page);
        debug!(page = number, transactions = txns.len(), "page parsed");
        Some(txns)
    }
}

/// Parse pages on blocking workers and merge in page order, not completion
/// order, so the result equals [`StatementExtractor::extract`].
pub async fn extract_concurrent(
    extractor: Arc<StatementExtractor>,
    pages: Vec<String>,
) -> IngestResult<Vec<Transaction>> {
    let handles: Vec<_> = pages
        .into_iter()
        .enumerate()
        .map(|(index, page)| {
            let extractor = Arc::clone(&extractor);
            tokio::task::spawn_blocking(move || extractor.extract_numbered_page(index + 1, &page))
        })
        .collect();

    let mut out = Vec::new();
    for handle in handles {
        if let Some(txns) = handle.await? {
            out.extend(txns);
        }
    }
    Ok(out)
}
