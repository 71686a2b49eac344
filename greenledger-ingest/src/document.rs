//! Statement documents as ordered page text.
//!
//! PDFs are split into pages by `pdf-extract`; plain text follows the
//! `pdftotext` convention of a form feed between pages.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{IngestError, IngestResult};

const PAGE_BREAK: char = '\x0c';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    statement_id: String,
    pages: Vec<String>,
}

impl Document {
    /// Pages supplied by a collaborator that did its own text extraction.
    pub fn from_pages(statement_id: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            statement_id: statement_id.into(),
            pages,
        }
    }

    /// The form feed closing the last page does not open another one.
    pub fn from_text(text: &str) -> Self {
        let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        Self::from_pages(statement_id(text.as_bytes()), pages)
    }

    pub fn from_pdf_bytes(bytes: &[u8]) -> IngestResult<Self> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| IngestError::DocumentUnreadable(e.to_string()))?;
        debug!(pages = pages.len(), "extracted pdf text");
        Ok(Self::from_pages(statement_id(bytes), pages))
    }

    /// `.pdf` files go through PDF text extraction; anything else must be UTF-8 text.
    pub fn load(path: impl AsRef<Path>) -> IngestResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;

        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            return Self::from_pdf_bytes(&bytes);
        }

        let text = String::from_utf8(bytes).map_err(|e| {
            IngestError::DocumentUnreadable(format!("{} is not UTF-8 text: {e}", path.display()))
        })?;
        Ok(Self::from_text(&text))
    }

    /// Content hash of the source bytes; the persistence join key.
    pub fn statement_id(&self) -> &str {
        &self.statement_id
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lowercase hex SHA-256 of the raw document bytes.
pub fn statement_id(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
