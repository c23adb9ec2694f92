//! Per-page text extraction from PDF files (via lopdf) and an encryption/page-count probe
//! for operator diagnostics.

use std::fmt;
use std::path::Path;

use lopdf::Document;
use thiserror::Error;

/// One extracted page: 1-based page number and its raw text (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub text: String,
}

/// Why a document contributed no records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("failed to parse: {0}")]
    Unreadable(String),
    #[error("encrypted (needs password)")]
    Encrypted,
    #[error("still encrypted after empty-password attempt")]
    StillEncrypted,
    #[error("no pages")]
    NoPages,
}

/// Yields a document's pages in order, or the reason it can't be read.
///
/// A failure on a single page must not fail the document: implementations substitute
/// empty text for that page.
pub trait PageExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<Page>, SkipReason>;
}

/// [`PageExtractor`] backed by lopdf. Encrypted files are tried with an empty password.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl PageExtractor for LopdfExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<Page>, SkipReason> {
        let mut doc = Document::load(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
        unlock(&mut doc)?;

        let pages = doc
            .get_pages()
            .into_keys()
            .map(|number| {
                let text = doc.extract_text(&[number]).unwrap_or_else(|e| {
                    tracing::debug!(file = %path.display(), page = number, error = %e, "page extraction failed");
                    String::new()
                });
                Page { number, text }
            })
            .collect();
        Ok(pages)
    }
}

/// Owner-locked PDFs often open with an empty user password. lopdf drops the `Encrypt`
/// entry on a successful decrypt, so `StillEncrypted` only guards the second check.
fn unlock(doc: &mut Document) -> Result<(), SkipReason> {
    if !doc.is_encrypted() {
        return Ok(());
    }
    if doc.decrypt("").is_err() {
        return Err(SkipReason::Encrypted);
    }
    if doc.is_encrypted() {
        return Err(SkipReason::StillEncrypted);
    }
    Ok(())
}

/// What `folio check` reports for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfStatus {
    Opened {
        encrypted: bool,
        /// `None` when encrypted; the page tree can't be trusted.
        pages: Option<usize>,
    },
    Error(String),
}

impl fmt::Display for PdfStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfStatus::Opened { encrypted, pages: Some(n) } => {
                write!(f, "encrypted={}, pages={}", encrypted, n)
            }
            PdfStatus::Opened { encrypted, pages: None } => {
                write!(f, "encrypted={}, pages=N/A", encrypted)
            }
            PdfStatus::Error(msg) => write!(f, "ERROR -> {}", msg),
        }
    }
}

/// Opens `path` without extracting text and reports encryption and page count.
pub fn probe(path: &Path) -> PdfStatus {
    match Document::load(path) {
        Ok(doc) => {
            let encrypted = doc.is_encrypted();
            let pages = (!encrypted).then(|| doc.get_pages().len());
            PdfStatus::Opened { encrypted, pages }
        }
        Err(e) => PdfStatus::Error(e.to_string()),
    }
}
