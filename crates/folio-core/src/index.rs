//! Index pipeline: scan → extract → chunk → map pages → build records, for every book,
//! then one embedding pass over all records, then write.

use crate::chunks::chunk_text;
use crate::config::{Config, ConfigError};
use crate::embed::{embed_all, EmbedError, Embedder};
use crate::library::{scan_books, Book, ScanError};
use crate::ollama::{OllamaClient, OllamaError};
use crate::pages::PageOffsetMap;
use crate::pdf::{LopdfExtractor, PageExtractor, SkipReason};
use crate::records::{build_records, Record};
use crate::writer::{write_index, Index, Metadata, WriteError};

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    pub file_name: String,
    pub outcome: DocumentOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Indexed { pages: usize, chunks: usize },
    Skipped(SkipReason),
}

/// Result of a run. `index` is `None` when no records were produced.
#[derive(Debug, Clone)]
pub struct IndexOutcome {
    pub index: Option<Index>,
    pub documents: Vec<DocumentReport>,
}

impl IndexOutcome {
    pub fn total_chunks(&self) -> usize {
        self.index.as_ref().map_or(0, |i| i.records.len())
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.documents.iter().filter_map(|d| match &d.outcome {
            DocumentOutcome::Skipped(reason) => Some((d.file_name.as_str(), reason)),
            DocumentOutcome::Indexed { .. } => None,
        })
    }
}

/// Extracts, chunks, and builds records for one book. The page text is dropped on return.
pub fn process_book<X: PageExtractor + ?Sized>(
    book: &Book,
    extractor: &X,
    config: &Config,
) -> Result<(usize, Vec<Record>), SkipReason> {
    let pages = extractor.extract(&book.path)?;
    if pages.is_empty() {
        return Err(SkipReason::NoPages);
    }
    let (page_map, text) = PageOffsetMap::build(&pages);
    let chunks = chunk_text(&text, config.chunk_size, config.chunk_overlap);
    let records = build_records(book, chunks, &page_map).ok_or(SkipReason::NoPages)?;
    Ok((pages.len(), records))
}

/// Records for every book, in book order, plus a report per book.
pub fn collect_records<X: PageExtractor + ?Sized>(
    books: &[Book],
    extractor: &X,
    config: &Config,
) -> (Vec<Record>, Vec<DocumentReport>) {
    let mut records = Vec::new();
    let mut reports = Vec::with_capacity(books.len());
    for book in books {
        let outcome = match process_book(book, extractor, config) {
            Ok((pages, book_records)) => {
                tracing::info!(file = %book.file_name, pages, chunks = book_records.len(), "processed");
                let chunks = book_records.len();
                records.extend(book_records);
                DocumentOutcome::Indexed { pages, chunks }
            }
            Err(reason) => {
                match &reason {
                    SkipReason::Encrypted | SkipReason::StillEncrypted => {
                        tracing::warn!(file = %book.file_name, "skip (encrypted): {}", reason)
                    }
                    SkipReason::Unreadable(_) => {
                        tracing::warn!(file = %book.file_name, "skip (unreadable): {}", reason)
                    }
                    SkipReason::NoPages => tracing::warn!(file = %book.file_name, "skip: no pages"),
                }
                DocumentOutcome::Skipped(reason)
            }
        };
        reports.push(DocumentReport {
            file_name: book.file_name.clone(),
            outcome,
        });
    }
    (records, reports)
}

/// Runs the pipeline over `config.source_dir` without writing anything.
pub async fn build_index<X, E>(
    config: &Config,
    extractor: &X,
    embedder: &E,
) -> Result<IndexOutcome, IndexError>
where
    X: PageExtractor + ?Sized,
    E: Embedder + ?Sized,
{
    config.validate()?;
    let books = scan_books(&config.source_dir)?;
    let (records, documents) = collect_records(&books, extractor, config);

    if records.is_empty() {
        return Ok(IndexOutcome { index: None, documents });
    }

    let records = embed_all(records, embedder, config.embed_batch_size).await?;
    let embedding_dim = records.first().map_or(0, |r| r.embedding.len());
    let metadata = Metadata {
        model: embedder.model().to_string(),
        chunk_size: config.chunk_size,
        chunk_overlap: config.chunk_overlap,
        total_chunks: records.len(),
        embedding_dim,
    };
    Ok(IndexOutcome {
        index: Some(Index { records, metadata }),
        documents,
    })
}

/// Builds the index and writes it to `config.out_path`. Nothing is written for an empty corpus.
pub async fn build_and_write<X, E>(
    config: &Config,
    extractor: &X,
    embedder: &E,
) -> Result<IndexOutcome, IndexError>
where
    X: PageExtractor + ?Sized,
    E: Embedder + ?Sized,
{
    let outcome = build_index(config, extractor, embedder).await?;
    match &outcome.index {
        Some(index) => write_index(&config.out_path, index)?,
        None => tracing::warn!(source = %config.source_dir.display(), "no chunks produced; index not written"),
    }
    Ok(outcome)
}

/// Production entry point: lopdf for extraction, Ollama for embeddings.
pub async fn run(config: &Config) -> Result<IndexOutcome, IndexError> {
    let embedder = OllamaClient::from_url(&config.ollama_url)?.with_embed_model(config.model.clone());
    build_and_write(config, &LopdfExtractor, &embedder).await
}

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("embedding error: {0}")]
    Embed(#[from] EmbedError),
    #[error("Ollama error: {0}")]
    Ollama(#[from] OllamaError),
    #[error("write error: {0}")]
    Write(#[from] WriteError),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::pdf::Page;

    /// Serves canned pages keyed by file name.
    struct CannedExtractor(HashMap<String, Result<Vec<Page>, SkipReason>>);

    impl PageExtractor for CannedExtractor {
        fn extract(&self, path: &Path) -> Result<Vec<Page>, SkipReason> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.0.get(&name).cloned().unwrap_or(Err(SkipReason::NoPages))
        }
    }

    fn book(name: &str) -> Book {
        Book::from_path(&PathBuf::from("/in").join(name))
    }

    fn pages(lengths: &[usize]) -> Vec<Page> {
        lengths
            .iter()
            .enumerate()
            .map(|(i, &n)| Page { number: i as u32 + 1, text: "p".repeat(n) })
            .collect()
    }

    #[test]
    fn process_book_counts_pages_and_chunks() {
        let x = CannedExtractor(HashMap::from([("Alpha Beta.pdf".to_string(), Ok(pages(&[1000, 500])))]));
        let (n, records) = process_book(&book("Alpha Beta.pdf"), &x, &Config::default()).unwrap();
        assert_eq!(n, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "Alpha Beta__chunk_1");
    }

    #[test]
    fn empty_page_list_is_skipped() {
        let x = CannedExtractor(HashMap::from([("e.pdf".to_string(), Ok(Vec::new()))]));
        let err = process_book(&book("e.pdf"), &x, &Config::default()).unwrap_err();
        assert_eq!(err, SkipReason::NoPages);
    }

    #[test]
    fn skipped_books_do_not_stop_the_run() {
        let x = CannedExtractor(HashMap::from([
            ("a.pdf".to_string(), Ok(pages(&[10]))),
            ("b.pdf".to_string(), Err(SkipReason::Encrypted)),
            ("c.pdf".to_string(), Ok(pages(&[5, 5]))),
        ]));
        let books = vec![book("a.pdf"), book("b.pdf"), book("c.pdf")];
        let (records, reports) = collect_records(&books, &x, &Config::default());

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a__chunk_0", "c__chunk_0"]);
        assert_eq!(reports[1].outcome, DocumentOutcome::Skipped(SkipReason::Encrypted));
        assert_eq!(reports[2].outcome, DocumentOutcome::Indexed { pages: 2, chunks: 1 });
    }

    #[test]
    fn blank_pages_give_no_records() {
        let x = CannedExtractor(HashMap::from([("blank.pdf".to_string(), Ok(pages(&[0, 0])))]));
        let (records, reports) = collect_records(&[book("blank.pdf")], &x, &Config::default());
        assert!(records.is_empty());
        assert_eq!(reports[0].outcome, DocumentOutcome::Indexed { pages: 2, chunks: 0 });
    }
}
