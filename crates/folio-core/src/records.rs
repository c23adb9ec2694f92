//! One record per chunk: identity, provenance, text, and page range. Embeddings are
//! attached later by [`crate::embed::embed_all`].

use serde::{Deserialize, Serialize};

use crate::chunks::Chunk;
use crate::library::Book;
use crate::pages::PageOffsetMap;

/// The unit of the output index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// `{book}__chunk_{i}`; unique as long as book names are distinct.
    pub id: String,
    pub book: String,
    /// Zero-based index of the chunk within its book.
    pub chunk_id: usize,
    pub text: String,
    /// Inclusive `[start_page, end_page]`.
    pub pages: [u32; 2],
    /// Citation, e.g. `Alpha_Beta.pdf#pp.3-3`.
    pub source: String,
    /// Empty until the embedding phase.
    pub embedding: Vec<f32>,
}

pub fn record_id(book: &str, chunk_index: usize) -> String {
    format!("{}__chunk_{}", book, chunk_index)
}

pub fn source_citation(file_name: &str, start_page: u32, end_page: u32) -> String {
    format!("{}#pp.{}-{}", file_name, start_page, end_page)
}

/// Builds records for a book's chunks, in chunk order.
///
/// Returns `None` if a chunk has no page to map to, which only happens when `page_map`
/// is empty while `chunks` is not.
pub fn build_records(
    book: &Book,
    chunks: Vec<Chunk>,
    page_map: &PageOffsetMap,
) -> Option<Vec<Record>> {
    chunks
        .into_iter()
        .map(|chunk| {
            let (start_page, end_page) = page_map.approx_pages(chunk.start)?;
            Some(Record {
                id: record_id(&book.name, chunk.index),
                book: book.name.clone(),
                chunk_id: chunk.index,
                text: chunk.text,
                pages: [start_page, end_page],
                source: source_citation(&book.file_name, start_page, end_page),
                embedding: Vec::new(),
            })
        })
        .collect()
}
