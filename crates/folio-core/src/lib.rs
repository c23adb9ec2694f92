//! Turns a directory of PDF books into one searchable JSON index of overlapping text
//! chunks, each with its book, approximate page range, and embedding.
//!
//! Extraction goes through [`PageExtractor`] (lopdf by default) and embeddings through
//! [`Embedder`] (Ollama by default); everything in between is pure.

pub mod app_data;
pub mod chunks;
pub mod config;
pub mod embed;
pub mod index;
pub mod library;
pub mod ollama;
pub mod pages;
pub mod pdf;
pub mod records;
pub mod writer;

pub use app_data::app_data_dir;
pub use chunks::{chunk_text, step, Chunk, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use config::{default_config_path, load_config, Config, ConfigError};
pub use embed::{embed_all, EmbedError, Embedder};
pub use index::{
    build_and_write, build_index, collect_records, process_book, run, DocumentOutcome,
    DocumentReport, IndexError, IndexOutcome,
};
pub use library::{book_name, scan_books, Book, ScanError};
pub use ollama::{OllamaClient, OllamaError};
pub use pages::PageOffsetMap;
pub use pdf::{probe, LopdfExtractor, Page, PageExtractor, PdfStatus, SkipReason};
pub use records::{build_records, Record};
pub use writer::{read_index, write_index, Index, Metadata, WriteError};
