//! Batched embedding of all records. Texts are sent as one logical batch, optionally split
//! into sequential sub-batches, and vectors are written back by position.

use async_trait::async_trait;
use thiserror::Error;

use crate::ollama::OllamaError;
use crate::records::Record;

/// Turns texts into fixed-length vectors, one per input, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model identifier recorded in the index metadata.
    fn model(&self) -> &str;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Attaches an embedding to every record.
///
/// With `batch_size = None` the embedder is called exactly once with every text. With
/// `Some(n)` texts are sent in order in groups of at most `n`. An empty input makes no
/// call. A result whose length or dimensionality doesn't line up with the input aborts.
pub async fn embed_all<E: Embedder + ?Sized>(
    mut records: Vec<Record>,
    embedder: &E,
    batch_size: Option<usize>,
) -> Result<Vec<Record>, EmbedError> {
    if records.is_empty() {
        return Ok(records);
    }
    let texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
    let batch_size = batch_size.filter(|&n| n > 0).unwrap_or(texts.len());
    let batches = texts.len().div_ceil(batch_size);
    tracing::info!(texts = texts.len(), batches, model = embedder.model(), "embedding chunks");

    let mut embeddings = Vec::with_capacity(texts.len());
    for batch in texts.chunks(batch_size) {
        let vectors = embedder.embed_batch(batch).await?;
        if vectors.len() != batch.len() {
            return Err(EmbedError::CountMismatch {
                expected: batch.len(),
                actual: vectors.len(),
            });
        }
        embeddings.extend(vectors);
    }

    let dim = embeddings[0].len();
    if let Some((index, v)) = embeddings.iter().enumerate().find(|(_, v)| v.len() != dim) {
        return Err(EmbedError::DimensionMismatch {
            index,
            expected: dim,
            actual: v.len(),
        });
    }

    for (record, embedding) in records.iter_mut().zip(embeddings) {
        record.embedding = embedding;
    }
    Ok(records)
}

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("embedding error: {0}")]
    Ollama(#[from] OllamaError),
    #[error("embedder returned {actual} vectors for {expected} texts")]
    CountMismatch { expected: usize, actual: usize },
    #[error("vector {index} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}
