//! Splits a document's concatenated page text into fixed-size, overlapping windows.
//! All sizes and offsets are in characters, not bytes, so boundaries never split a
//! multi-byte character.

use std::iter;

/// Default characters per chunk (roughly 200-250 tokens for English prose).
pub const DEFAULT_CHUNK_SIZE: usize = 1200;

/// Default overlap between consecutive chunks, in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// A window of a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Index of this chunk within its document (0, 1, 2, …).
    pub index: usize,
    /// Character offset where the window starts.
    pub start: usize,
    /// Character offset one past the last character; clamped to the text length.
    pub end: usize,
    pub text: String,
}

impl Chunk {
    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Stride between consecutive chunk starts. Never zero, even when `overlap >= chunk_size`.
pub fn step(chunk_size: usize, overlap: usize) -> usize {
    chunk_size.saturating_sub(overlap).max(1)
}

/// Slides a `chunk_size` window over `text`, advancing by [`step`], until the start
/// offset reaches the end of the text. The last chunk may be shorter than `chunk_size`.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }
    // Byte offset of every char boundary, including the end of the text.
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(iter::once(text.len()))
        .collect();
    let n = bounds.len() - 1;
    let step = step(chunk_size, overlap);

    let mut chunks = Vec::with_capacity(n / step + 1);
    let mut start = 0;
    while start < n {
        let end = n.min(start + chunk_size);
        chunks.push(Chunk {
            index: chunks.len(),
            start,
            end,
            text: text[bounds[start]..bounds[end]].to_string(),
        });
        start += step;
    }
    chunks
}
