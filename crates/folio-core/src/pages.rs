//! Maps character offsets in a document's concatenated text back to page numbers.

use crate::pdf::Page;

/// Cumulative character count after each page, in page order.
///
/// The last entry's count equals the length of the concatenated text returned by
/// [`PageOffsetMap::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOffsetMap {
    entries: Vec<(u32, usize)>,
}

impl PageOffsetMap {
    /// Concatenates page texts in order (no separator) and records the running length
    /// after each page. Returns the map and the concatenated text.
    pub fn build(pages: &[Page]) -> (Self, String) {
        let mut text = String::new();
        let mut total = 0;
        let mut entries = Vec::with_capacity(pages.len());
        for page in pages {
            text.push_str(&page.text);
            total += page.text.chars().count();
            entries.push((page.number, total));
        }
        (Self { entries }, text)
    }

    pub fn entries(&self) -> &[(u32, usize)] {
        &self.entries
    }

    /// Total character length of the document.
    pub fn total_len(&self) -> usize {
        self.entries.last().map_or(0, |&(_, upto)| upto)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First page whose cumulative end offset is >= `pos`. Positions past the end map
    /// to the last page. Returns `None` only for an empty map.
    pub fn locate_page(&self, pos: usize) -> Option<u32> {
        self.entries
            .iter()
            .find(|&&(_, upto)| pos <= upto)
            .or_else(|| self.entries.last())
            .map(|&(number, _)| number)
    }

    /// Approximate `[start_page, end_page]` for the chunk starting at `chunk_start`.
    ///
    /// Both ends are derived from the chunk's start offset, so `end_page` always equals
    /// `start_page`. Downstream consumers read this two-element shape.
    pub fn approx_pages(&self, chunk_start: usize) -> Option<(u32, u32)> {
        self.locate_page(chunk_start).map(|p| (p, p))
    }
}
