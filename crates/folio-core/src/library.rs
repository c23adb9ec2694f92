//! Discovering the PDF books in the source directory.
//!
//! Only the top level of the directory is read; books are returned sorted by file name
//! so chunk ids and page ranges are reproducible between runs.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A PDF found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub path: PathBuf,
    /// File name with extension, e.g. `Alpha_Beta.pdf`.
    pub file_name: String,
    /// File stem with underscores replaced by spaces, e.g. `Alpha Beta`.
    pub name: String,
}

impl Book {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            file_name,
            name: book_name(&stem),
        }
    }
}

/// Display name for a book: the file stem with `_` turned into spaces.
pub fn book_name(stem: &str) -> String {
    stem.replace('_', " ")
}

/// Lists `*.pdf` files directly under `root`, sorted by file name.
pub fn scan_books(root: &Path) -> Result<Vec<Book>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let mut books = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ScanError::Walk(e.to_string()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().map_or(false, |e| e == "pdf") {
            books.push(Book::from_path(path));
        }
    }
    Ok(books)
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("walk error: {0}")]
    Walk(String),
}
