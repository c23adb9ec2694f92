//! Where folio keeps its own files (the default `folio.toml`).
//!
//! Source PDFs and the output index live wherever the config points; only config is stored here.

use std::path::PathBuf;

/// Returns the directory where folio looks for its config file.
/// On Linux: `~/.config/folio/`. On macOS: `~/Library/Application Support/app.folio.folio/`.
/// Returns `None` if we can't determine the path. Does not create the directory.
pub fn app_data_dir() -> Option<PathBuf> {
    Some(directories::ProjectDirs::from("app", "folio", "folio")?.config_dir().to_path_buf())
}
