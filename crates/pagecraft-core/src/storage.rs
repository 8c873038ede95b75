//! File export and import of templates.

use crate::item::CanvasItem;
use crate::template::{self, TemplateError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name written by [`export_to_file`].
pub const EXPORT_FILE_NAME: &str = "template.json";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Write the legacy encoding of `items` to `dir/template.json`.
///
/// Creates `dir` if it doesn't exist. Returns the written path.
pub fn export_to_file(items: &[CanvasItem], dir: &Path) -> StorageResult<PathBuf> {
    if items.is_empty() {
        return Err(TemplateError::EmptyCanvas.into());
    }
    let json = template::to_json(&template::encode(items))?;

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            StorageError::Io(format!("Failed to create {}: {}", dir.display(), e))
        })?;
    }
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, json)
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    log::info!("Exported {} items to {}", items.len(), path.display());
    Ok(path)
}

/// Read and decode a template file in either schema.
pub fn import_from_file(path: &Path) -> StorageResult<Vec<CanvasItem>> {
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let items = template::decode(&json)?;
    log::debug!("Read {} items from {}", items.len(), path.display());
    Ok(items)
}
