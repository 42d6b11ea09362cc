use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::Document;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read an HTML fragment file
pub fn read_fragment(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let html = fs::read_to_string(path)?;
    log::info!("read {} ({} bytes)", path.display(), html.len());
    Ok(html)
}

/// Write an HTML fragment file, creating parent directories as needed
pub fn write_fragment(path: &Path, html: &str) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    log::info!("wrote {} ({} bytes)", path.display(), html.len());
    Ok(())
}

/// Load a document from disk. A missing file yields a fresh document.
pub fn open_document(path: &Path) -> Result<Document, IoError> {
    match read_fragment(path) {
        Ok(html) => Ok(Document::from_html(&html)),
        Err(IoError::NotFound(_)) => Ok(Document::new()),
        Err(err) => Err(err),
    }
}
