use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse PDF {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("No extractable text in {} (the PDF may be scanned)", .0.display())]
    NoText(PathBuf),
}
