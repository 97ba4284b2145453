use crate::error::{DocumentError, Result};
use std::path::{Path, PathBuf};

/// Text extracted from a PDF, one entry per page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub pages: Vec<String>,
}

impl Document {
    /// All page texts concatenated in page order, without separators
    #[must_use]
    pub fn text(&self) -> String {
        self.pages.concat()
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// PDF loader backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

impl PdfLoader {
    /// Load a PDF file and extract the text of every page
    pub fn load(path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }

        log::info!("Loading PDF {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::load_mem(path, &bytes)
    }

    /// Extract text from PDF bytes; `path` is only used for reporting
    pub fn load_mem(path: &Path, bytes: &[u8]) -> Result<Document> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| DocumentError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // BTreeMap keyed by page number, so iteration is already in page order.
        let pages_map = doc.get_pages();
        let mut pages = Vec::with_capacity(pages_map.len());
        for page_num in pages_map.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) => pages.push(text),
                Err(err) => {
                    log::warn!(
                        "Skipping text of page {page_num} in {}: {err}",
                        path.display()
                    );
                    pages.push(String::new());
                }
            }
        }

        let document = Document {
            path: path.to_path_buf(),
            pages,
        };
        if document.pages.iter().all(|page| page.trim().is_empty()) {
            return Err(DocumentError::NoText(document.path));
        }

        log::info!(
            "Extracted {} chars from {} pages",
            document.pages.iter().map(|p| p.chars().count()).sum::<usize>(),
            document.page_count()
        );
        Ok(document)
    }
}
