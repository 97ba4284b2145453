//! # docqa Document
//!
//! Loads the text layer of a PDF as one string, pages in order.
//!
//! No structure is recovered: headings, tables and images are flattened or
//! dropped, and extraction quality depends entirely on the PDF's text layer.

mod error;
mod loader;

pub use error::{DocumentError, Result};
pub use loader::{Document, PdfLoader};
