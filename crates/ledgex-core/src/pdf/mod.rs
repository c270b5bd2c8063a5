//! PDF page access.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A source of per-page text. The pipeline is written against this seam and
/// never touches the document container directly.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Text of the page at `index` (0-based). `Ok(None)` means the page has
    /// no extractable text and is skipped, not an error.
    fn page_text(&mut self, index: u32) -> Result<Option<String>>;
}
