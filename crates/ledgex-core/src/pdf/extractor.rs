//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{PageSource, Result};
use crate::error::PdfError;

/// PDF-backed [`PageSource`].
///
/// lopdf owns the container (page count, empty-password decryption);
/// pdf-extract produces the text. Extraction runs over the whole document
/// once, and per-page text is sliced out of the full text by line count.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    /// Full-document text lines, extracted lazily on first page access.
    lines: Option<Vec<String>>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            lines: None,
        }
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        self.lines = None;
        Ok(())
    }

    /// Load a PDF from a file path.
    pub fn load_file(&mut self, path: &std::path::Path) -> Result<()> {
        let data = std::fs::read(path)
            .map_err(|e| PdfError::Parse(format!("{}: {}", path.display(), e)))?;
        self.load(&data)
    }

    /// Extract text from the entire PDF.
    pub fn extract_text(&self) -> Result<String> {
        let text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        Ok(text)
    }

    fn ensure_lines(&mut self) -> Result<&[String]> {
        if self.lines.is_none() {
            let text = self.extract_text()?;
            self.lines = Some(text.lines().map(String::from).collect());
        }
        Ok(self.lines.as_deref().unwrap_or(&[]))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for PdfExtractor {
    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn page_text(&mut self, index: u32) -> Result<Option<String>> {
        let page_count = self.page_count();
        if index >= page_count {
            return Err(PdfError::InvalidPage(index));
        }

        let lines = self.ensure_lines()?;
        if lines.is_empty() {
            return Ok(None);
        }

        let lines_per_page = (lines.len() / page_count as usize).max(1);
        let start = (index as usize * lines_per_page).min(lines.len());
        let end = ((index as usize + 1) * lines_per_page).min(lines.len());

        let text = lines[start..end].join("\n");
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}
