//! Chunked page pipeline: drives the extractor across a document.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::config::LedgexConfig;
use crate::models::record::ResultTable;
use crate::pdf::{PageSource, PdfExtractor};
use crate::statement::RecordExtractor;

/// Pages processed and flushed together. Bounds peak memory on very large
/// documents and gives callers a natural progress cadence.
pub const CHUNK_SIZE: u32 = 20;

/// Processing state of one document run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Done,
    Failed,
}

impl RunStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Done => "done",
            RunStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing one document. Owned by the caller; repeated and
/// concurrent invocations each get their own run value.
#[derive(Debug, Default)]
pub struct DocumentRun {
    pub status: RunStatus,
    pub table: ResultTable,
    /// Pages the document reports.
    pub pages_total: u32,
    /// Pages that yielded text and therefore a record.
    pub pages_with_text: u32,
    /// Non-fatal problems, at most one per failure class per document.
    pub warnings: Vec<String>,
}

/// Iterates document pages in fixed-size chunks, invoking the extractor per
/// page and flushing each chunk into the accumulating table.
///
/// Single-threaded and synchronous; the only cross-page state is the
/// append-only table and the chunk cursor. Callers wanting cancellation stop
/// supplying pages between chunk boundaries.
pub struct ChunkedPipeline {
    extractor: RecordExtractor,
    max_pages: usize,
}

impl ChunkedPipeline {
    pub fn new() -> Self {
        Self {
            extractor: RecordExtractor::new(),
            max_pages: 0,
        }
    }

    pub fn from_config(config: &LedgexConfig) -> Self {
        Self {
            extractor: RecordExtractor::from_config(&config.extraction),
            max_pages: config.pdf.max_pages,
        }
    }

    /// Process every page of `source`, reporting `(pages_processed, total)`
    /// to `progress` after each chunk flush.
    pub fn process<S, F>(&self, source: &mut S, mut progress: F) -> DocumentRun
    where
        S: PageSource,
        F: FnMut(u32, u32),
    {
        let mut total = source.page_count();
        if self.max_pages > 0 {
            total = total.min(self.max_pages as u32);
        }

        let mut run = DocumentRun {
            status: RunStatus::Running,
            pages_total: total,
            ..DocumentRun::default()
        };

        info!(pages = total, "processing document");

        let mut read_failure_reported = false;
        let mut p = 0u32;
        while p < total {
            let end = (p + CHUNK_SIZE).min(total);
            let mut chunk = Vec::new();

            for page in p..end {
                match source.page_text(page) {
                    Ok(Some(text)) if !text.trim().is_empty() => {
                        chunk.push(self.extractor.extract_page(&text));
                    }
                    Ok(_) => {
                        debug!(page, "no text, skipping page");
                    }
                    Err(e) => {
                        if !read_failure_reported {
                            warn!(page, error = %e, "page read failed, continuing");
                            run.warnings.push(format!("page {} unreadable: {}", page, e));
                            read_failure_reported = true;
                        }
                    }
                }
            }

            run.pages_with_text += chunk.len() as u32;
            run.table.extend(chunk);
            progress(p, total);
            p = end;
        }

        run.status = RunStatus::Done;
        info!(
            records = run.table.len(),
            pages = run.pages_total,
            "document done"
        );
        run
    }

    /// Open a PDF and process it. Container-level failures are fatal for
    /// this document only.
    pub fn process_document<F>(&self, path: &std::path::Path, progress: F) -> Result<DocumentRun>
    where
        F: FnMut(u32, u32),
    {
        let mut source = PdfExtractor::new();
        source.load_file(path)?;
        Ok(self.process(&mut source, progress))
    }
}

impl Default for ChunkedPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfError;
    use crate::pdf::Result as PdfResult;

    /// In-memory page source: `None` pages have no text, the `failing`
    /// indexes error on read.
    struct StubSource {
        pages: Vec<Option<String>>,
        failing: Vec<u32>,
    }

    impl StubSource {
        fn new(pages: Vec<Option<String>>) -> Self {
            Self {
                pages,
                failing: Vec::new(),
            }
        }

        fn page(n: u32) -> Option<String> {
            Some(format!("Customer #: {} (STUB BUSINESS {})", 1000 + n, n))
        }
    }

    impl PageSource for StubSource {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn page_text(&mut self, index: u32) -> PdfResult<Option<String>> {
            if self.failing.contains(&index) {
                return Err(PdfError::TextExtraction(format!("bad page {}", index)));
            }
            Ok(self.pages[index as usize].clone())
        }
    }

    #[test]
    fn test_chunk_progress_offsets() {
        let mut source = StubSource::new((0..45).map(StubSource::page).collect());
        let mut events = Vec::new();

        let run = ChunkedPipeline::new().process(&mut source, |p, total| events.push((p, total)));

        assert_eq!(events, vec![(0, 45), (20, 45), (40, 45)]);
        assert_eq!(run.status, RunStatus::Done);
        assert_eq!(run.pages_total, 45);
        assert_eq!(run.table.len(), 45);
    }

    #[test]
    fn test_empty_pages_skip_without_shifting_progress() {
        let mut pages: Vec<Option<String>> = (0..45).map(StubSource::page).collect();
        pages[3] = None;
        pages[21] = Some("   \n  ".to_string());
        pages[44] = None;
        let mut source = StubSource::new(pages);
        let mut events = Vec::new();

        let run = ChunkedPipeline::new().process(&mut source, |p, total| events.push((p, total)));

        // Table length equals pages with text; offsets are unchanged.
        assert_eq!(run.table.len(), 42);
        assert_eq!(run.pages_with_text, 42);
        assert_eq!(events, vec![(0, 45), (20, 45), (40, 45)]);
    }

    #[test]
    fn test_records_preserve_page_order() {
        let mut source = StubSource::new((0..3).map(StubSource::page).collect());
        let run = ChunkedPipeline::new().process(&mut source, |_, _| {});

        let numbers: Vec<_> = run
            .table
            .records()
            .iter()
            .map(|r| r.resolved.customer_number.clone().unwrap())
            .collect();
        assert_eq!(numbers, vec!["1000", "1001", "1002"]);
    }

    #[test]
    fn test_page_read_failure_warns_once_and_continues() {
        let mut source = StubSource::new((0..5).map(StubSource::page).collect());
        source.failing = vec![1, 3];

        let run = ChunkedPipeline::new().process(&mut source, |_, _| {});

        assert_eq!(run.status, RunStatus::Done);
        assert_eq!(run.table.len(), 3);
        assert_eq!(run.warnings.len(), 1);
        assert!(run.warnings[0].contains("page 1"));
    }

    #[test]
    fn test_max_pages_caps_document() {
        let config = LedgexConfig {
            pdf: crate::models::config::PdfConfig { max_pages: 25 },
            ..LedgexConfig::default()
        };
        let mut source = StubSource::new((0..45).map(StubSource::page).collect());
        let mut events = Vec::new();

        let run = ChunkedPipeline::from_config(&config)
            .process(&mut source, |p, total| events.push((p, total)));

        assert_eq!(run.pages_total, 25);
        assert_eq!(run.table.len(), 25);
        assert_eq!(events, vec![(0, 25), (20, 25)]);
    }

    #[test]
    fn test_empty_document_emits_no_progress() {
        let mut source = StubSource::new(Vec::new());
        let mut events = Vec::new();

        let run = ChunkedPipeline::new().process(&mut source, |p, total| events.push((p, total)));

        assert_eq!(run.status, RunStatus::Done);
        assert!(run.table.is_empty());
        assert!(events.is_empty());
    }
}
