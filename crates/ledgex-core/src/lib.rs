//! Core library for receivables statement extraction.
//!
//! This crate provides:
//! - PDF page access (page count, per-page text) behind a `PageSource` seam
//! - Text normalization and the multi-case pattern catalog
//! - Field resolvers that pick one winning value per field
//! - The chunked page pipeline producing a row-oriented result table
//!
//! The split that matters: the catalog recognizes values, the resolvers pick
//! among them, and neither knows about the other's internals.

pub mod error;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod statement;

pub use error::{LedgexError, PdfError, Result};
pub use models::config::LedgexConfig;
pub use models::record::{
    FieldName, PageRecord, RawCell, RefinedTable, ResolvedFields, ResultTable,
};
pub use pdf::{PageSource, PdfExtractor};
pub use pipeline::{CHUNK_SIZE, ChunkedPipeline, DocumentRun, RunStatus};
pub use statement::{RecordExtractor, normalize};
