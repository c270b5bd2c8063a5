//! Data models: extracted records, result tables, and configuration.

pub mod config;
pub mod record;

pub use config::LedgexConfig;
pub use record::{FieldName, PageRecord, RawCell, RefinedTable, ResolvedFields, ResultTable};
