//! Field resolvers: one named strategy per ambiguous field.
//!
//! The catalog recognizes values; these functions pick among them. Each
//! strategy encodes an assumption about how the competing layout cases
//! misbehave (loose patterns over-capture, truncating layouts under-capture,
//! adjustment layouts outrank plain ones), kept separate so a strategy can
//! be tested and replaced without touching the catalog or the pipeline.
//!
//! Resolvers never fail: malformed input ranks as absent, and the raw
//! candidate survives in the record's diagnostic columns either way.

mod address;
mod amounts;
mod notes;

pub use address::resolve_address;
pub use amounts::{parse_amount, resolve_balance, resolve_sales_value};
pub use notes::resolve_first_non_empty;
