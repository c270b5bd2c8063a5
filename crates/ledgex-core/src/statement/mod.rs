//! The field extraction engine.
//!
//! Split along the one seam that matters: `rules` knows how to *recognize* a
//! value in each known page layout, `resolvers` knows how to *pick* among
//! competing recognitions. `normalize` feeds both, and `extractor` ties them
//! together into one record per page.

pub mod extractor;
pub mod normalize;
pub mod resolvers;
pub mod rules;

pub use extractor::RecordExtractor;
pub use normalize::normalize;
pub use rules::{Candidate, CandidateSet, extract_candidates};
