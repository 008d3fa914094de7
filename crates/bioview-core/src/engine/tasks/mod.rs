//! Computational units of the engine.
//!
//! [`block_parse`] turns raw text into parsed models using parallel line-block
//! classification followed by an ordered merge. [`connectivity`] derives bonds
//! from atom distances. Both report through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) and stop early
//! when their cancellation token fires.

pub mod block_parse;
pub mod connectivity;
