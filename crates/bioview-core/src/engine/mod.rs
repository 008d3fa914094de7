//! # Engine Module
//!
//! Long-running and stateful work built on top of the [`crate::core`] data model:
//! parallel structure parsing, bond generation, and trajectory navigation.
//!
//! ## Overview
//!
//! The core layer knows how to classify a single line and how to assemble a model
//! from classified records. The engine decides how that work is scheduled. Input
//! text is split into fixed-size line blocks that are classified concurrently and
//! merged back in line order before the sequential assembly pass. Bond generation
//! scans each configuration row by row. Both kinds of work report progress and
//! poll a shared [`progress::CancellationToken`].
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Builders for parser and connectivity settings
//! - **Progress Monitoring** ([`progress`]) - Progress events, fraction adapter, cancellation
//! - **Tasks** ([`tasks`]) - Block-parallel parsing and connectivity generation
//! - **Selection** ([`selector`]) - Configuration cursor and buffer region arithmetic
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Parallelism
//!
//! With the default `parallel` feature, block classification runs on the rayon
//! thread pool. Without it the same code path runs sequentially, and results are
//! identical either way.

pub mod config;
pub mod error;
pub mod progress;
pub mod selector;
pub mod tasks;
