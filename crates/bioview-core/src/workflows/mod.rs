//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::core`] formats and the
//! [`crate::engine`] tasks together.
//!
//! ## Overview
//!
//! A caller hands over a path (or raw text plus its extension), optional metadata
//! already known about the file, a progress sink and a cancellation token. The
//! import workflow detects the format, runs the block-parallel parser, wraps the
//! result in a [`ProteinFile`](crate::core::models::file::ProteinFile) and, when
//! asked, generates bonds for every model.
//!
//! - **Import Workflow** ([`import`]) - Format detection, parsing and optional connectivity

pub mod import;
