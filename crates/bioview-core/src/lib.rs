//! # BioView Core Library
//!
//! Ingestion of molecular structure files into a render-ready data model: PDB and
//! XYZ parsing, element and residue normalization, canonical per-element atom
//! layout, distance-based bond generation, and trajectory configuration selection.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture with a clear separation of concerns.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Protein`, `ProteinFile`,
//!   element and residue tables) and the per-line format logic for PDB and XYZ.
//!
//! - **[`engine`]: The Logic Core.** Scheduling of expensive work: block-parallel
//!   parsing with an order-preserving merge, cancellable bond generation, progress
//!   reporting, and the `ConfigurationSelector` used to address trajectory buffers.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as importing a
//!   file from disk with optional bond generation.

pub mod core;
pub mod engine;
pub mod workflows;
