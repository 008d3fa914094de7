//! # Core Module
//!
//! Stateless foundation of the ingestion engine: the molecular data model and
//! the structure file readers that populate it.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Element and residue tables,
//!   composition counters, chain ranges, and the canonically ordered [`models::protein::Protein`]
//! - **File I/O** ([`io`]) - PDB and XYZ readers built on a classify-then-assemble contract
//!
//! ## Layout Contract
//!
//! Every `Protein` stores its atoms grouped per element in the fixed order
//! carbon, nitrogen, hydrogen, oxygen, sulfur, other, repeated once per
//! trajectory configuration. Downstream offset arithmetic relies on this
//! ordering and derives element ranges from composition counts alone.

pub mod io;
pub mod models;
