//! Data structures for imported molecular structures.
//!
//! ## Overview
//!
//! A parsed file ([`file::ProteinFile`]) holds one or more [`protein::Protein`]
//! snapshots. Each snapshot stores its atoms as a flat position array laid out
//! per element group and per trajectory configuration, together with
//! composition counters, chain ([`subunit::ProteinSubunit`]) ranges, the residue
//! sequence and, once computed, bond connectivity ([`bond::Connectivity`]).
//!
//! Snapshots are assembled by [`builder::ProteinBuilder`], which owns the
//! canonical ordering rules; nothing else in the crate reorders atoms.
//!
//! The element and residue tables ([`element`], [`residue`]) are process-wide
//! constants backed by perfect hash maps.

pub mod bond;
pub mod builder;
pub mod composition;
pub mod element;
pub mod file;
pub mod protein;
pub mod residue;
pub mod subunit;
