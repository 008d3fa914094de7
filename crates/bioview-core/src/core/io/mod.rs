//! Readers for line-oriented molecular structure formats.
//!
//! Every format implements [`traits::StructureFormat`], which splits parsing
//! into a stateless per-line classification step and a sequential assembly
//! pass. The split lets callers classify large inputs in parallel blocks while
//! keeping all order-dependent decisions (residue transitions, chain and model
//! boundaries, trajectory frames) in one single-threaded pass.
//!
//! Malformed lines never abort a parse: they are skipped and reported as
//! [`warnings::ParseWarning`]s. The only file-level failure of a well-formed
//! read is [`error::ParseError::EmptyAtomCount`].

pub mod error;
pub mod pdb;
pub mod traits;
pub mod warnings;
pub mod xyz;

pub use error::ParseError;
