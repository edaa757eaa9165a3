//! Reading and writing of macromolecular structure files.
//!
//! Formats implement the [`traits::MolecularFile`] trait, which gives every reader the same
//! stream and path based entry points.

pub mod pdb;
pub mod traits;
