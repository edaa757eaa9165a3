//! # phipsi
//!
//! Backbone dihedral analysis of protein structures: peptide segmentation, phi/psi torsion
//! angles, threshold-based secondary-structure classification and Ramachandran reporting.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** The arena-backed structure model, the PDB reader and
//!   writer, and torsion geometry.
//!
//! - **[`engine`]: The Algorithms.** Peptide segmentation, dihedral computation,
//!   secondary-structure rules and residue lookup, each a plain function over a borrowed
//!   [`core::models::structure::Structure`].
//!
//! - **[`report`]: The Adapters.** CSV export, label summaries and SVG Ramachandran plots.
//!
//! - **[`workflows`]: The Public API.** [`workflows::analyze::run`] strings the engine
//!   together for one structure and reports progress along the way.

pub mod core;
pub mod engine;
pub mod report;
pub mod workflows;

#[cfg(test)]
pub(crate) mod test_utils;
