//! # Engine Module
//!
//! The analysis algorithms operating on a parsed [`crate::core::models::structure::Structure`].
//!
//! - **Segmentation** ([`segment`]) - Splits chains into runs of peptide-bonded residues
//! - **Torsions** ([`dihedral`]) - Backbone phi/psi per residue of a segment
//! - **Classification** ([`secondary`]) - Threshold rules mapping (phi, psi) to a label
//! - **Lookup** ([`lookup`]) - Resolves a residue from a chain identifier and number
//! - **Configuration** ([`config`]), **Progress Monitoring** ([`progress`]) and
//!   **Error Handling** ([`error`])
//!
//! Every function here is synchronous and works on borrowed data; the structure is only
//! mutated by the explicit [`dihedral::annotate_structure`] step.

pub mod config;
pub mod dihedral;
pub mod error;
pub mod lookup;
pub mod progress;
pub mod secondary;
pub mod segment;
