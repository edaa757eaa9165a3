//! # Workflows Module
//!
//! High-level entry points that run a complete analysis on a structure.
//!
//! - **Backbone Analysis** ([`analyze`]) - Residue lookup, peptide segmentation, torsion
//!   computation and secondary-structure classification in one call, with progress
//!   reporting.

pub mod analyze;
