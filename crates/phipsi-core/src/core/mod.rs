//! # Core Module
//!
//! Foundational, analysis-agnostic building blocks: the structure model, structure file
//! I/O and small geometric and naming utilities.
//!
//! - **Structure Representation** ([`models`]) - Arena-backed structures, models, chains,
//!   residues and atoms with stable typed identifiers
//! - **File I/O** ([`io`]) - The [`io::traits::MolecularFile`] trait and the PDB format
//! - **Utilities** ([`utils`]) - Torsion geometry and residue-name classification

pub mod io;
pub mod models;
pub mod utils;
