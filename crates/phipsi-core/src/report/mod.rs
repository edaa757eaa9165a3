//! Output adapters turning analysis results into files and text.
//!
//! - [`csv_export`] writes one row per residue of a [`crate::engine::dihedral::DihedralRecord`]
//! - [`summary`] counts secondary-structure labels
//! - [`plot`] renders a Ramachandran scatter plot as SVG

pub mod csv_export;
pub mod plot;
pub mod summary;

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No residue has both phi and psi defined; refusing to render an empty plot")]
    NoValidAngles,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
