use phf::{Set, phf_set};

pub const BACKBONE_NITROGEN: &str = "N";
pub const ALPHA_CARBON: &str = "CA";
pub const CARBONYL_CARBON: &str = "C";

/// Chemically modified amino acids that still form a regular peptide backbone.
static MODIFIED_AMINO_ACIDS: Set<&'static str> = phf_set! {
    "MSE", "SEC", "PYL", "SEP", "TPO", "PTR", "HYP", "MLY", "M3L", "MLZ",
    "ALY", "CSO", "CSD", "CME", "CSS", "CSX", "OCS", "SMC", "KCX", "LLP",
    "PCA", "CGU", "FME", "TYS", "HIC", "NLE", "ABA", "AIB", "DAL", "TRQ",
};

pub fn is_modified_amino_acid(residue_name: &str) -> bool {
    MODIFIED_AMINO_ACIDS.contains(residue_name.trim())
}
