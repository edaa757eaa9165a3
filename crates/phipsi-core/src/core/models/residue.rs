use super::ids::{AtomId, ChainId};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The twenty standard amino acids admitted by the peptide segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcidType {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // ALA
    Glycine,    // GLY
    Isoleucine, // ILE
    Leucine,    // LEU
    Proline,    // PRO
    Valine,     // VAL

    // --- Aromatic ---
    Phenylalanine, // PHE
    Tryptophan,    // TRP
    Tyrosine,      // TYR

    // --- Polar, Uncharged ---
    Asparagine, // ASN
    Cysteine,   // CYS
    Glutamine,  // GLN
    Serine,     // SER
    Threonine,  // THR
    Methionine, // MET

    // --- Positively Charged (Basic) ---
    Arginine,  // ARG
    Histidine, // HIS
    Lysine,    // LYS

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // ASP
    GlutamicAcid, // GLU
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a standard amino acid name")]
pub struct ParseAminoAcidError(pub String);

impl AminoAcidType {
    pub fn three_letter_code(&self) -> &'static str {
        match self {
            AminoAcidType::Alanine => "ALA",
            AminoAcidType::Glycine => "GLY",
            AminoAcidType::Isoleucine => "ILE",
            AminoAcidType::Leucine => "LEU",
            AminoAcidType::Proline => "PRO",
            AminoAcidType::Valine => "VAL",
            AminoAcidType::Phenylalanine => "PHE",
            AminoAcidType::Tryptophan => "TRP",
            AminoAcidType::Tyrosine => "TYR",
            AminoAcidType::Asparagine => "ASN",
            AminoAcidType::Cysteine => "CYS",
            AminoAcidType::Glutamine => "GLN",
            AminoAcidType::Serine => "SER",
            AminoAcidType::Threonine => "THR",
            AminoAcidType::Methionine => "MET",
            AminoAcidType::Arginine => "ARG",
            AminoAcidType::Histidine => "HIS",
            AminoAcidType::Lysine => "LYS",
            AminoAcidType::AsparticAcid => "ASP",
            AminoAcidType::GlutamicAcid => "GLU",
        }
    }

    pub fn one_letter_code(&self) -> char {
        match self {
            AminoAcidType::Alanine => 'A',
            AminoAcidType::Glycine => 'G',
            AminoAcidType::Isoleucine => 'I',
            AminoAcidType::Leucine => 'L',
            AminoAcidType::Proline => 'P',
            AminoAcidType::Valine => 'V',
            AminoAcidType::Phenylalanine => 'F',
            AminoAcidType::Tryptophan => 'W',
            AminoAcidType::Tyrosine => 'Y',
            AminoAcidType::Asparagine => 'N',
            AminoAcidType::Cysteine => 'C',
            AminoAcidType::Glutamine => 'Q',
            AminoAcidType::Serine => 'S',
            AminoAcidType::Threonine => 'T',
            AminoAcidType::Methionine => 'M',
            AminoAcidType::Arginine => 'R',
            AminoAcidType::Histidine => 'H',
            AminoAcidType::Lysine => 'K',
            AminoAcidType::AsparticAcid => 'D',
            AminoAcidType::GlutamicAcid => 'E',
        }
    }
}

impl FromStr for AminoAcidType {
    type Err = ParseAminoAcidError;

    /// Parses a three-letter residue name. Matching is case-insensitive and ignores
    /// surrounding whitespace, as residue names come straight from fixed-width columns.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALA" => Ok(AminoAcidType::Alanine),
            "GLY" => Ok(AminoAcidType::Glycine),
            "ILE" => Ok(AminoAcidType::Isoleucine),
            "LEU" => Ok(AminoAcidType::Leucine),
            "PRO" => Ok(AminoAcidType::Proline),
            "VAL" => Ok(AminoAcidType::Valine),
            "PHE" => Ok(AminoAcidType::Phenylalanine),
            "TRP" => Ok(AminoAcidType::Tryptophan),
            "TYR" => Ok(AminoAcidType::Tyrosine),
            "ASN" => Ok(AminoAcidType::Asparagine),
            "CYS" => Ok(AminoAcidType::Cysteine),
            "GLN" => Ok(AminoAcidType::Glutamine),
            "SER" => Ok(AminoAcidType::Serine),
            "THR" => Ok(AminoAcidType::Threonine),
            "MET" => Ok(AminoAcidType::Methionine),
            "ARG" => Ok(AminoAcidType::Arginine),
            "HIS" => Ok(AminoAcidType::Histidine),
            "LYS" => Ok(AminoAcidType::Lysine),
            "ASP" => Ok(AminoAcidType::AsparticAcid),
            "GLU" => Ok(AminoAcidType::GlutamicAcid),
            _ => Err(ParseAminoAcidError(s.to_string())),
        }
    }
}

impl fmt::Display for AminoAcidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.three_letter_code())
    }
}

/// Backbone torsions attached to a residue after annotation, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BackboneTorsions {
    pub phi: Option<f64>,
    pub psi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub residue_number: isize,                       // Sequence number from source file
    pub insertion_code: Option<char>,                // PDB insertion code, if any
    pub name: String,                                // Name of the residue (e.g., "ALA", "HOH")
    pub residue_type: Option<AminoAcidType>,         // Parsed standard amino acid, if any
    pub chain_id: ChainId,                           // ID of the parent chain
    pub is_hetero: bool,                             // Read from HETATM records
    pub backbone_torsions: Option<BackboneTorsions>, // Auxiliary PHI/PSI annotation
    pub(crate) atoms: Vec<AtomId>,                   // Atoms in insertion order
    atom_name_map: HashMap<String, AtomId>,          // Map from atom name to its stable ID
}

impl Residue {
    pub(crate) fn new(
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
        chain_id: ChainId,
    ) -> Self {
        Self {
            residue_number,
            insertion_code,
            name: name.to_string(),
            residue_type: name.parse().ok(),
            chain_id,
            is_hetero: false,
            backbone_torsions: None,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map.insert(atom_name.to_string(), atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    pub fn has_atom(&self, name: &str) -> bool {
        self.atom_name_map.contains_key(name)
    }

    pub fn is_standard_amino_acid(&self) -> bool {
        self.residue_type.is_some()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.residue_number)?;
        if let Some(icode) = self.insertion_code {
            write!(f, "{}", icode)?;
        }
        Ok(())
    }
}
