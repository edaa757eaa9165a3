use super::config::ConfigError;
use super::dihedral::{DihedralRecord, compute_dihedrals};
use super::segment::PeptideSegment;
use crate::core::models::ids::ResidueId;
use crate::core::models::structure::Structure;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Coarse secondary-structure label derived from a residue's backbone torsions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SecondaryStructure {
    Alpha,
    Beta,
    BetaParallel,
    BetaAntiparallel,
    Unassigned,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown secondary structure label: '{0}'")]
pub struct ParseSecondaryStructureError(pub String);

#[derive(Debug, Error)]
pub enum RulesLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl SecondaryStructure {
    /// Every label, in reporting order.
    pub const ALL: [SecondaryStructure; 5] = [
        Self::Alpha,
        Self::Beta,
        Self::BetaParallel,
        Self::BetaAntiparallel,
        Self::Unassigned,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::BetaParallel => "b_par",
            Self::BetaAntiparallel => "b_anti",
            Self::Unassigned => "U",
        }
    }
}

impl fmt::Display for SecondaryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for SecondaryStructure {
    type Err = ParseSecondaryStructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.label() == s.trim())
            .ok_or_else(|| ParseSecondaryStructureError(s.to_string()))
    }
}

/// An open interval `(low, high)` of angles in degrees. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct OpenInterval {
    pub low: f64,
    pub high: f64,
}

impl OpenInterval {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.low < value && value < self.high
    }

    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low < self.high
    }
}

impl From<[f64; 2]> for OpenInterval {
    fn from([low, high]: [f64; 2]) -> Self {
        Self::new(low, high)
    }
}

impl fmt::Display for OpenInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// A rectangular region of the Ramachandran plane.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AngleWindow {
    pub phi: OpenInterval,
    pub psi: OpenInterval,
}

impl AngleWindow {
    pub const fn new(phi: (f64, f64), psi: (f64, f64)) -> Self {
        Self {
            phi: OpenInterval::new(phi.0, phi.1),
            psi: OpenInterval::new(psi.0, psi.1),
        }
    }

    #[inline]
    pub fn contains(&self, phi: f64, psi: f64) -> bool {
        self.phi.contains(phi) && self.psi.contains(psi)
    }
}

/// Threshold windows of the secondary-structure classifier.
///
/// The windows are checked in a fixed priority order: `b_anti`, `b_par`, `beta`, `alpha`.
/// The first window containing the `(phi, psi)` pair decides the label, so narrower beta
/// sub-types take precedence over the broad beta region. Bounds can be tuned (for example
/// from a TOML file) but the order cannot.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SecondaryStructureRules {
    pub b_anti: AngleWindow,
    pub b_par: AngleWindow,
    pub beta: AngleWindow,
    pub alpha: AngleWindow,
}

impl SecondaryStructureRules {
    pub const STANDARD: SecondaryStructureRules = SecondaryStructureRules {
        b_anti: AngleWindow::new((-145.0, -135.0), (130.0, 140.0)),
        b_par: AngleWindow::new((-125.0, -115.0), (110.0, 120.0)),
        beta: AngleWindow::new((-180.0, -100.0), (100.0, 180.0)),
        alpha: AngleWindow::new((-135.0, -45.0), (-50.0, 40.0)),
    };

    /// Loads rules from a TOML file. Windows absent from the file keep their standard bounds.
    pub fn load(path: &Path) -> Result<Self, RulesLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| RulesLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| RulesLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    /// The windows paired with their labels, in evaluation order.
    pub fn windows(&self) -> [(SecondaryStructure, &AngleWindow); 4] {
        [
            (SecondaryStructure::BetaAntiparallel, &self.b_anti),
            (SecondaryStructure::BetaParallel, &self.b_par),
            (SecondaryStructure::Beta, &self.beta),
            (SecondaryStructure::Alpha, &self.alpha),
        ]
    }

    /// Checks that every interval has finite bounds with `low < high`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (label, window) in self.windows() {
            for (axis, interval) in [("phi", &window.phi), ("psi", &window.psi)] {
                if !interval.is_valid() {
                    return Err(ConfigError::InvalidParameter {
                        name: "rules",
                        reason: format!(
                            "{} interval of '{}' must have finite bounds with low < high, got {}",
                            axis, label, interval
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Classifies one residue. A missing angle always yields [`SecondaryStructure::Unassigned`].
    pub fn classify(&self, phi: Option<f64>, psi: Option<f64>) -> SecondaryStructure {
        let (Some(phi), Some(psi)) = (phi, psi) else {
            return SecondaryStructure::Unassigned;
        };
        self.windows()
            .into_iter()
            .find(|(_, window)| window.contains(phi, psi))
            .map_or(SecondaryStructure::Unassigned, |(label, _)| label)
    }
}

impl Default for SecondaryStructureRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Classifies a `(phi, psi)` pair with the standard thresholds.
pub fn classify(phi: Option<f64>, psi: Option<f64>) -> SecondaryStructure {
    SecondaryStructureRules::STANDARD.classify(phi, psi)
}

/// Ordered residue → label mapping, parallel to the [`DihedralRecord`] it was derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecondaryStructureAssignment {
    entries: Vec<(ResidueId, SecondaryStructure)>,
    index: HashMap<ResidueId, usize>,
}

impl SecondaryStructureAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the label of a residue. A replaced entry keeps its position.
    pub fn insert(&mut self, residue_id: ResidueId, label: SecondaryStructure) {
        match self.index.get(&residue_id) {
            Some(&position) => self.entries[position].1 = label,
            None => {
                self.index.insert(residue_id, self.entries.len());
                self.entries.push((residue_id, label));
            }
        }
    }

    /// Appends every entry of `other`, in order.
    pub fn extend(&mut self, other: &SecondaryStructureAssignment) {
        for (residue_id, label) in other.iter() {
            self.insert(residue_id, label);
        }
    }

    pub fn get(&self, residue_id: ResidueId) -> Option<SecondaryStructure> {
        self.index
            .get(&residue_id)
            .map(|&position| self.entries[position].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResidueId, SecondaryStructure)> + '_ {
        self.entries.iter().copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = SecondaryStructure> + '_ {
        self.entries.iter().map(|&(_, label)| label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Labels every entry of a dihedral record independently.
pub fn classify_record(
    record: &DihedralRecord,
    rules: &SecondaryStructureRules,
) -> SecondaryStructureAssignment {
    let mut assignment = SecondaryStructureAssignment::new();
    for (residue_id, torsions) in record.iter() {
        assignment.insert(residue_id, rules.classify(torsions.phi, torsions.psi));
    }
    assignment
}

/// Computes the dihedral record of a segment and labels each of its residues.
pub fn classify_segment(
    structure: &Structure,
    segment: &PeptideSegment,
    rules: &SecondaryStructureRules,
) -> SecondaryStructureAssignment {
    classify_record(&compute_dihedrals(structure, segment), rules)
}
