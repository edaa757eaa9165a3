use super::secondary::SecondaryStructureRules;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Default maximum carbonyl C to amide N distance (in Å) of a peptide bond.
pub const DEFAULT_PEPTIDE_BOND_CUTOFF: f64 = 1.8;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SegmentationConfig {
    /// Consecutive residues are bonded when C(prev)-N(next) is strictly below this distance.
    pub peptide_bond_cutoff: f64,
    /// Admit only the twenty standard amino acids.
    pub amino_acid_only: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            peptide_bond_cutoff: DEFAULT_PEPTIDE_BOND_CUTOFF,
            amino_acid_only: true,
        }
    }
}

/// Where residue lookup searches for the requested sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupScope {
    /// Scan every residue of the structure in file order, after checking that the chain
    /// exists in the first model.
    #[default]
    Structure,
    /// Only scan the residues of the requested chain.
    Chain,
}

impl FromStr for LookupScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structure" => Ok(Self::Structure),
            "chain" => Ok(Self::Chain),
            other => Err(ConfigError::InvalidParameter {
                name: "lookup_scope",
                reason: format!("expected 'structure' or 'chain', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for LookupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => f.write_str("structure"),
            Self::Chain => f.write_str("chain"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Chain analyzed when `all_chains` is off, and the chain residue lookup verifies.
    pub chain_id: String,
    /// Residue to resolve and report individually.
    pub residue_number: Option<isize>,
    /// Segment every chain of the first model instead of `chain_id` alone.
    pub all_chains: bool,
    pub segmentation: SegmentationConfig,
    pub lookup_scope: LookupScope,
    pub rules: SecondaryStructureRules,
    /// Also write the computed torsions onto the residues of the analyzed structure.
    pub annotate_residues: bool,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    chain_id: Option<String>,
    residue_number: Option<isize>,
    all_chains: bool,
    segmentation: Option<SegmentationConfig>,
    lookup_scope: Option<LookupScope>,
    rules: Option<SecondaryStructureRules>,
    annotate_residues: bool,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }
    pub fn residue_number(mut self, residue_number: Option<isize>) -> Self {
        self.residue_number = residue_number;
        self
    }
    pub fn all_chains(mut self, all_chains: bool) -> Self {
        self.all_chains = all_chains;
        self
    }
    pub fn segmentation(mut self, segmentation: SegmentationConfig) -> Self {
        self.segmentation = Some(segmentation);
        self
    }
    pub fn lookup_scope(mut self, scope: LookupScope) -> Self {
        self.lookup_scope = Some(scope);
        self
    }
    pub fn rules(mut self, rules: SecondaryStructureRules) -> Self {
        self.rules = Some(rules);
        self
    }
    pub fn annotate_residues(mut self, annotate: bool) -> Self {
        self.annotate_residues = annotate;
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let chain_id = self
            .chain_id
            .ok_or(ConfigError::MissingParameter("chain_id"))?;

        let segmentation = self.segmentation.unwrap_or_default();
        let cutoff = segmentation.peptide_bond_cutoff;
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "peptide_bond_cutoff",
                reason: format!("must be a positive distance, got {}", cutoff),
            });
        }

        let rules = self.rules.unwrap_or_default();
        rules.validate()?;

        Ok(AnalysisConfig {
            chain_id,
            residue_number: self.residue_number,
            all_chains: self.all_chains,
            segmentation,
            lookup_scope: self.lookup_scope.unwrap_or_default(),
            rules,
            annotate_residues: self.annotate_residues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::secondary::AngleWindow;

    #[test]
    fn builder_applies_defaults() {
        let config = AnalysisConfigBuilder::new().chain_id("A").build().unwrap();
        assert_eq!(config.chain_id, "A");
        assert_eq!(config.residue_number, None);
        assert!(!config.all_chains);
        assert_eq!(config.segmentation.peptide_bond_cutoff, 1.8);
        assert!(config.segmentation.amino_acid_only);
        assert_eq!(config.lookup_scope, LookupScope::Structure);
        assert_eq!(config.rules, SecondaryStructureRules::STANDARD);
        assert!(!config.annotate_residues);
    }

    #[test]
    fn builder_requires_chain_id() {
        assert_eq!(
            AnalysisConfigBuilder::new().build().unwrap_err(),
            ConfigError::MissingParameter("chain_id")
        );
    }

    #[test]
    fn builder_rejects_non_positive_cutoff() {
        let err = AnalysisConfigBuilder::new()
            .chain_id("A")
            .segmentation(SegmentationConfig {
                peptide_bond_cutoff: 0.0,
                amino_acid_only: true,
            })
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "peptide_bond_cutoff",
                ..
            }
        ));
    }

    #[test]
    fn builder_rejects_inverted_rule_interval() {
        let mut rules = SecondaryStructureRules::default();
        rules.b_par = AngleWindow::new((-115.0, -125.0), (110.0, 120.0));
        let err = AnalysisConfigBuilder::new()
            .chain_id("A")
            .rules(rules)
            .build()
            .unwrap_err();
        match err {
            ConfigError::InvalidParameter { name, reason } => {
                assert_eq!(name, "rules");
                assert!(reason.contains("b_par"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lookup_scope_parses_case_insensitively() {
        assert_eq!("Chain".parse::<LookupScope>(), Ok(LookupScope::Chain));
        assert_eq!(" structure ".parse::<LookupScope>(), Ok(LookupScope::Structure));
        assert!("model".parse::<LookupScope>().is_err());
        assert_eq!(LookupScope::Chain.to_string(), "chain");
    }

    #[test]
    fn segmentation_config_deserializes_with_defaults() {
        let config: SegmentationConfig = toml::from_str("amino-acid-only = false").unwrap();
        assert!(!config.amino_acid_only);
        assert_eq!(config.peptide_bond_cutoff, DEFAULT_PEPTIDE_BOND_CUTOFF);
    }
}
