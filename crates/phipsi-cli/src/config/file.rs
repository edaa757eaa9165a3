use crate::error::{CliError, Result};
use phipsi::engine::config::LookupScope;
use phipsi::engine::secondary::SecondaryStructureRules;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAnalysisConfig {
    pub chain: Option<String>,
    pub residue: Option<isize>,
    pub all_chains: Option<bool>,
    pub lookup_scope: Option<LookupScope>,
    /// Rules file, resolved relative to the working directory.
    pub rules_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSegmentationConfig {
    pub peptide_bond_cutoff: Option<f64>,
    pub amino_acid_only: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub plot: Option<bool>,
    pub plot_output: Option<PathBuf>,
    pub plot_title: Option<String>,
    pub csv: Option<PathBuf>,
    pub summary: Option<bool>,
}

/// The optional TOML configuration file. Every key is optional; missing keys fall back to
/// the built-in defaults.
///
/// ```toml
/// [analysis]
/// chain = "B"
/// lookup-scope = "chain"
///
/// [segmentation]
/// peptide-bond-cutoff = 2.0
///
/// [rules]
/// alpha = { phi = [-160.0, -20.0], psi = [-70.0, 50.0] }
///
/// [output]
/// summary = true
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub analysis: Option<FileAnalysisConfig>,
    pub segmentation: Option<FileSegmentationConfig>,
    pub rules: Option<SecondaryStructureRules>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_optional_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
