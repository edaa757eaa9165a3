use phipsi::engine::config::{DEFAULT_PEPTIDE_BOND_CUTOFF, LookupScope};

pub struct DefaultsConfig {
    pub chain: String,
    pub plot_output: String,
    pub peptide_bond_cutoff: f64,
    pub amino_acid_only: bool,
    pub lookup_scope: LookupScope,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            chain: "A".to_string(),
            plot_output: "ramachandran_plot.svg".to_string(),
            peptide_bond_cutoff: DEFAULT_PEPTIDE_BOND_CUTOFF,
            amino_acid_only: true,
            lookup_scope: LookupScope::Structure,
        }
    }
}
