use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid entity for segmentation: {0}")]
    InvalidEntity(String),

    #[error("Structure has no models")]
    NoModels,

    #[error("Chain '{chain_id}' not found in the first model")]
    ChainNotFound { chain_id: String },

    #[error("Residue {residue_number} not found (requested in chain '{chain_id}')")]
    ResidueNotFound {
        chain_id: String,
        residue_number: isize,
    },
}
