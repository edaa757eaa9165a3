use super::ids::ResidueId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: String,                      // Chain identifier (e.g., "A", "B")
    pub model_index: usize,              // Position of the parent model in the structure
    pub(crate) residues: Vec<ResidueId>, // Ordered list of residue IDs belonging to this chain
}

impl Chain {
    pub(crate) fn new(id: &str, model_index: usize) -> Self {
        Self {
            id: id.to_string(),
            model_index,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}
