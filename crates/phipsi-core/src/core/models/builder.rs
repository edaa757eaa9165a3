use super::atom::Atom;
use super::ids::{ChainId, ResidueId};
use super::structure::Structure;
use nalgebra::Point3;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Cannot start a residue without a current chain")]
    NoCurrentChain,
    #[error("Cannot add atom '{0}' without a current residue")]
    NoCurrentResidue(String),
}

/// Incrementally assembles a [`Structure`] from records read in file order.
///
/// The builder tracks the current model, chain and residue so that readers only have to
/// announce transitions. A chain started before any model implicitly opens model 1.
pub struct StructureBuilder {
    structure: Structure,

    // --- Builder-specific state for efficient construction ---
    current_model: Option<usize>,
    current_chain: Option<ChainId>,
    current_residue: Option<ResidueId>,
}

impl StructureBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            structure: Structure::new(name),
            current_model: None,
            current_chain: None,
            current_residue: None,
        }
    }

    pub fn start_model(&mut self, serial: usize) -> &mut Self {
        self.current_model = Some(self.structure.add_model(serial));
        self.current_chain = None;
        self.current_residue = None;
        self
    }

    pub fn start_chain(&mut self, id: &str) -> &mut Self {
        let model_index = match self.current_model {
            Some(index) => index,
            None => {
                self.start_model(1);
                self.structure.models().len() - 1
            }
        };
        self.current_chain = self.structure.add_chain(model_index, id);
        self.current_residue = None;
        self
    }

    pub fn start_residue(
        &mut self,
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
        is_hetero: bool,
    ) -> Result<&mut Self, BuildError> {
        let chain_id = self.current_chain.ok_or(BuildError::NoCurrentChain)?;
        let residue_id = self
            .structure
            .add_residue(chain_id, residue_number, insertion_code, name, is_hetero)
            .ok_or(BuildError::NoCurrentChain)?;
        self.current_residue = Some(residue_id);
        Ok(self)
    }

    pub fn add_atom(
        &mut self,
        serial: usize,
        name: &str,
        position: Point3<f64>,
    ) -> Result<&mut Self, BuildError> {
        self.add_atom_detailed(serial, name, position, 1.0, 0.0, None)
    }

    /// Adds an atom with full record metadata to the current residue.
    ///
    /// Only the first atom of a given name is kept per residue, which drops alternate
    /// location conformers after the first one.
    pub fn add_atom_detailed(
        &mut self,
        serial: usize,
        name: &str,
        position: Point3<f64>,
        occupancy: f64,
        temperature_factor: f64,
        element: Option<&str>,
    ) -> Result<&mut Self, BuildError> {
        let residue_id = self
            .current_residue
            .ok_or_else(|| BuildError::NoCurrentResidue(name.to_string()))?;

        let duplicate = self
            .structure
            .residue(residue_id)
            .is_some_and(|residue| residue.has_atom(name));
        if duplicate {
            trace!(serial, atom = name, "Skipping alternate conformer of atom.");
            return Ok(self);
        }

        let mut atom = Atom::new(name, residue_id, position);
        atom.serial = serial;
        atom.occupancy = occupancy;
        atom.temperature_factor = temperature_factor;
        atom.element = element.map(str::to_string);
        self.structure
            .add_atom_to_residue(residue_id, atom)
            .ok_or_else(|| BuildError::NoCurrentResidue(name.to_string()))?;
        Ok(self)
    }

    pub fn model_count(&self) -> usize {
        self.structure.models().len()
    }

    pub fn build(self) -> Structure {
        self.structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_hierarchy_in_file_order() {
        let mut builder = StructureBuilder::new("built");
        builder.start_chain("A");
        builder.start_residue(1, None, "ALA", false).unwrap();
        builder.add_atom(1, "N", Point3::new(0.0, 0.0, 0.0)).unwrap();
        builder.add_atom(2, "CA", Point3::new(1.5, 0.0, 0.0)).unwrap();
        builder.start_residue(2, None, "GLY", false).unwrap();
        builder.add_atom(3, "N", Point3::new(3.0, 0.0, 0.0)).unwrap();
        let structure = builder.build();

        assert_eq!(structure.name, "built");
        assert_eq!(structure.models().len(), 1);
        assert_eq!(structure.models()[0].serial, 1);
        assert_eq!(structure.residue_count(), 2);
        assert_eq!(structure.atom_count(), 3);

        let chain_id = structure.find_chain_by_id(0, "A").unwrap();
        let ala = structure.find_residue(chain_id, 1, None).unwrap();
        assert_eq!(structure.residue_atom(ala, "CA").unwrap().serial, 2);
    }

    #[test]
    fn alternate_conformers_keep_first_atom() {
        let mut builder = StructureBuilder::new("altloc");
        builder.start_chain("A");
        builder.start_residue(5, None, "SER", false).unwrap();
        builder
            .add_atom_detailed(1, "OG", Point3::new(1.0, 0.0, 0.0), 0.6, 10.0, Some("O"))
            .unwrap();
        builder
            .add_atom_detailed(2, "OG", Point3::new(2.0, 0.0, 0.0), 0.4, 12.0, Some("O"))
            .unwrap();
        let structure = builder.build();

        assert_eq!(structure.atom_count(), 1);
        let chain_id = structure.find_chain_by_id(0, "A").unwrap();
        let ser = structure.find_residue(chain_id, 5, None).unwrap();
        let og = structure.residue_atom(ser, "OG").unwrap();
        assert_eq!(og.position, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(og.occupancy, 0.6);
        assert_eq!(og.element.as_deref(), Some("O"));
    }

    #[test]
    fn hetero_flag_is_sticky_on_residue() {
        let mut builder = StructureBuilder::new("het");
        builder.start_chain("A");
        builder.start_residue(100, None, "HOH", true).unwrap();
        builder.add_atom(1, "O", Point3::origin()).unwrap();
        let structure = builder.build();
        let (_, water) = structure.residues_in_order().next().unwrap();
        assert!(water.is_hetero);
    }

    #[test]
    fn residue_without_chain_is_an_error() {
        let mut builder = StructureBuilder::new("broken");
        assert_eq!(
            builder.start_residue(1, None, "ALA", false).err(),
            Some(BuildError::NoCurrentChain)
        );
        assert_eq!(
            builder.add_atom(1, "CA", Point3::origin()).err(),
            Some(BuildError::NoCurrentResidue("CA".to_string()))
        );
    }

    #[test]
    fn new_model_resets_current_chain() {
        let mut builder = StructureBuilder::new("nmr");
        builder.start_model(1).start_chain("A");
        builder.start_residue(1, None, "ALA", false).unwrap();
        builder.start_model(2);
        assert_eq!(builder.model_count(), 2);
        assert!(builder.start_residue(1, None, "ALA", false).is_err());
        builder.start_chain("A");
        builder.start_residue(1, None, "ALA", false).unwrap();
        let structure = builder.build();
        assert_eq!(structure.models().len(), 2);
        assert_eq!(structure.residue_count(), 2);
    }
}
